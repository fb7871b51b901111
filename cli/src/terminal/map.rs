//! Draws one network as a grid of characters.
//!
//! The radial layout works in virtual pixels: every terminal cell counts as
//! [`CELL_WIDTH`] × [`CELL_HEIGHT`], which keeps the circle round on screen.
//! Spokes run from the hub to each device and stop where hit testing says a
//! device's node begins.

use colored::*;
use nmapviz_common::config::Viewport;
use nmapviz_common::network::device::DeviceInfo;
use nmapviz_core::layout::{self, LayoutParams, Point};
use nmapviz_core::selection::Selection;

use crate::terminal::colors;

pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const MARKERS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Hub,
    Spoke(char),
    Node(usize),
    Bracket(usize, char),
}

pub struct MapGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

/// Single-character tag for device `idx`, shared by the map and the device tree.
pub fn marker(idx: usize) -> char {
    MARKERS.get(idx).map(|&b| b as char).unwrap_or('*')
}

/// Lays `devices` out on a `viewport` measured in terminal cells.
pub fn plot(devices: &[DeviceInfo], viewport: Viewport) -> MapGrid {
    let columns: usize = clamp_cells(viewport.width);
    let rows: usize = clamp_cells(viewport.height);
    let mut grid = MapGrid {
        columns,
        rows,
        cells: vec![Cell::Empty; columns * rows],
    };

    let params = LayoutParams::for_viewport(Viewport::new(
        columns as f64 * CELL_WIDTH,
        rows as f64 * CELL_HEIGHT,
    ));
    let positions: Vec<Point> = layout::layout(devices, &params);

    for node in &positions {
        grid.spoke(params.center, *node, &positions);
    }
    for (idx, node) in positions.iter().enumerate() {
        if let Some((col, row)) = grid.cell_of(*node) {
            grid.set(col, row, Cell::Node(idx));
            if col > 0 {
                grid.set(col - 1, row, Cell::Bracket(idx, '['));
            }
            grid.set(col + 1, row, Cell::Bracket(idx, ']'));
        }
    }
    if let Some((col, row)) = grid.cell_of(params.center) {
        grid.set(col, row, Cell::Hub);
    }

    grid
}

fn clamp_cells(size: f64) -> usize {
    if size.is_finite() && size >= 1.0 {
        size as usize
    } else {
        1
    }
}

impl MapGrid {
    /// Colored lines ready to print. Nodes of the selected device are highlighted.
    pub fn render(&self, devices: &[DeviceInfo], selection: &Selection) -> Vec<String> {
        let is_selected = |idx: usize| {
            devices
                .get(idx)
                .is_some_and(|device| selection.is_selected(device.ip_address()))
        };

        self.cells
            .chunks(self.columns)
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let glyph: String = cell.glyph().to_string();
                        match *cell {
                            Cell::Empty => glyph.normal(),
                            Cell::Hub => glyph.color(colors::PRIMARY).bold(),
                            Cell::Spoke(_) => glyph.color(colors::SEPARATOR),
                            Cell::Node(idx) | Cell::Bracket(idx, _) if is_selected(idx) => {
                                glyph.color(colors::SELECTED).bold()
                            }
                            Cell::Node(_) => glyph.color(colors::ACCENT).bold(),
                            Cell::Bracket(..) => glyph.color(colors::SEPARATOR),
                        }
                        .to_string()
                    })
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    /// Same grid without colors.
    pub fn plain_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.columns)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.glyph())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if col < self.columns && row < self.rows {
            self.cells[row * self.columns + col] = cell;
        }
    }

    fn cell_of(&self, point: Point) -> Option<(usize, usize)> {
        let col: f64 = (point.x / CELL_WIDTH).floor();
        let row: f64 = (point.y / CELL_HEIGHT).floor();
        if col < 0.0 || row < 0.0 || col >= self.columns as f64 || row >= self.rows as f64 {
            return None;
        }
        Some((col as usize, row as usize))
    }

    fn spoke(&mut self, from: Point, to: Point, nodes: &[Point]) {
        let cols: f64 = (to.x - from.x) / CELL_WIDTH;
        let rows: f64 = (to.y - from.y) / CELL_HEIGHT;
        let glyph: char = if rows.abs() < 0.4 * cols.abs() {
            '─'
        } else if cols.abs() < 0.4 * rows.abs() {
            '│'
        } else if cols * rows > 0.0 {
            '╲'
        } else {
            '╱'
        };

        let steps: usize = (cols.abs().max(rows.abs()) * 2.0).ceil() as usize;
        for step in 1..steps {
            let t: f64 = step as f64 / steps as f64;
            let probe = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            if layout::device_at(nodes, probe).is_some() {
                break;
            }
            if let Some((col, row)) = self.cell_of(probe) {
                self.set(col, row, Cell::Spoke(glyph));
            }
        }
    }
}

impl Cell {
    fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Hub => '◎',
            Cell::Spoke(c) | Cell::Bracket(_, c) => c,
            Cell::Node(idx) => marker(idx),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn devices(count: usize) -> Vec<DeviceInfo> {
        (0..count)
            .map(|i| DeviceInfo::new(format!("10.0.0.{i}"), "", "", "", Vec::new(), ""))
            .collect()
    }

    fn count_char(lines: &[String], c: char) -> usize {
        lines.iter().map(|line| line.matches(c).count()).sum()
    }

    #[test]
    fn markers_run_digits_then_letters() {
        assert_eq!(marker(0), '0');
        assert_eq!(marker(9), '9');
        assert_eq!(marker(10), 'a');
        assert_eq!(marker(35), 'z');
        assert_eq!(marker(36), '*');
    }

    #[test]
    fn empty_network_draws_only_the_hub() {
        let lines = plot(&[], Viewport::default()).plain_lines();
        assert_eq!(lines.len(), 21);
        assert_eq!(count_char(&lines, '◎'), 1);
        assert_eq!(lines.concat().trim(), "◎");
    }

    #[test]
    fn every_device_gets_one_bracketed_marker() {
        let lines = plot(&devices(4), Viewport::default()).plain_lines();
        for idx in 0..4 {
            let tag = format!("[{}]", marker(idx));
            assert_eq!(lines.iter().filter(|line| line.contains(&tag)).count(), 1);
        }
    }

    #[test]
    fn first_device_sits_right_of_the_hub() {
        let lines = plot(&devices(4), Viewport::default()).plain_lines();
        let hub_row = lines.iter().find(|line| line.contains('◎')).unwrap();
        let hub = hub_row.find('◎').unwrap();
        let node = hub_row.find("[0]").unwrap();
        assert!(node > hub);
        assert!(hub_row[hub..node].contains('─'));
    }

    #[test]
    fn grid_matches_viewport() {
        let grid = plot(&devices(2), Viewport::new(40.0, 12.0));
        assert_eq!(grid.plain_lines().len(), 12);
        assert!(grid.plain_lines().iter().all(|line| line.chars().count() <= 40));
    }
}
