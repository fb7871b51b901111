//! # Radial Layout
//!
//! Places the devices of a network evenly on a circle around the network's
//! center. Positions depend only on the inputs, so a resized viewport simply
//! gets a fresh call; nothing is remembered between calls.

use std::f64::consts::TAU;

use nmapviz_common::config::Viewport;
use nmapviz_common::network::device::DeviceInfo;

/// Radius of the circle drawn for a device, also used for hit testing.
pub const NODE_RADIUS: f64 = 20.0;

/// Smallest radius the default layout will use, so nodes never pile up on tiny viewports.
pub const MIN_RADIUS: f64 = 2.0 * NODE_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub viewport: Viewport,
    pub center: Point,
    /// Explicit circle radius. `None`, or anything not finite and positive,
    /// falls back to [`default_radius`].
    pub radius: Option<f64>,
}

impl LayoutParams {
    /// Circle centered in the viewport with the default radius.
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            center: Point::new(viewport.width / 2.0, viewport.height / 2.0),
            radius: None,
        }
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn effective_radius(&self) -> f64 {
        self.radius
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or_else(|| default_radius(self.viewport))
    }
}

/// A third of the viewport's shorter side, never below [`MIN_RADIUS`].
pub fn default_radius(viewport: Viewport) -> f64 {
    let shorter: f64 = viewport.width.min(viewport.height);
    if shorter.is_finite() {
        (shorter / 3.0).max(MIN_RADIUS)
    } else {
        MIN_RADIUS
    }
}

/// One position per device, in the same order as `devices`.
pub fn layout(devices: &[DeviceInfo], params: &LayoutParams) -> Vec<Point> {
    positions(devices.len(), params)
}

/// Device `i` of `count` sits at angle `2π·i / count`, measured from the positive x axis.
pub fn positions(count: usize, params: &LayoutParams) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }

    let radius: f64 = params.effective_radius();
    let step: f64 = TAU / count as f64;

    (0..count)
        .map(|i| {
            let angle: f64 = step * i as f64;
            Point::new(
                params.center.x + radius * angle.cos(),
                params.center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Index of the first node whose circle contains `point`.
pub fn device_at(positions: &[Point], point: Point) -> Option<usize> {
    positions
        .iter()
        .position(|node| node.distance_to(point) <= NODE_RADIUS)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
