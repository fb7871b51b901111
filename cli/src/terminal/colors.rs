use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 0x7A, g: 0xD7, b: 0xF0 };
pub const ACCENT: Color = Color::TrueColor { r: 0xF2, g: 0xB8, b: 0x4B };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::TrueColor { r: 0x8C, g: 0xE0, b: 0x8C };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 0x9E, g: 0xB4, b: 0xF5 };
pub const MAC_ADDR: Color = Color::TrueColor { r: 0xE0, g: 0x9E, b: 0xF5 };

pub const PORT_OPEN: Color = Color::Green;
pub const SELECTED: Color = Color::BrightYellow;
pub const FAILURE: Color = Color::Red;
