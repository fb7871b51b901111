pub mod colors;
pub mod logging;
pub mod map;
pub mod network_fmt;
pub mod print;
pub mod spinner;
