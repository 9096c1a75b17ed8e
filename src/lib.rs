/// Ashgate simulation core: tile grid, corruption, bodies, levels.
/// The terminal front-end lives in the binary.

pub mod config;
pub mod domain;
pub mod sim;
