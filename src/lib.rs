/// Pokedex - terminal catalog browser for the public PokéAPI.
///
/// Loads the national catalog in concurrent batches, then filters and pages
/// it entirely in memory.

pub mod config;
pub mod core;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
