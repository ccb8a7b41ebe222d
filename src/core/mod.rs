pub mod api;
pub mod catalog;
pub mod loader;
pub mod logging;
pub mod pipeline;
