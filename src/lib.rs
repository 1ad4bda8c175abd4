// src/lib.rs
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod io;
pub mod processing;
pub mod raster;
pub mod render;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
