// src/io/mod.rs
pub mod reader;
pub mod writer;

pub use reader::{read_gray_unit, read_luminance, read_rgb_bands, RgbBands};
pub use writer::{reload_index_artifact, write_index_artifact};
