// src/processing/mod.rs
pub mod classify;
pub mod combined;
pub mod indices;
pub mod stage;

// Re-export main components
pub use combined::{joint_mask, run_combined, CombinedAnalysis};
pub use stage::{run_ndvi, run_vari, StageOutput};
