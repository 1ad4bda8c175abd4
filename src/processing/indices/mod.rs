// src/processing/indices/mod.rs
pub mod ndvi;
pub mod vari;

// Re-export indices
pub use ndvi::Ndvi;
pub use vari::Vari;

use crate::raster::Raster;

/// Fixed stabilizer added to every denominator; prevents division by zero
/// without clamping the raw index result.
pub const EPSILON: f32 = 1e-5;

/// A vegetation-index calculator over normalized [0,1] band rasters.
pub trait IndexCalculator {
    /// Computes the index raster from the input bands. All bands share the
    /// input grid's dimensions; the result is not clamped to [-1,1].
    fn calculate(&self, bands: &[Raster]) -> Raster;

    /// Number of input bands the calculator expects.
    fn required_bands(&self) -> usize;

    /// Display name of the index.
    fn name(&self) -> &str;
}
