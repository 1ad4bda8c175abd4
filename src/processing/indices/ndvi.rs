// src/processing/indices/ndvi.rs
use rayon::prelude::*;

use super::{IndexCalculator, EPSILON};
use crate::raster::Raster;

/// Normalized Difference Vegetation Index (NDVI) calculator:
/// `(NIR - R) / (NIR + R + eps)`.
pub struct Ndvi {
    nir_index: usize,
    red_index: usize,
    name: String,
}

impl Ndvi {
    pub fn new(nir_index: usize, red_index: usize, name: Option<String>) -> Self {
        Self {
            nir_index,
            red_index,
            name: name.unwrap_or_else(|| "NDVI".to_string()),
        }
    }
}

impl IndexCalculator for Ndvi {
    fn calculate(&self, bands: &[Raster]) -> Raster {
        let nir = bands[self.nir_index].data();
        let red = bands[self.red_index].data();
        let shape = bands[self.nir_index].dimensions();

        let mut result = vec![0.0f32; nir.len()];
        result.par_iter_mut().enumerate().for_each(|(i, value)| {
            let n = nir[i];
            let r = red[i];
            *value = (n - r) / (n + r + EPSILON);
        });

        Raster::from_vec(shape.0, shape.1, result)
    }

    fn required_bands(&self) -> usize {
        2 // nir, red
    }

    fn name(&self) -> &str {
        &self.name
    }
}
