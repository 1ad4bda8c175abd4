// src/processing/indices/vari.rs
use rayon::prelude::*;

use super::{IndexCalculator, EPSILON};
use crate::raster::Raster;

/// Visible Atmospherically Resistant Index (VARI) calculator:
/// `(G - R) / (G + R - B + eps)`.
pub struct Vari {
    red_index: usize,
    green_index: usize,
    blue_index: usize,
    name: String,
}

impl Vari {
    pub fn new(
        red_index: usize,
        green_index: usize,
        blue_index: usize,
        name: Option<String>,
    ) -> Self {
        Self {
            red_index,
            green_index,
            blue_index,
            name: name.unwrap_or_else(|| "VARI".to_string()),
        }
    }
}

impl IndexCalculator for Vari {
    fn calculate(&self, bands: &[Raster]) -> Raster {
        let red = bands[self.red_index].data();
        let green = bands[self.green_index].data();
        let blue = bands[self.blue_index].data();
        let shape = bands[self.red_index].dimensions();

        let mut result = vec![0.0f32; red.len()];
        result.par_iter_mut().enumerate().for_each(|(i, value)| {
            let r = red[i];
            let g = green[i];
            let b = blue[i];
            *value = (g - r) / (g + r - b + EPSILON);
        });

        Raster::from_vec(shape.0, shape.1, result)
    }

    fn required_bands(&self) -> usize {
        3 // red, green, blue
    }

    fn name(&self) -> &str {
        &self.name
    }
}
