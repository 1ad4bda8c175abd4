// src/io/reader.rs
use std::path::Path;

use crate::error::StageError;
use crate::raster::Raster;

/// The three channels of an RGB source, normalized to [0,1].
pub struct RgbBands {
    pub red: Raster,
    pub green: Raster,
    pub blue: Raster,
}

impl RgbBands {
    pub fn dimensions(&self) -> (usize, usize) {
        self.red.dimensions()
    }
}

fn check_exists(path: &Path) -> Result<(), StageError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StageError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

/// Decodes an RGB image into three normalized band rasters.
pub fn read_rgb_bands(path: &Path) -> Result<RgbBands, StageError> {
    check_exists(path)?;
    let img = image::open(path)?.to_rgb8();
    let (width, height) = img.dimensions();
    let count = (width * height) as usize;

    let mut red = Vec::with_capacity(count);
    let mut green = Vec::with_capacity(count);
    let mut blue = Vec::with_capacity(count);
    for pixel in img.pixels() {
        red.push(pixel.0[0] as f32 / 255.0);
        green.push(pixel.0[1] as f32 / 255.0);
        blue.push(pixel.0[2] as f32 / 255.0);
    }

    let (width, height) = (width as usize, height as usize);
    Ok(RgbBands {
        red: Raster::from_vec(width, height, red),
        green: Raster::from_vec(width, height, green),
        blue: Raster::from_vec(width, height, blue),
    })
}

/// Decodes a NIR image as a single luminance raster normalized to [0,1].
pub fn read_luminance(path: &Path) -> Result<Raster, StageError> {
    check_exists(path)?;
    let img = image::open(path)?.to_luma8();
    let (width, height) = img.dimensions();
    let data = img.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
    Ok(Raster::from_vec(width as usize, height as usize, data))
}

/// Loads a grayscale artifact into the combined stage's [0,1] working
/// domain. Distinct from `reload_index_artifact`, which reconstructs the
/// [-1,1] index domain; the joint-mask thresholds are calibrated to [0,1].
pub fn read_gray_unit(path: &Path) -> Result<Raster, StageError> {
    read_luminance(path)
}
