// src/io/writer.rs
use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

use crate::error::StageError;
use crate::raster::Raster;

/// Rescales one [-1,1] index value to 8-bit. Values outside [-1,1]
/// (possible near zero denominators) saturate rather than wrap.
pub fn quantize(value: f32) -> u8 {
    (((value + 1.0) / 2.0) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Reconstructs the index value a stored 8-bit sample represents.
pub fn dequantize(level: u8) -> f32 {
    (level as f32 / 255.0) * 2.0 - 1.0
}

/// Quantizes an index raster and writes it as a single-channel PNG under
/// `dir`, creating the directory if absent. Returns the artifact path.
pub fn write_index_artifact(
    raster: &Raster,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, StageError> {
    fs::create_dir_all(dir)?;
    let img = GrayImage::from_fn(raster.width() as u32, raster.height() as u32, |x, y| {
        Luma([quantize(raster.get(x as usize, y as usize))])
    });
    let path = dir.join(file_name);
    img.save(&path)?;
    Ok(path)
}

/// Re-reads a just-written artifact and reconstructs the [-1,1] raster.
/// This round-trip is authoritative: all reported statistics reflect the
/// quantized values, not the original floating-point computation.
pub fn reload_index_artifact(path: &Path) -> Result<Raster, StageError> {
    let img = image::open(path)?.to_luma8();
    let (width, height) = img.dimensions();
    let data = img.pixels().map(|p| dequantize(p.0[0])).collect();
    Ok(Raster::from_vec(width as usize, height as usize, data))
}
