// src/processing/stage.rs
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::AnalysisConfig;
use crate::error::StageError;
use crate::history::{HistoryTable, NdviRecord, VariRecord};
use crate::io::{reader, writer};
use crate::processing::classify::{classify_raster, BandThresholds, Classification};
use crate::processing::indices::{IndexCalculator, Ndvi, Vari};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What one successful stage invocation produced: the persisted artifact
/// and the statistics appended to the history table. Statistics reflect
/// the re-quantized artifact, not the raw floating-point raster.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub artifact_path: PathBuf,
    pub mean: f64,
    pub classification: Classification,
    pub timestamp: String,
}

/// Base name of a source image (file stem, extension stripped).
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Runs the VARI stage: compute the index from an RGB source, persist the
/// quantized artifact, reload it, classify, and append a history row.
pub fn run_vari(config: &AnalysisConfig, rgb_path: &Path) -> Result<StageOutput, StageError> {
    let bands = reader::read_rgb_bands(rgb_path)?;
    let calculator = Vari::new(0, 1, 2, None);
    let raster = calculator.calculate(&[bands.red, bands.green, bands.blue]);

    let artifact_name = format!("vari_{}.png", base_name(rgb_path));
    let artifact_path = writer::write_index_artifact(&raster, &config.vari_dir(), &artifact_name)?;

    // Reload the just-written artifact; the quantized values are the
    // statistics domain from here on.
    let raster = writer::reload_index_artifact(&artifact_path)?;
    let mean = raster.mean();
    let classification = classify_raster(&raster, config.vari_bands);
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    let table = HistoryTable::<VariRecord>::new(config.vari_history_path());
    table.append(VariRecord {
        datetime: timestamp.clone(),
        image_name: file_name(rgb_path),
        vari_image: artifact_name,
        mean,
        healthy_pct: classification.healthy_pct,
        moderate_pct: classification.moderate_pct,
        sparse_pct: classification.sparse_pct,
        non_vegetated_pct: classification.non_vegetated_pct,
    })?;

    print_summary(
        calculator.name(),
        &file_name(rgb_path),
        &timestamp,
        mean,
        &classification,
        config.vari_bands,
        &artifact_path,
        table.path(),
    );

    Ok(StageOutput {
        artifact_path,
        mean,
        classification,
        timestamp,
    })
}

/// Runs the NDVI stage over an RGB/NIR pair. The two sources must share
/// one pixel grid; a mismatch is rejected before any computation.
pub fn run_ndvi(
    config: &AnalysisConfig,
    rgb_path: &Path,
    nir_path: &Path,
) -> Result<StageOutput, StageError> {
    let bands = reader::read_rgb_bands(rgb_path)?;
    let nir = reader::read_luminance(nir_path)?;

    if bands.dimensions() != nir.dimensions() {
        let (rgb_width, rgb_height) = bands.dimensions();
        let (nir_width, nir_height) = nir.dimensions();
        return Err(StageError::DimensionMismatch {
            rgb_width,
            rgb_height,
            nir_width,
            nir_height,
        });
    }

    let calculator = Ndvi::new(0, 1, None);
    let raster = calculator.calculate(&[nir, bands.red]);

    let artifact_name = format!("{}_ndvi.png", base_name(rgb_path));
    let artifact_path = writer::write_index_artifact(&raster, &config.ndvi_dir(), &artifact_name)?;

    let raster = writer::reload_index_artifact(&artifact_path)?;
    let mean = raster.mean();
    let classification = classify_raster(&raster, config.ndvi_bands);
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    let table = HistoryTable::<NdviRecord>::new(config.ndvi_history_path());
    table.append(NdviRecord {
        datetime: timestamp.clone(),
        rgb_image: file_name(rgb_path),
        nir_image: file_name(nir_path),
        ndvi_image: artifact_name,
        mean,
        healthy_pct: classification.healthy_pct,
        moderate_pct: classification.moderate_pct,
        sparse_pct: classification.sparse_pct,
        non_vegetated_pct: classification.non_vegetated_pct,
    })?;

    print_summary(
        calculator.name(),
        &file_name(rgb_path),
        &timestamp,
        mean,
        &classification,
        config.ndvi_bands,
        &artifact_path,
        table.path(),
    );

    Ok(StageOutput {
        artifact_path,
        mean,
        classification,
        timestamp,
    })
}

#[allow(clippy::too_many_arguments)]
fn print_summary(
    index_name: &str,
    source_name: &str,
    timestamp: &str,
    mean: f64,
    classification: &Classification,
    thresholds: BandThresholds,
    artifact_path: &Path,
    history_path: &Path,
) {
    println!("\n{index_name} analysis for image: {source_name}");
    println!("Processed at: {timestamp}");
    println!("Mean {index_name}: {mean:.3}");
    println!(
        "- Healthy vegetation (>{:.1}): {:.2}%",
        thresholds.healthy, classification.healthy_pct
    );
    println!(
        "- Moderate vegetation ({:.1}-{:.1}): {:.2}%",
        thresholds.moderate, thresholds.healthy, classification.moderate_pct
    );
    println!(
        "- Sparse vegetation (0-{:.1}): {:.2}%",
        thresholds.moderate, classification.sparse_pct
    );
    println!(
        "- Non-vegetated (<0): {:.2}%",
        classification.non_vegetated_pct
    );
    println!("{index_name} image saved to: {}", artifact_path.display());
    println!("Analysis results updated in: {}", history_path.display());
}
