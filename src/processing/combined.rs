// src/processing/combined.rs
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::warn;

use crate::config::{AnalysisConfig, NDVI_DIR_PREFIX};
use crate::error::DiscoveryError;
use crate::history::{HistoryTable, NdviRecord};
use crate::io::reader;
use crate::processing::stage::{self, base_name};
use crate::raster::Raster;
use crate::render::{self, LegendEntry, MASK_LEGEND};

const HISTOGRAM_PANEL: (u32, u32) = (256, 192);

/// The combined stage's renderable result: three panels plus the data
/// behind them. Never persisted by the core; the dashboard (or the CLI,
/// as a convenience) decides whether to save the composite.
pub struct CombinedAnalysis {
    pub width: usize,
    pub height: usize,
    /// Per-pixel codes: 0 non-vegetated, 1 healthy, 2 potentially stressed.
    pub mask: Vec<u8>,
    pub ndvi_panel: RgbImage,
    pub mask_panel: RgbImage,
    pub histogram_panel: RgbImage,
    pub legend: [LegendEntry; 3],
    /// Most recent NDVI history row, for narrative display only.
    pub latest_record: Option<NdviRecord>,
}

impl CombinedAnalysis {
    /// Side-by-side composite of the three panels with legend swatches.
    pub fn composite(&self) -> RgbImage {
        render::composite(
            &[&self.ndvi_panel, &self.mask_panel, &self.histogram_panel],
            &self.legend,
        )
    }
}

/// Per-pixel joint classification of co-registered NDVI and VARI rasters
/// in the [0,1] domain. The policy is asymmetric by design: a pixel below
/// the NDVI threshold is non-vegetated no matter what VARI says; VARI only
/// splits NDVI-vegetated pixels into healthy vs potentially stressed.
pub fn joint_mask(ndvi: &Raster, vari: &Raster, ndvi_threshold: f32, vari_threshold: f32) -> Vec<u8> {
    ndvi.data()
        .iter()
        .zip(vari.data())
        .map(|(&n, &v)| {
            if n >= ndvi_threshold {
                if v >= vari_threshold {
                    1
                } else {
                    2
                }
            } else {
                0
            }
        })
        .collect()
}

/// Runs the full combined analysis: both index stages (side effects
/// forced), then a storage round-trip rediscovering their artifacts, the
/// joint mask, and the three-panel render.
///
/// Every failure is local: diagnostics are logged and the caller gets
/// `None`, never a panic or an error. Artifacts and history rows already
/// written by the stages are left intact.
pub fn run_combined(
    config: &AnalysisConfig,
    rgb_path: &Path,
    nir_path: &Path,
) -> Option<CombinedAnalysis> {
    if let Err(err) = stage::run_vari(config, rgb_path) {
        warn!(error = %err, "VARI stage failed, combined analysis aborted");
        return None;
    }
    if let Err(err) = stage::run_ndvi(config, rgb_path, nir_path) {
        warn!(error = %err, "NDVI stage failed, combined analysis aborted");
        return None;
    }

    match build_analysis(config, rgb_path) {
        Ok(analysis) => Some(analysis),
        Err(err) => {
            warn!(error = %err, "combined analysis discovery failed");
            None
        }
    }
}

/// Steps 2-5: rediscover the artifacts the stages just persisted and build
/// the renderable result from them, never from in-memory stage outputs.
/// The round-trip is the contract: discovery can fail independently of
/// computation success.
fn build_analysis(
    config: &AnalysisConfig,
    rgb_path: &Path,
) -> Result<CombinedAnalysis, DiscoveryError> {
    let base = base_name(rgb_path);

    let ndvi_dir = latest_ndvi_dir(&config.base_dir)?;
    let vari_dir = config.vari_dir();
    if !vari_dir.is_dir() {
        return Err(DiscoveryError::MissingDir(vari_dir));
    }

    let ndvi_artifact = find_artifact(&ndvi_dir, &base, "ndvi")?;
    let vari_artifact = find_artifact(&vari_dir, &base, "vari")?;

    let history = HistoryTable::<NdviRecord>::new(config.ndvi_history_path());
    if !history.exists() {
        return Err(DiscoveryError::MissingHistory(config.ndvi_history_path()));
    }

    // Combined-stage working domain is [0,1], unlike the stages' own
    // [-1,1] reconstruction; the joint thresholds are calibrated to it.
    let ndvi = load_unit(&ndvi_artifact)?;
    let vari = load_unit(&vari_artifact)?;
    if ndvi.dimensions() != vari.dimensions() {
        return Err(DiscoveryError::ArtifactShapeMismatch {
            ndvi_width: ndvi.width(),
            ndvi_height: ndvi.height(),
            vari_width: vari.width(),
            vari_height: vari.height(),
        });
    }

    let latest_record = history.latest()?;
    let mask = joint_mask(&ndvi, &vari, config.ndvi_threshold, config.vari_threshold);

    let ndvi_panel = render::render_heatmap(&ndvi);
    let mask_panel = render::render_mask(&mask, ndvi.width(), ndvi.height());
    let histogram_panel = render::render_histogram(
        ndvi.data(),
        vari.data(),
        config.ndvi_threshold,
        config.vari_threshold,
        HISTOGRAM_PANEL.0,
        HISTOGRAM_PANEL.1,
    );

    Ok(CombinedAnalysis {
        width: ndvi.width(),
        height: ndvi.height(),
        mask,
        ndvi_panel,
        mask_panel,
        histogram_panel,
        legend: MASK_LEGEND,
        latest_record,
    })
}

fn load_unit(path: &Path) -> Result<Raster, DiscoveryError> {
    reader::read_gray_unit(path).map_err(|source| DiscoveryError::UnreadableArtifact {
        path: path.to_path_buf(),
        source,
    })
}

/// Scans the base directory for NDVI output folders and picks the
/// reverse-lexically first, i.e. the most recent under a date-suffixed
/// naming scheme.
fn latest_ndvi_dir(base_dir: &Path) -> Result<PathBuf, DiscoveryError> {
    let entries = fs::read_dir(base_dir)
        .map_err(|_| DiscoveryError::NoNdviDir(base_dir.to_path_buf()))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(NDVI_DIR_PREFIX))
        })
        .collect();

    candidates.sort();
    candidates
        .pop()
        .ok_or_else(|| DiscoveryError::NoNdviDir(base_dir.to_path_buf()))
}

/// Probes a directory for `{indicator}_{base}.png` or
/// `{base}_{indicator}.png`, case-insensitive.
fn find_artifact(
    dir: &Path,
    base: &str,
    indicator: &'static str,
) -> Result<PathBuf, DiscoveryError> {
    let base_lower = base.to_lowercase();
    let prefixed = format!("{indicator}_{base_lower}.png");
    let suffixed = format!("{base_lower}_{indicator}.png");

    let entries = fs::read_dir(dir).map_err(|_| DiscoveryError::MissingDir(dir.to_path_buf()))?;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name == prefixed || name == suffixed {
            return Ok(entry.path());
        }
    }

    Err(DiscoveryError::ArtifactNotFound {
        indicator,
        base: base.to_string(),
        dir: dir.to_path_buf(),
    })
}
