// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::processing::classify::BandThresholds;

/// Directory-name prefix the combined stage scans for. The NDVI output
/// directory is rediscovered on storage at analysis time, so renaming it in
/// the configuration to something outside this prefix makes discovery fail
/// even though the stage itself still writes successfully.
pub const NDVI_DIR_PREFIX: &str = "ndvi_output";

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_vari_output_dir() -> String {
    "vari_outputs".to_string()
}

fn default_ndvi_output_dir() -> String {
    "ndvi_outputs".to_string()
}

fn default_vari_history() -> String {
    "vari_analysis.csv".to_string()
}

fn default_ndvi_history() -> String {
    "ndvi_analysis.csv".to_string()
}

fn default_ndvi_threshold() -> f32 {
    0.55
}

fn default_vari_threshold() -> f32 {
    0.175
}

fn default_vari_bands() -> BandThresholds {
    BandThresholds::VARI
}

fn default_ndvi_bands() -> BandThresholds {
    BandThresholds::NDVI
}

/// Everything the three stages need to know about where outputs live and
/// how pixels are classified. All fields default to the stock pipeline
/// values, so an empty JSON object is a valid configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Directory holding the per-index output folders and history tables.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// VARI artifact folder name, relative to `base_dir`.
    #[serde(default = "default_vari_output_dir")]
    pub vari_output_dir: String,

    /// NDVI artifact folder name, relative to `base_dir`.
    #[serde(default = "default_ndvi_output_dir")]
    pub ndvi_output_dir: String,

    /// VARI history table file name, relative to `base_dir`.
    #[serde(default = "default_vari_history")]
    pub vari_history: String,

    /// NDVI history table file name, relative to `base_dir`.
    #[serde(default = "default_ndvi_history")]
    pub ndvi_history: String,

    /// Joint-mask NDVI cutoff, in the combined stage's [0,1] domain.
    #[serde(default = "default_ndvi_threshold")]
    pub ndvi_threshold: f32,

    /// Joint-mask VARI cutoff, in the combined stage's [0,1] domain.
    #[serde(default = "default_vari_threshold")]
    pub vari_threshold: f32,

    /// VARI classification bands, in the [-1,1] re-quantized domain.
    #[serde(default = "default_vari_bands")]
    pub vari_bands: BandThresholds,

    /// NDVI classification bands, in the [-1,1] re-quantized domain.
    #[serde(default = "default_ndvi_bands")]
    pub ndvi_bands: BandThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            vari_output_dir: default_vari_output_dir(),
            ndvi_output_dir: default_ndvi_output_dir(),
            vari_history: default_vari_history(),
            ndvi_history: default_ndvi_history(),
            ndvi_threshold: default_ndvi_threshold(),
            vari_threshold: default_vari_threshold(),
            vari_bands: default_vari_bands(),
            ndvi_bands: default_ndvi_bands(),
        }
    }
}

impl AnalysisConfig {
    /// Stock configuration rooted at `base_dir`, the usual test setup.
    pub fn with_base_dir<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn vari_dir(&self) -> PathBuf {
        self.base_dir.join(&self.vari_output_dir)
    }

    pub fn ndvi_dir(&self) -> PathBuf {
        self.base_dir.join(&self.ndvi_output_dir)
    }

    pub fn vari_history_path(&self) -> PathBuf {
        self.base_dir.join(&self.vari_history)
    }

    pub fn ndvi_history_path(&self) -> PathBuf {
        self.base_dir.join(&self.ndvi_history)
    }
}
