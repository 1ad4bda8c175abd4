// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the VARI and NDVI stages. All are local to one invocation:
/// no partial artifact or history row is written once a stage has failed.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("input image not found: {path}")]
    MissingInput { path: PathBuf },

    #[error(
        "RGB and NIR pixel grids differ: {rgb_width}x{rgb_height} vs {nir_width}x{nir_height}"
    )]
    DimensionMismatch {
        rgb_width: usize,
        rgb_height: usize,
        nir_width: usize,
        nir_height: usize,
    },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Failures of the append-by-rewrite history tables.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history table error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no history row matches base name `{base}`")]
    MalformedRecord { base: String },
}

/// Failures of the combined stage's storage round-trip. These are logged
/// and collapsed to `None` by the public entry point, never surfaced.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no NDVI output directory found under {0}")]
    NoNdviDir(PathBuf),

    #[error("output directory does not exist: {0}")]
    MissingDir(PathBuf),

    #[error("no {indicator} artifact for `{base}` in {dir}")]
    ArtifactNotFound {
        indicator: &'static str,
        base: String,
        dir: PathBuf,
    },

    #[error("history table not found: {0}")]
    MissingHistory(PathBuf),

    #[error("failed to load artifact {path}: {source}")]
    UnreadableArtifact { path: PathBuf, source: StageError },

    #[error("artifact pixel grids differ: {ndvi_width}x{ndvi_height} vs {vari_width}x{vari_height}")]
    ArtifactShapeMismatch {
        ndvi_width: usize,
        ndvi_height: usize,
        vari_width: usize,
        vari_height: usize,
    },

    #[error(transparent)]
    History(#[from] HistoryError),
}
