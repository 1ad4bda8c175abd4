// src/history.rs
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// A row of a history table. Implementations carry the CSV column names
/// via serde renames; column order must stay stable across appends.
pub trait HistoryRecord: Serialize + DeserializeOwned {
    /// Fuzzy match against a source image base name, used for the
    /// dashboard's latest-row lookup.
    fn matches_base(&self, base: &str) -> bool;
}

/// One VARI stage invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariRecord {
    #[serde(rename = "DateTime")]
    pub datetime: String,
    #[serde(rename = "Image Name")]
    pub image_name: String,
    #[serde(rename = "VARI Image")]
    pub vari_image: String,
    #[serde(rename = "Mean VARI")]
    pub mean: f64,
    #[serde(rename = "Healthy (%)")]
    pub healthy_pct: f64,
    #[serde(rename = "Moderate (%)")]
    pub moderate_pct: f64,
    #[serde(rename = "Sparse (%)")]
    pub sparse_pct: f64,
    #[serde(rename = "Non-Vegetated (%)")]
    pub non_vegetated_pct: f64,
}

impl HistoryRecord for VariRecord {
    fn matches_base(&self, base: &str) -> bool {
        self.image_name.to_lowercase().contains(&base.to_lowercase())
    }
}

/// One NDVI stage invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdviRecord {
    #[serde(rename = "DateTime")]
    pub datetime: String,
    #[serde(rename = "RGB Image")]
    pub rgb_image: String,
    #[serde(rename = "NIR Image")]
    pub nir_image: String,
    #[serde(rename = "NDVI Image")]
    pub ndvi_image: String,
    #[serde(rename = "Mean NDVI")]
    pub mean: f64,
    #[serde(rename = "Healthy (%)")]
    pub healthy_pct: f64,
    #[serde(rename = "Moderate (%)")]
    pub moderate_pct: f64,
    #[serde(rename = "Sparse (%)")]
    pub sparse_pct: f64,
    #[serde(rename = "Non-Vegetated (%)")]
    pub non_vegetated_pct: f64,
}

impl HistoryRecord for NdviRecord {
    fn matches_base(&self, base: &str) -> bool {
        self.rgb_image.to_lowercase().contains(&base.to_lowercase())
    }
}

/// An append-only tabular file of per-image statistics for one index.
///
/// The only mutation is appending a row; append is read-modify-write
/// (load table, push row, rewrite whole file). The rewrite lands in a
/// sibling temp file and is renamed over the table, so a crash mid-write
/// cannot truncate existing history. Not safe under concurrent writers.
pub struct HistoryTable<R> {
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R: HistoryRecord> HistoryTable<R> {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads every row; a missing file is an implicitly empty table.
    pub fn load(&self) -> Result<Vec<R>, HistoryError> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    /// Appends one row, creating the table (with header) if absent.
    pub fn append(&self, record: R) -> Result<(), HistoryError> {
        let mut rows = self.load()?;
        rows.push(record);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp_path)?;
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Most recent row, if any.
    pub fn latest(&self) -> Result<Option<R>, HistoryError> {
        Ok(self.load()?.into_iter().last())
    }

    /// Most recent row whose source filename fuzzily matches `base`.
    /// `MalformedRecord` when nothing matches.
    pub fn latest_for(&self, base: &str) -> Result<R, HistoryError> {
        self.load()?
            .into_iter()
            .rev()
            .find(|row| row.matches_base(base))
            .ok_or_else(|| HistoryError::MalformedRecord {
                base: base.to_string(),
            })
    }
}
