// src/processing/classify.rs
use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// Health band of one pixel. Bands are mutually exclusive and exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Healthy,
    Moderate,
    Sparse,
    NonVegetated,
}

/// Index-specific band cutoffs, applied to the re-quantized [-1,1] domain.
///
/// The predicates are: healthy > `healthy`; moderate in (`moderate`,
/// `healthy`]; sparse in [0, `moderate`]; non-vegetated < 0. The upper
/// cutoffs are strict and the zero floor is inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandThresholds {
    pub healthy: f32,
    pub moderate: f32,
}

impl BandThresholds {
    pub const VARI: Self = Self {
        healthy: 0.5,
        moderate: 0.2,
    };

    pub const NDVI: Self = Self {
        healthy: 0.6,
        moderate: 0.2,
    };

    pub fn band(&self, value: f32) -> HealthBand {
        if value > self.healthy {
            HealthBand::Healthy
        } else if value > self.moderate {
            HealthBand::Moderate
        } else if value >= 0.0 {
            HealthBand::Sparse
        } else {
            HealthBand::NonVegetated
        }
    }
}

/// Band percentages for one classified raster; sums to 100 when the
/// raster is non-empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub total_pixels: usize,
    pub healthy_pct: f64,
    pub moderate_pct: f64,
    pub sparse_pct: f64,
    pub non_vegetated_pct: f64,
}

pub fn classify_raster(raster: &Raster, thresholds: BandThresholds) -> Classification {
    let mut healthy = 0usize;
    let mut moderate = 0usize;
    let mut sparse = 0usize;
    let mut non_vegetated = 0usize;

    for &value in raster.data() {
        match thresholds.band(value) {
            HealthBand::Healthy => healthy += 1,
            HealthBand::Moderate => moderate += 1,
            HealthBand::Sparse => sparse += 1,
            HealthBand::NonVegetated => non_vegetated += 1,
        }
    }

    let total = raster.len();
    let pct = |count: usize| {
        if total == 0 {
            0.0
        } else {
            (count as f64 / total as f64) * 100.0
        }
    };

    Classification {
        total_pixels: total,
        healthy_pct: pct(healthy),
        moderate_pct: pct(moderate),
        sparse_pct: pct(sparse),
        non_vegetated_pct: pct(non_vegetated),
    }
}
