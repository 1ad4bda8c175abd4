// src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cropsight")]
#[command(about = "Vegetation-index analysis for paired RGB/NIR cropland imagery")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file (output folders, history tables, thresholds)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory for output folders and history tables
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// VARI from a single RGB image: (G-R)/(G+R-B)
    Vari {
        /// RGB source image
        #[arg(short, long)]
        rgb: PathBuf,
    },

    /// NDVI from an RGB/NIR image pair: (NIR-R)/(NIR+R)
    Ndvi {
        /// RGB source image
        #[arg(short, long)]
        rgb: PathBuf,

        /// NIR source image (decoded as luminance)
        #[arg(short, long)]
        nir: PathBuf,
    },

    /// Combined NDVI+VARI stress analysis with a three-panel summary
    Combined {
        /// RGB source image
        #[arg(short, long)]
        rgb: PathBuf,

        /// NIR source image (decoded as luminance)
        #[arg(short, long)]
        nir: PathBuf,

        /// Save the composite summary image here
        #[arg(short = 'o', long)]
        save: Option<PathBuf>,

        /// NDVI vegetation cutoff in the [0,1] artifact domain
        #[arg(long)]
        ndvi_threshold: Option<f32>,

        /// VARI health cutoff in the [0,1] artifact domain
        #[arg(long)]
        vari_threshold: Option<f32>,
    },
}
