// src/main.rs
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cropsight::cli::{Cli, Commands};
use cropsight::config::AnalysisConfig;
use cropsight::processing;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }

    match &cli.command {
        Commands::Vari { rgb } => {
            processing::run_vari(&config, rgb)?;
        }
        Commands::Ndvi { rgb, nir } => {
            processing::run_ndvi(&config, rgb, nir)?;
        }
        Commands::Combined {
            rgb,
            nir,
            save,
            ndvi_threshold,
            vari_threshold,
        } => {
            if let Some(threshold) = ndvi_threshold {
                config.ndvi_threshold = *threshold;
            }
            if let Some(threshold) = vari_threshold {
                config.vari_threshold = *threshold;
            }

            match processing::run_combined(&config, rgb, nir) {
                Some(analysis) => {
                    if let Some(path) = save {
                        analysis.composite().save(path)?;
                        println!("Combined summary saved to: {}", path.display());
                    }
                }
                None => {
                    println!("Combined analysis produced no result; see diagnostics above.");
                }
            }
        }
    }

    Ok(())
}
