use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chiforest::analysis::{AnalysisConfig, ChiAnalysis};
use chiforest::render::ImageFormat;

pub struct RunArgs {
    pub config: PathBuf,
    pub render: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<ImageFormat>,
    pub summary: Option<PathBuf>,
}

/// Run the chi selection
pub fn run(args: RunArgs) -> Result<()> {
    let mut config = AnalysisConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if let Some(mode) = args.render {
        config.render.mode = mode;
    }
    if let Some(dir) = args.output_dir {
        config.render.image.output_dir = dir;
    }
    if let Some(format) = args.format {
        config.render.image.format = format;
    }

    info!("chiforest - chi_c / chi_b selection");
    info!("===================================");
    info!("Config: {}", args.config.display());
    for (label, path) in &config.samples {
        info!("  {}: {}", label, path.display());
    }

    let analysis = ChiAnalysis::new(config).context("Invalid analysis configuration")?;
    if analysis.sample_labels().is_empty() {
        anyhow::bail!("No sample of the configured types and beams has a forest");
    }
    let outcome = analysis.run().context("Analysis failed")?;

    let stats = &outcome.stats;
    println!("Rows processed:      {}", stats.rows_processed);
    println!("Candidates seen:     {}", stats.candidates_seen);
    println!("Candidates accepted: {}", stats.candidates_accepted);
    println!("Candidates skipped:  {}", stats.skipped_candidates);
    println!(
        "Number of DiMuons: {} and number of conversions: {}",
        stats.dimuons_used, stats.conversions_used
    );
    for image in &outcome.images {
        println!("Plot: {}", image.display());
    }

    if let Some(path) = args.summary {
        let json = serde_json::to_string_pretty(stats).context("Failed to serialize summary")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    Ok(())
}
