//! Convert a text score definition to its JSON form.
//!
//! grs build-score --score-file ... --out ...

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use grs_core::score::{RiskScore, VariantFeatureMap};

#[derive(Args)]
pub struct BuildScoreArgs {
    /// Text score definition file
    #[arg(long)]
    score_file: String,

    /// Output JSON file
    #[arg(long)]
    out: String,
}

pub fn run(args: BuildScoreArgs) -> Result<()> {
    let score = RiskScore::parse(&args.score_file)?;

    // Validate before serializing, so a broken definition never
    // becomes a plausible-looking JSON file.
    let feature_map = VariantFeatureMap::new(&score)?;
    info!(
        "Score '{}': {} features over {} markers",
        score.name,
        score.features.len(),
        feature_map.variant_ids().len()
    );

    let file = File::create(&args.out)
        .with_context(|| format!("Failed to create {}", args.out))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &score)
        .with_context(|| format!("Failed to write {}", args.out))?;

    Ok(())
}
