//! Compute per-sample risk scores.
//!
//! grs compute-score --score-file ... --info-file ... --vcf ... --out ...

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use grs_core::computer::ScoreComputer;
use grs_core::resolver::build_proxy_map;
use grs_core::score::{RiskScore, VariantFeatureMap};
use grs_geno::proxy_file::read_proxy_ids;
use grs_geno::vcf::VcfReader;

#[derive(Args)]
pub struct ComputeScoreArgs {
    /// Score definition file
    #[arg(long)]
    score_file: String,

    /// Variant info table, one per genotype source (repeatable)
    #[arg(long = "info-file", required = true)]
    info_files: Vec<String>,

    /// VCF genotype source (repeatable)
    #[arg(long = "vcf", required = true)]
    vcf_files: Vec<String>,

    /// Proxy mapping file (id, proxy)
    #[arg(long)]
    proxy_file: Option<String>,

    /// Output file for per-sample scores
    #[arg(long)]
    out: String,
}

pub fn run(args: ComputeScoreArgs) -> Result<()> {
    let score = RiskScore::parse(&args.score_file)?;
    info!("Score '{}' version {}: {} features", score.name, score.version, score.features.len());
    let feature_map = VariantFeatureMap::new(&score)?;

    let proxy_ids = match &args.proxy_file {
        Some(path) => read_proxy_ids(path)?,
        None => HashMap::new(),
    };

    let targets = super::catalog_targets(&feature_map, &proxy_ids);
    let catalog = super::load_catalog(&args.info_files, Some(targets))?;
    info!("Catalog holds {} variants", catalog.len());

    let proxies = build_proxy_map(&proxy_ids, &catalog)?;

    let mut sources = Vec::with_capacity(args.vcf_files.len());
    for path in &args.vcf_files {
        let name = super::source_name(path)?;
        let reader =
            VcfReader::open(path).with_context(|| format!("Failed to open VCF {}", path))?;
        sources.push((name, reader));
    }

    let computer = ScoreComputer::new(sources)?;
    let scores = computer.run(&feature_map, &catalog, &proxies)?;

    // Output is written only once the whole run has succeeded.
    let file = File::create(&args.out)
        .with_context(|| format!("Failed to create {}", args.out))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "Sample\tScore")?;
    for (sample, value) in computer.sample_names().iter().zip(&scores) {
        writeln!(writer, "{}\t{}", sample, value)?;
    }
    writer.flush()?;
    info!("Wrote {} scores to {}", scores.len(), args.out);

    Ok(())
}
