//! Check a score's markers against the available metadata.
//!
//! grs sanity-check --score-file ... --info-file ...

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::warn;

use grs_core::sanity;
use grs_core::score::{RiskScore, VariantFeatureMap};
use grs_geno::proxy_file::read_proxy_ids;

#[derive(Args)]
pub struct SanityCheckArgs {
    /// Score definition file
    #[arg(long)]
    score_file: String,

    /// Variant info table, one per genotype source (repeatable)
    #[arg(long = "info-file", required = true)]
    info_files: Vec<String>,

    /// Proxy mapping file (id, proxy)
    #[arg(long)]
    proxy_file: Option<String>,

    /// Minimal acceptable imputation score; omit to skip the check
    #[arg(long)]
    score_threshold: Option<f64>,

    /// Report file; stdout when omitted
    #[arg(long)]
    out: Option<String>,
}

pub fn run(args: SanityCheckArgs) -> Result<()> {
    let score = RiskScore::parse(&args.score_file)?;
    let feature_map = VariantFeatureMap::new(&score)?;

    let proxy_ids = match &args.proxy_file {
        Some(path) => read_proxy_ids(path)?,
        None => HashMap::new(),
    };

    let targets = super::catalog_targets(&feature_map, &proxy_ids);
    let catalog = super::load_catalog(&args.info_files, Some(targets))?;

    let threshold = args.score_threshold.unwrap_or(f64::NAN);
    let report = sanity::check(&feature_map, &catalog, &proxy_ids, threshold);

    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path))?;
            report.write(BufWriter::new(file))?;
        }
        None => report.write(std::io::stdout().lock())?,
    }

    if !report.poor_proxies.is_empty() {
        warn!("{} proxies are poorly imputed", report.poor_proxies.len());
    }
    if !report.passed() {
        bail!(
            "Sanity check failed: {} markers missing, {} poorly imputed without a proxy",
            report.missing.len(),
            report.poor_imputation.len()
        );
    }

    Ok(())
}
