//! Select proxies for a score's poorly genotyped markers.
//!
//! grs proxy-file --score-file ... --candidates-file ... --info-file ... --out ...

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use grs_core::model::variant::Variant;
use grs_core::resolver::{select_proxy, ProxyChoice};
use grs_core::score::{RiskScore, VariantFeatureMap};
use grs_geno::proxy_file::{read_candidate_pools, write_proxy_ids};

#[derive(Args)]
pub struct ProxyFileArgs {
    /// Score definition file
    #[arg(long)]
    score_file: String,

    /// Candidate pools: id, candidate per line (repeated per id)
    #[arg(long)]
    candidates_file: String,

    /// Variant info table, one per genotype source (repeatable)
    #[arg(long = "info-file", required = true)]
    info_files: Vec<String>,

    /// Output proxy mapping file
    #[arg(long)]
    out: String,
}

pub fn run(args: ProxyFileArgs) -> Result<()> {
    let score = RiskScore::parse(&args.score_file)?;
    let feature_map = VariantFeatureMap::new(&score)?;
    let pools = read_candidate_pools(&args.candidates_file)?;

    let mut targets = feature_map.variant_ids().clone();
    for candidates in pools.values() {
        targets.extend(candidates.iter().cloned());
    }
    let catalog = super::load_catalog(&args.info_files, Some(targets))?;

    // Sorted for stable logs and a reproducible file.
    let mut ids: Vec<&String> = feature_map.variant_ids().iter().collect();
    ids.sort();

    let mut selected = HashMap::new();
    for id in ids {
        let original = catalog
            .lookup(id)
            .with_context(|| format!("Marker {} not found in any info table", id))?;

        let empty = Vec::new();
        let pool = pools.get(id).unwrap_or(&empty);
        let candidates: Vec<&Variant> = pool
            .iter()
            .filter_map(|candidate| {
                let variant = catalog.lookup(candidate);
                if variant.is_none() {
                    warn!("Candidate {} for {} not in any info table, skipped", candidate, id);
                }
                variant
            })
            .collect();

        match select_proxy(original, &candidates) {
            ProxyChoice::Unneeded => {}
            ProxyChoice::Selected(proxy_id) => {
                info!("{} -> {}", id, proxy_id);
                selected.insert(id.clone(), proxy_id);
            }
            ProxyChoice::NoneSuitable => {
                warn!("No suitable proxy for {}", id);
            }
        }
    }

    write_proxy_ids(&args.out, &selected)?;
    info!("Wrote {} proxies to {}", selected.len(), args.out);

    Ok(())
}
