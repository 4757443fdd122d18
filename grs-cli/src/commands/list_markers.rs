//! List the markers a score needs.
//!
//! grs list-markers --score-file ...

use anyhow::{Context, Result};
use clap::Args;

use grs_core::score::{RiskScore, VariantFeatureMap};

#[derive(Args)]
pub struct ListMarkersArgs {
    /// Score definition file
    #[arg(long)]
    score_file: String,
}

pub fn run(args: ListMarkersArgs) -> Result<()> {
    let score = RiskScore::parse(&args.score_file)?;
    let feature_map = VariantFeatureMap::new(&score)?;

    let mut ids: Vec<&String> = feature_map.variant_ids().iter().collect();
    ids.sort();

    println!("Marker\tFeature\tType\tWeight");
    for id in ids {
        for name in feature_map.features_for_variant(id) {
            let feature = feature_map
                .feature_by_name(name)
                .with_context(|| format!("Feature {} vanished from the index", name))?;
            println!("{}\t{}\t{}\t{}", id, name, feature.type_code(), feature.weight());
        }
    }

    Ok(())
}
