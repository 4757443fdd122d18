//! Extract a variant info table from a VCF.
//!
//! grs info-file --vcf ... --out ...

use anyhow::Result;
use clap::Args;
use tracing::info;

use grs_core::score::{RiskScore, VariantFeatureMap};
use grs_geno::info_table::{extract_from_vcf, write_info_table, VcfExtractSettings};

#[derive(Args)]
pub struct InfoFileArgs {
    /// Input VCF (plain or gzipped)
    #[arg(long)]
    vcf: String,

    /// Output info table (.gz for gzipped)
    #[arg(long)]
    out: String,

    /// Flag marking directly genotyped variants
    #[arg(long, default_value = "TYPED")]
    typed_flag: String,

    /// Look for the typed flag in FILTER instead of INFO
    #[arg(long)]
    typed_in_filter: bool,

    /// INFO key holding the imputation score
    #[arg(long, default_value = "INFO")]
    score_key: String,

    /// Only extract the markers this score definition needs
    #[arg(long)]
    score_file: Option<String>,
}

pub fn run(args: InfoFileArgs) -> Result<()> {
    let targets = match &args.score_file {
        Some(path) => {
            let score = RiskScore::parse(path)?;
            Some(VariantFeatureMap::new(&score)?.variant_ids().clone())
        }
        None => None,
    };

    let settings = VcfExtractSettings {
        typed_flag: args.typed_flag.clone(),
        typed_in_filter: args.typed_in_filter,
        score_key: args.score_key.clone(),
    };
    let records = extract_from_vcf(&args.vcf, &settings, targets.as_ref())?;
    info!("Extracted {} records from {}", records.len(), args.vcf);

    let source = super::source_name(&args.vcf)?;
    write_info_table(&args.out, &source, &records)?;
    info!("Wrote {}", args.out);

    Ok(())
}
