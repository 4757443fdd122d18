//! grs: genetic risk score computation over imputed genotype data.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "grs",
    version,
    about = "grs: compute genetic risk scores from imputed genotypes",
    long_about = "Computes additive, haplotype, and allele-combination risk scores\n\
                   over VCF genotype sources, with proxy substitution for poorly\n\
                   imputed markers."
)]
struct Cli {
    /// Number of threads to use
    #[arg(long, default_value = "1", global = true)]
    threads: usize,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-sample scores for a score definition
    ComputeScore(commands::compute_score::ComputeScoreArgs),

    /// Convert a text score definition to JSON
    BuildScore(commands::build_score::BuildScoreArgs),

    /// Select the best proxy for each poorly imputed marker
    ProxyFile(commands::proxy_file::ProxyFileArgs),

    /// Check a score's markers against the variant info tables
    SanityCheck(commands::sanity_check::SanityCheckArgs),

    /// Extract a variant info table from a VCF
    InfoFile(commands::info_file::InfoFileArgs),

    /// List the markers a score needs
    ListMarkers(commands::list_markers::ListMarkersArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Set up thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .ok();

    tracing::info!("grs v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {} threads", cli.threads);

    match cli.command {
        Commands::ComputeScore(args) => commands::compute_score::run(args),
        Commands::BuildScore(args) => commands::build_score::run(args),
        Commands::ProxyFile(args) => commands::proxy_file::run(args),
        Commands::SanityCheck(args) => commands::sanity_check::run(args),
        Commands::InfoFile(args) => commands::info_file::run(args),
        Commands::ListMarkers(args) => commands::list_markers::run(args),
    }
}
