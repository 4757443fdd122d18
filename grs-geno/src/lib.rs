//! grs-geno: Genotype and variant-metadata I/O for GRS-RS
//!
//! Provides the GenotypeSource trait with a coordinate-indexed VCF
//! implementation, the variant-info table format, the proxy mapping
//! file, and sample-list handling.

pub mod info_table;
pub mod proxy_file;
pub mod sample;
pub mod traits;
pub mod vcf;

pub use traits::{AlleleCall, GenotypeSource};
