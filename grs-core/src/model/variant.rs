//! Variant metadata.

use grs_geno::info_table::InfoRecord;

/// A genotyped or imputed marker, as described by the info tables.
///
/// Immutable once constructed; lives for the duration of a scoring run.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Marker id (e.g. rsID).
    pub id: String,
    /// Chromosome.
    pub chrom: String,
    /// Position in base pairs.
    pub pos: u64,
    /// Reference allele.
    pub ref_allele: String,
    /// Alternative allele.
    pub alt_allele: String,
    /// Estimated minor allele frequency in the cohort.
    pub maf: f64,
    /// Whether the variant was directly genotyped.
    pub genotyped: bool,
    /// Imputation quality score, NaN when not applicable.
    pub info_score: f64,
}

impl From<InfoRecord> for Variant {
    fn from(r: InfoRecord) -> Self {
        Variant {
            id: r.id,
            chrom: r.chrom,
            pos: r.pos,
            ref_allele: r.ref_allele,
            alt_allele: r.alt_allele,
            maf: r.maf,
            genotyped: r.genotyped,
            info_score: r.info_score,
        }
    }
}
