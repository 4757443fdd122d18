//! Core trait for genotype sources.

use anyhow::Result;

/// Called alleles for one sample at one marker.
///
/// `None` means no call; `Some` holds the allele base strings in file
/// order (two entries for a diploid call).
pub type AlleleCall = Option<Vec<String>>;

/// A coordinate-indexed store of genotype calls.
///
/// The scoring engine queries by (chromosome, position, marker id) and
/// receives one `AlleleCall` per sample, in the order of `sample_ids`.
/// Implementations are not required to be thread-safe for reads; the
/// engine serializes access per source with a lock.
pub trait GenotypeSource: Send {
    /// Sample IDs in the order calls are returned.
    fn sample_ids(&self) -> &[String];

    /// Calls for the marker with the given id at the given coordinate.
    ///
    /// Returns `Ok(None)` when no record with that id exists at the
    /// coordinate. I/O and parse failures are errors.
    fn query(&mut self, chrom: &str, pos: u64, id: &str) -> Result<Option<Vec<AlleleCall>>>;
}
