//! Sample-list establishment across genotype sources.
//!
//! Every source in a run must expose the same samples in the same
//! order; the first source establishes the list for the score vector.

use std::collections::HashSet;

use anyhow::{bail, Result};

/// Establish the run's ordered sample list from the per-source lists.
///
/// Fails when a source disagrees with the first one, or when a list
/// contains a duplicate id (per-sample columns could not be told apart
/// afterwards).
pub fn establish_samples(sources: &[&[String]]) -> Result<Vec<String>> {
    let first = match sources.first() {
        Some(ids) => *ids,
        None => bail!("No genotype sources provided"),
    };

    let mut seen = HashSet::with_capacity(first.len());
    for id in first {
        if !seen.insert(id.as_str()) {
            bail!("Duplicate sample id in genotype source: {}", id);
        }
    }

    for (i, ids) in sources.iter().enumerate().skip(1) {
        if ids.len() != first.len() || ids.iter().zip(first).any(|(a, b)| a != b) {
            bail!(
                "Genotype source {} lists different samples than the first source",
                i + 1
            );
        }
    }

    Ok(first.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matching_sources() {
        let a = ids(&["S1", "S2", "S3"]);
        let b = ids(&["S1", "S2", "S3"]);
        let samples = establish_samples(&[&a, &b]).unwrap();
        assert_eq!(samples, a);
    }

    #[test]
    fn test_order_mismatch_is_fatal() {
        let a = ids(&["S1", "S2"]);
        let b = ids(&["S2", "S1"]);
        assert!(establish_samples(&[&a, &b]).is_err());
    }

    #[test]
    fn test_duplicate_sample_is_fatal() {
        let a = ids(&["S1", "S1"]);
        let err = establish_samples(&[&a]).unwrap_err();
        assert!(err.to_string().contains("Duplicate sample id"));
    }

    #[test]
    fn test_no_sources_is_fatal() {
        assert!(establish_samples(&[]).is_err());
    }
}
