//! Scoring features and their contribution functions.
//!
//! A feature maps one or more markers' allele calls to a score
//! contribution. Contribution functions are total: missing or
//! ambiguous evidence yields 0.0, never an error.

use std::collections::HashMap;

use grs_geno::AlleleCall;
use serde::{Deserialize, Serialize};

/// Escape value accepting any call in combination features.
pub const ANY_ALLELE: &str = "X";

/// One weighted scoring feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScoringFeature {
    /// Weight times the number of effect-allele copies (0, 1 or 2).
    Additive {
        marker: String,
        effect_allele: String,
        weight: f64,
    },
    /// Weight iff every marker's call matches the required allele
    /// multiset exactly (unordered, multiplicity-sensitive).
    Haplotype {
        name: String,
        markers: Vec<String>,
        /// Required alleles per marker, with multiplicity.
        alleles: Vec<Vec<String>>,
        weight: f64,
    },
    /// Weight iff every marker passes its single test: `X` accepts
    /// anything, a single allele requires exactly one copy, `a|b`
    /// requires that exact unordered genotype.
    AlleleCombination {
        name: String,
        markers: Vec<String>,
        /// One test specification per marker.
        alleles: Vec<String>,
        weight: f64,
    },
}

impl ScoringFeature {
    /// Feature name; additive features are named after their marker.
    pub fn name(&self) -> &str {
        match self {
            ScoringFeature::Additive { marker, .. } => marker,
            ScoringFeature::Haplotype { name, .. } => name,
            ScoringFeature::AlleleCombination { name, .. } => name,
        }
    }

    /// Ids of the markers this feature needs, in declaration order.
    pub fn markers(&self) -> &[String] {
        match self {
            ScoringFeature::Additive { marker, .. } => std::slice::from_ref(marker),
            ScoringFeature::Haplotype { markers, .. } => markers,
            ScoringFeature::AlleleCombination { markers, .. } => markers,
        }
    }

    /// Weight this feature confers to the score.
    pub fn weight(&self) -> f64 {
        match self {
            ScoringFeature::Additive { weight, .. } => *weight,
            ScoringFeature::Haplotype { weight, .. } => *weight,
            ScoringFeature::AlleleCombination { weight, .. } => *weight,
        }
    }

    /// Single-letter type code used in score definition files.
    pub fn type_code(&self) -> char {
        match self {
            ScoringFeature::Additive { .. } => 'A',
            ScoringFeature::Haplotype { .. } => 'H',
            ScoringFeature::AlleleCombination { .. } => 'M',
        }
    }

    /// Score contribution for one sample.
    ///
    /// `sample_alleles` holds one call per required marker, in the
    /// order of [`Self::markers`], already translated into this
    /// feature's allele vocabulary.
    pub fn contribution(&self, sample_alleles: &[AlleleCall]) -> f64 {
        debug_assert_eq!(sample_alleles.len(), self.markers().len());

        match self {
            ScoringFeature::Additive {
                effect_allele,
                weight,
                ..
            } => match sample_alleles.first().and_then(|c| c.as_ref()) {
                Some(alleles) => {
                    let copies = alleles.iter().filter(|a| *a == effect_allele).count();
                    *weight * copies as f64
                }
                None => 0.0,
            },

            ScoringFeature::Haplotype {
                alleles, weight, ..
            } => {
                let matched = alleles.iter().zip(sample_alleles).all(|(required, call)| {
                    match call {
                        Some(sample) => multisets_equal(required, sample),
                        None => false,
                    }
                });
                if matched {
                    *weight
                } else {
                    0.0
                }
            }

            ScoringFeature::AlleleCombination {
                alleles, weight, ..
            } => {
                let matched = alleles
                    .iter()
                    .zip(sample_alleles)
                    .all(|(test, call)| combination_test(test, call));
                if matched {
                    *weight
                } else {
                    0.0
                }
            }
        }
    }
}

/// Unordered, multiplicity-sensitive allele comparison.
fn multisets_equal(required: &[String], sample: &[String]) -> bool {
    if required.len() != sample.len() {
        return false;
    }
    let mut counts: HashMap<&str, i64> = HashMap::with_capacity(required.len());
    for a in required {
        *counts.entry(a.as_str()).or_insert(0) += 1;
    }
    for a in sample {
        match counts.get_mut(a.as_str()) {
            Some(c) => *c -= 1,
            None => return false,
        }
    }
    counts.values().all(|&c| c == 0)
}

/// One marker's test in a combination feature.
fn combination_test(test: &str, call: &AlleleCall) -> bool {
    if test == ANY_ALLELE {
        return true;
    }

    let alleles = match call {
        Some(alleles) => alleles,
        None => return false,
    };

    match test.split('|').collect::<Vec<_>>().as_slice() {
        // Single allele: exactly one copy carried.
        [single] => {
            alleles.len() == 2
                && (alleles[0] == *single) != (alleles[1] == *single)
        }
        // Allele pair: exact unordered genotype.
        [a, b] => {
            alleles.len() == 2
                && (alleles[0] == *a && alleles[1] == *b
                    || alleles[0] == *b && alleles[1] == *a)
        }
        _ => false,
    }
}
