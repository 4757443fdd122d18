//! Score definition files.
//!
//! Text format: `# key: value` header lines (`name`, `version`,
//! `PMID`), then one tab-separated record per feature:
//!
//! ```text
//! rs1	rs1	A	0.3	A
//! rs2,rs3	hapB	A|A,T	1.2	H
//! ```
//!
//! Columns: marker ids, locus name, effect alleles, weight, type code.
//!
//! `markerIds` and `effectAlleles` use `,` between markers; within one
//! marker, `|` separates haplotype alleles (type H) or the two alleles
//! of an exact-genotype test (types T and M).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::model::feature::ScoringFeature;
use grs_geno::vcf::open_text;

/// A parsed risk score definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub name: String,
    pub version: String,
    /// Provenance id (publication) when known.
    pub pmid: Option<String>,
    pub features: Vec<ScoringFeature>,
}

impl RiskScore {
    /// Parse a score definition file (plain or gzipped).
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = open_text(path)?;
        let mut contents = String::new();
        std::io::Read::read_to_string(&mut reader, &mut contents)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_str(&contents)
            .with_context(|| format!("Failed to parse score definition {}", path.display()))
    }

    /// Parse a score definition from text.
    pub fn parse_str(contents: &str) -> Result<Self> {
        let mut name = None;
        let mut version = None;
        let mut pmid = None;
        let mut features = Vec::new();

        for (i, line) in contents.lines().enumerate() {
            let line_number = i + 1;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix('#') {
                if let Some((key, value)) = rest.split_once(':') {
                    let value = value.trim().to_string();
                    match key.trim() {
                        "name" => name = Some(value),
                        "version" => version = Some(value),
                        "PMID" | "pmid" => pmid = Some(value),
                        _ => {}
                    }
                }
                continue;
            }

            features.push(parse_feature(line, line_number)?);
        }

        Ok(RiskScore {
            name: name.unwrap_or_default(),
            version: version.unwrap_or_default(),
            pmid,
            features,
        })
    }
}

fn malformed(line: usize, details: impl Into<String>) -> ScoreError {
    ScoreError::MalformedFeature {
        line,
        details: details.into(),
    }
}

fn parse_feature(line: &str, line_number: usize) -> Result<ScoringFeature> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 5 {
        return Err(malformed(
            line_number,
            format!("{} columns found, 5 expected", fields.len()),
        )
        .into());
    }

    let markers: Vec<String> = fields[0]
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();
    let locus_name = fields[1].trim().to_string();
    let allele_specs: Vec<&str> = fields[2].split(',').map(|s| s.trim()).collect();
    let weight: f64 = fields[3]
        .trim()
        .parse()
        .map_err(|_| malformed(line_number, format!("invalid weight '{}'", fields[3])))?;
    let type_code = fields[4].trim();

    if markers.iter().any(|m| m.is_empty()) {
        return Err(malformed(line_number, "empty marker id").into());
    }
    if allele_specs.len() != markers.len() {
        return Err(malformed(
            line_number,
            format!(
                "{} marker ids but {} allele specifications",
                markers.len(),
                allele_specs.len()
            ),
        )
        .into());
    }

    let feature = match type_code {
        "A" => {
            if markers.len() != 1 {
                return Err(malformed(
                    line_number,
                    "additive features take exactly one marker",
                )
                .into());
            }
            if allele_specs[0].contains('|') {
                return Err(malformed(
                    line_number,
                    "additive features take a single effect allele",
                )
                .into());
            }
            ScoringFeature::Additive {
                marker: markers.into_iter().next().unwrap(),
                effect_allele: allele_specs[0].to_string(),
                weight,
            }
        }

        "H" => {
            if markers.len() < 2 {
                return Err(malformed(
                    line_number,
                    "haplotype features take at least two markers",
                )
                .into());
            }
            if locus_name.is_empty() {
                return Err(malformed(line_number, "missing feature name").into());
            }
            let alleles: Vec<Vec<String>> = allele_specs
                .iter()
                .map(|spec| spec.split('|').map(|a| a.to_string()).collect())
                .collect();
            ScoringFeature::Haplotype {
                name: locus_name,
                markers,
                alleles,
                weight,
            }
        }

        "T" | "M" => {
            if type_code == "T" && markers.len() != 2 {
                return Err(malformed(
                    line_number,
                    "two-allele features take exactly two markers",
                )
                .into());
            }
            if markers.len() < 2 {
                return Err(malformed(
                    line_number,
                    "combination features take at least two markers",
                )
                .into());
            }
            if locus_name.is_empty() {
                return Err(malformed(line_number, "missing feature name").into());
            }
            for spec in &allele_specs {
                if spec.split('|').count() > 2 {
                    return Err(malformed(
                        line_number,
                        format!("invalid allele specification '{}'", spec),
                    )
                    .into());
                }
            }
            ScoringFeature::AlleleCombination {
                name: locus_name,
                markers,
                alleles: allele_specs.iter().map(|s| s.to_string()).collect(),
                weight,
            }
        }

        other => {
            return Err(ScoreError::UnknownTypeCode {
                code: other.to_string(),
                line: line_number,
            }
            .into())
        }
    };

    Ok(feature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: &str = "\
# name: T2D-GRS
# version: 1.2
# PMID: 123456
rs1\trs1\tA\t0.3\tA
rs2,rs3\thapB\tA|A,T\t1.2\tH
rs4,rs5\tcombo\tG,T|C\t0.7\tT
";

    #[test]
    fn test_parse_header_and_features() {
        let score = RiskScore::parse_str(DEFINITION).unwrap();
        assert_eq!(score.name, "T2D-GRS");
        assert_eq!(score.version, "1.2");
        assert_eq!(score.pmid.as_deref(), Some("123456"));
        assert_eq!(score.features.len(), 3);

        match &score.features[0] {
            ScoringFeature::Additive {
                marker,
                effect_allele,
                weight,
            } => {
                assert_eq!(marker, "rs1");
                assert_eq!(effect_allele, "A");
                assert_eq!(*weight, 0.3);
            }
            other => panic!("expected additive, got {:?}", other),
        }

        match &score.features[1] {
            ScoringFeature::Haplotype {
                name,
                markers,
                alleles,
                ..
            } => {
                assert_eq!(name, "hapB");
                assert_eq!(markers, &["rs2", "rs3"]);
                assert_eq!(alleles[0], vec!["A", "A"]);
                assert_eq!(alleles[1], vec!["T"]);
            }
            other => panic!("expected haplotype, got {:?}", other),
        }

        match &score.features[2] {
            ScoringFeature::AlleleCombination { alleles, .. } => {
                assert_eq!(alleles, &["G", "T|C"]);
            }
            other => panic!("expected combination, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_code_is_fatal() {
        let err = RiskScore::parse_str("rs1\trs1\tA\t0.3\tZ\n").unwrap_err();
        assert!(err.to_string().contains("Unknown feature type code 'Z'"));
    }

    #[test]
    fn test_column_count_mismatch_is_fatal() {
        let err = RiskScore::parse_str("rs1\trs1\tA\t0.3\n").unwrap_err();
        assert!(err.to_string().contains("5 expected"));
    }

    #[test]
    fn test_marker_allele_arity_mismatch_is_fatal() {
        let err = RiskScore::parse_str("rs1,rs2\thap\tA\t1.0\tH\n").unwrap_err();
        assert!(err.to_string().contains("allele specifications"));
    }

    #[test]
    fn test_bad_weight_is_fatal() {
        let err = RiskScore::parse_str("rs1\trs1\tA\theavy\tA\n").unwrap_err();
        assert!(err.to_string().contains("invalid weight"));
    }

    #[test]
    fn test_json_round_trip() {
        let score = RiskScore::parse_str(DEFINITION).unwrap();
        let json = serde_json::to_string(&score).unwrap();
        let back: RiskScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, score.name);
        assert_eq!(back.features.len(), score.features.len());
        assert_eq!(back.features[1].name(), "hapB");
    }
}
