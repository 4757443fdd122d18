//! Pre-run sanity checks on score inputs.
//!
//! Verifies that every marker the score needs resolves to usable
//! metadata before genotypes are touched: markers missing from the
//! catalog fail the check, as do poorly imputed markers left without
//! a proxy. Poor proxies are reported but tolerated.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;

use anyhow::Result;

use crate::catalog::VariantCatalog;
use crate::score::feature_map::VariantFeatureMap;

/// Findings of one sanity check, sorted for stable reports.
#[derive(Debug, Default)]
pub struct SanityReport {
    /// Markers (post proxy substitution) absent from the catalog.
    pub missing: BTreeSet<String>,
    /// Imputed markers below the score threshold, with no proxy.
    pub poor_imputation: BTreeSet<String>,
    /// Proxies below the score threshold: proxy id -> original id.
    pub poor_proxies: BTreeMap<String, String>,
}

impl SanityReport {
    /// Whether scoring can proceed at all.
    ///
    /// A missing marker, or a poorly imputed marker left without a
    /// proxy, fails the check. Poor proxies are reported but do not
    /// fail it: a proxy was chosen knowingly.
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.poor_imputation.is_empty()
    }

    /// Write the report in the three-section text layout.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "# Missing ids")?;
        for id in &self.missing {
            writeln!(writer, "{}", id)?;
        }
        writeln!(writer)?;

        writeln!(writer, "# Poor imputation")?;
        for id in &self.poor_imputation {
            writeln!(writer, "{}", id)?;
        }
        writeln!(writer)?;

        writeln!(writer, "# Poor proxy")?;
        for (proxy_id, original_id) in &self.poor_proxies {
            writeln!(writer, "{}\t{}", proxy_id, original_id)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

/// Check every marker the score needs against the catalog.
///
/// `score_threshold` is the minimal acceptable imputation score; NaN
/// disables the imputation check.
pub fn check(
    feature_map: &VariantFeatureMap,
    catalog: &VariantCatalog,
    proxy_ids: &HashMap<String, String>,
    score_threshold: f64,
) -> SanityReport {
    let mut report = SanityReport::default();

    for id in feature_map.variant_ids() {
        let proxy = proxy_ids.get(id);
        let used_id = match proxy {
            Some(p) => p.as_str(),
            None => id.as_str(),
        };

        let variant = match catalog.lookup(used_id) {
            Some(v) => v,
            None => {
                report.missing.insert(used_id.to_string());
                continue;
            }
        };

        if !variant.genotyped
            && !score_threshold.is_nan()
            && variant.info_score < score_threshold
        {
            match proxy {
                Some(p) => {
                    report.poor_proxies.insert(p.clone(), id.clone());
                }
                None => {
                    report.poor_imputation.insert(used_id.to_string());
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::score::definition::RiskScore;
    use grs_geno::info_table::{write_info_table, InfoRecord};

    fn rec(id: &str, genotyped: bool, score: f64) -> InfoRecord {
        InfoRecord {
            chrom: "1".into(),
            pos: 100,
            id: id.into(),
            ref_allele: "A".into(),
            alt_allele: "G".into(),
            maf: 0.2,
            genotyped,
            info_score: score,
        }
    }

    fn catalog_from(records: &[InfoRecord]) -> VariantCatalog {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.txt");
        write_info_table(&path, "a.vcf", records).unwrap();
        let builder = CatalogBuilder::new(None);
        builder.load(&path).unwrap();
        builder.finish()
    }

    fn map_for(ids: &[&str]) -> VariantFeatureMap {
        let mut text = String::new();
        for id in ids {
            text.push_str(&format!("{}\t{}\tA\t1.0\tA\n", id, id));
        }
        let score = RiskScore::parse_str(&text).unwrap();
        VariantFeatureMap::new(&score).unwrap()
    }

    #[test]
    fn test_all_clear() {
        let catalog = catalog_from(&[rec("rs1", true, f64::NAN)]);
        let report = check(&map_for(&["rs1"]), &catalog, &HashMap::new(), 0.7);
        assert!(report.passed());
        assert!(report.poor_imputation.is_empty());
        assert!(report.poor_proxies.is_empty());
    }

    #[test]
    fn test_missing_marker_fails() {
        let catalog = catalog_from(&[rec("rs1", true, f64::NAN)]);
        let report = check(&map_for(&["rs1", "rs2"]), &catalog, &HashMap::new(), 0.7);
        assert!(!report.passed());
        assert!(report.missing.contains("rs2"));
    }

    #[test]
    fn test_poor_imputation_without_proxy_fails() {
        let catalog = catalog_from(&[rec("rs1", false, 0.41)]);
        let report = check(&map_for(&["rs1"]), &catalog, &HashMap::new(), 0.7);
        assert!(report.poor_imputation.contains("rs1"));
        assert!(!report.passed());
    }

    #[test]
    fn test_threshold_nan_disables_imputation_check() {
        let catalog = catalog_from(&[rec("rs1", false, 0.41)]);
        let report = check(&map_for(&["rs1"]), &catalog, &HashMap::new(), f64::NAN);
        assert!(report.poor_imputation.is_empty());
        assert!(report.passed());
    }

    #[test]
    fn test_poor_proxy_flagged() {
        let catalog = catalog_from(&[rec("rs1", false, 0.3), rec("rs10", false, 0.5)]);
        let mut proxies = HashMap::new();
        proxies.insert("rs1".to_string(), "rs10".to_string());
        let report = check(&map_for(&["rs1"]), &catalog, &proxies, 0.7);
        assert_eq!(report.poor_proxies.get("rs10"), Some(&"rs1".to_string()));
        // A poor proxy was still a deliberate choice; the check passes.
        assert!(report.passed());
    }

    #[test]
    fn test_report_layout() {
        let mut report = SanityReport::default();
        report.missing.insert("rs9".into());
        let mut out = Vec::new();
        report.write(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("# Missing ids\nrs9\n"));
        assert!(text.contains("# Poor imputation"));
        assert!(text.contains("# Poor proxy"));
    }
}
