//! Proxy markers and their allele correspondence.

use std::collections::HashMap;

use grs_geno::AlleleCall;

/// Sentinel for an allele that could not be determined.
pub const UNKNOWN_ALLELE: &str = "NA";

/// A substitute marker for a poorly measured original, with the
/// correspondence between the two allele vocabularies.
///
/// The correspondence holds entries for the two observed alleles only;
/// a pair is skipped when either side is the [`UNKNOWN_ALLELE`]
/// sentinel. A proxy with no mapping for an allele is unusable for
/// that allele. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Proxy {
    /// Id of the original marker.
    pub snp_id: String,
    /// Id of the substitute marker.
    pub proxy_id: String,
    /// Original allele -> proxy allele.
    allele_map: HashMap<String, String>,
}

impl Proxy {
    /// Build the correspondence from the original's ref/alt and the
    /// proxy's aligned ref/alt.
    pub fn new(
        snp_id: &str,
        proxy_id: &str,
        snp_ref: &str,
        snp_alt: &str,
        proxy_ref: &str,
        proxy_alt: &str,
    ) -> Self {
        let mut allele_map = HashMap::with_capacity(2);
        add_allele(&mut allele_map, snp_ref, proxy_ref);
        add_allele(&mut allele_map, snp_alt, proxy_alt);
        Proxy {
            snp_id: snp_id.to_string(),
            proxy_id: proxy_id.to_string(),
            allele_map,
        }
    }

    /// The proxy allele standing for the given original allele.
    pub fn proxy_allele(&self, snp_allele: &str) -> Option<&str> {
        self.allele_map.get(snp_allele).map(|s| s.as_str())
    }

    /// The original allele a proxy allele stands for.
    pub fn original_allele(&self, proxy_allele: &str) -> Option<&str> {
        self.allele_map
            .iter()
            .find(|(_, v)| v.as_str() == proxy_allele)
            .map(|(k, _)| k.as_str())
    }

    /// Translate a sample's call at the proxy marker into the original
    /// marker's allele vocabulary.
    ///
    /// Any allele without a correspondence turns the call into a
    /// no-call, so the feature contributes nothing for that sample.
    pub fn translate_call(&self, call: &AlleleCall) -> AlleleCall {
        let alleles = call.as_ref()?;
        let mut translated = Vec::with_capacity(alleles.len());
        for allele in alleles {
            match self.original_allele(allele) {
                Some(orig) => translated.push(orig.to_string()),
                None => return None,
            }
        }
        Some(translated)
    }
}

fn add_allele(map: &mut HashMap<String, String>, snp_allele: &str, proxy_allele: &str) {
    if snp_allele != UNKNOWN_ALLELE && proxy_allele != UNKNOWN_ALLELE {
        map.insert(snp_allele.to_string(), proxy_allele.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allele_correspondence() {
        let proxy = Proxy::new("rs1", "rs10", "A", "G", "T", "C");
        assert_eq!(proxy.proxy_allele("A"), Some("T"));
        assert_eq!(proxy.proxy_allele("G"), Some("C"));
        assert_eq!(proxy.original_allele("T"), Some("A"));
        assert_eq!(proxy.original_allele("C"), Some("G"));
        assert_eq!(proxy.proxy_allele("N"), None);
    }

    #[test]
    fn test_unknown_sentinel_skipped() {
        let proxy = Proxy::new("rs1", "rs10", "A", "NA", "T", "C");
        assert_eq!(proxy.proxy_allele("A"), Some("T"));
        assert_eq!(proxy.proxy_allele("NA"), None);
        assert_eq!(proxy.original_allele("C"), None);
    }

    #[test]
    fn test_translate_call() {
        let proxy = Proxy::new("rs1", "rs10", "A", "G", "T", "C");
        let call = Some(vec!["T".to_string(), "C".to_string()]);
        assert_eq!(
            proxy.translate_call(&call),
            Some(vec!["A".to_string(), "G".to_string()])
        );
        assert_eq!(proxy.translate_call(&None), None);
    }

    #[test]
    fn test_translate_unmapped_allele_is_no_call() {
        let proxy = Proxy::new("rs1", "rs10", "A", "NA", "T", "C");
        let call = Some(vec!["T".to_string(), "C".to_string()]);
        // C has no correspondence, the whole call is unusable.
        assert_eq!(proxy.translate_call(&call), None);
    }
}
