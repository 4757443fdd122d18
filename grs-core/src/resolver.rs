//! Proxy selection and allele alignment.

use std::collections::HashMap;

use anyhow::Result;

use crate::catalog::VariantCatalog;
use crate::error::ScoreError;
use crate::model::proxy::Proxy;
use crate::model::variant::Variant;

/// Outcome of proxy selection for one marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyChoice {
    /// The original is genotyped, no proxy needed.
    Unneeded,
    /// Best substitute marker id.
    Selected(String),
    /// No candidate improves on the original.
    NoneSuitable,
}

/// Select the best proxy for `original` from a candidate pool.
///
/// Total order: a genotyped original needs no proxy; otherwise prefer
/// genotyped candidates, then candidates whose imputation score
/// strictly exceeds the original's; ties break on the
/// lexicographically smallest id, so selection is deterministic.
pub fn select_proxy(original: &Variant, candidates: &[&Variant]) -> ProxyChoice {
    if original.genotyped {
        return ProxyChoice::Unneeded;
    }

    if let Some(best) = candidates
        .iter()
        .filter(|c| c.genotyped)
        .map(|c| c.id.as_str())
        .min()
    {
        return ProxyChoice::Selected(best.to_string());
    }

    let mut best: Option<&Variant> = None;
    for candidate in candidates {
        if !(candidate.info_score > original.info_score) {
            continue;
        }
        best = match best {
            None => Some(candidate),
            Some(current) => {
                if candidate.info_score > current.info_score
                    || candidate.info_score == current.info_score && candidate.id < current.id
                {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }

    match best {
        Some(v) => ProxyChoice::Selected(v.id.clone()),
        None => ProxyChoice::NoneSuitable,
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Align the proxy's ref/alt labels to the original's.
///
/// Frequency-symmetry heuristic: when the two MAFs sit on opposite
/// sides of 0.5 the proxy's ref/alt are swapped, so the effect-allele
/// direction stays comparable. Known approximation: it can misfire
/// when either MAF is close to 0.5.
pub fn align_alleles(original: &Variant, proxy: &Variant) -> (String, String) {
    if sign(original.maf - 0.5) * sign(proxy.maf - 0.5) < 0.0 {
        (proxy.alt_allele.clone(), proxy.ref_allele.clone())
    } else {
        (proxy.ref_allele.clone(), proxy.alt_allele.clone())
    }
}

/// Build an aligned [`Proxy`] for one original/proxy id pair.
///
/// Both variants must already be in the catalog.
pub fn build_proxy(
    original_id: &str,
    proxy_id: &str,
    catalog: &VariantCatalog,
) -> Result<Proxy> {
    let original = catalog
        .lookup(original_id)
        .ok_or_else(|| ScoreError::UnknownMarker {
            id: original_id.to_string(),
        })?;
    let proxy = catalog
        .lookup(proxy_id)
        .ok_or_else(|| ScoreError::UnknownMarker {
            id: proxy_id.to_string(),
        })?;

    let (aligned_ref, aligned_alt) = align_alleles(original, proxy);

    Ok(Proxy::new(
        original_id,
        proxy_id,
        &original.ref_allele,
        &original.alt_allele,
        &aligned_ref,
        &aligned_alt,
    ))
}

/// Convert an id mapping into aligned proxies.
pub fn build_proxy_map(
    proxy_ids: &HashMap<String, String>,
    catalog: &VariantCatalog,
) -> Result<HashMap<String, Proxy>> {
    proxy_ids
        .iter()
        .map(|(id, proxy_id)| Ok((id.clone(), build_proxy(id, proxy_id, catalog)?)))
        .collect()
}
