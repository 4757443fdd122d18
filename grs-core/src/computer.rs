//! Per-sample score accumulation.
//!
//! A run goes through three phases: resolve every feature's markers
//! against the catalog and proxy map, evaluate features in parallel
//! against the genotype sources, then sum the per-feature
//! contribution vectors in feature-declaration order. The fixed
//! summation order makes 1-thread and N-thread runs bit-identical.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

use crate::catalog::VariantCatalog;
use crate::error::ScoreError;
use crate::model::feature::ScoringFeature;
use crate::model::proxy::Proxy;
use crate::score::feature_map::VariantFeatureMap;
use grs_geno::sample::establish_samples;
use grs_geno::{AlleleCall, GenotypeSource};

/// Computes risk scores over a set of genotype sources.
///
/// Sources are not assumed thread-safe for reads; each is guarded by
/// its own lock and queried by one feature worker at a time.
pub struct ScoreComputer<S: GenotypeSource> {
    /// (source name, reader) pairs; names match the info tables'
    /// `# vcf:` headers.
    sources: Vec<(String, Mutex<S>)>,
    samples: Vec<String>,
}

/// One feature marker bound to its coordinate and source.
struct ResolvedMarker {
    original_id: String,
    resolved_id: String,
    chrom: String,
    pos: u64,
    source_idx: usize,
}

impl<S: GenotypeSource> ScoreComputer<S> {
    /// Establish the sample list and wrap the readers.
    ///
    /// All sources must expose the same samples in the same order.
    pub fn new(sources: Vec<(String, S)>) -> Result<Self> {
        let lists: Vec<&[String]> = sources.iter().map(|(_, s)| s.sample_ids()).collect();
        let samples = establish_samples(&lists)?;

        Ok(ScoreComputer {
            sources: sources
                .into_iter()
                .map(|(name, s)| (name, Mutex::new(s)))
                .collect(),
            samples,
        })
    }

    /// Ordered sample names the score vector is indexed by.
    pub fn sample_names(&self) -> &[String] {
        &self.samples
    }

    /// Compute the score for every sample.
    ///
    /// Fails when a required marker cannot be resolved through the
    /// catalog, or when a resolved marker is absent at its expected
    /// coordinate in its expected source — either means the inputs
    /// disagree and any score would be silently biased.
    pub fn run(
        &self,
        feature_map: &VariantFeatureMap,
        catalog: &VariantCatalog,
        proxies: &HashMap<String, Proxy>,
    ) -> Result<Vec<f64>> {
        let features = feature_map.features();

        let resolved = features
            .iter()
            .map(|f| self.resolve_feature(f, catalog, proxies))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "Resolved {} markers for {} features",
            feature_map.variant_ids().len(),
            features.len()
        );

        // Contribution vectors come back in declaration order; errors
        // from any worker fail the whole run.
        let contributions = features
            .par_iter()
            .zip(resolved.par_iter())
            .map(|(feature, markers)| self.evaluate_feature(feature, markers, proxies))
            .collect::<Result<Vec<_>>>()?;

        let mut scores = vec![0.0; self.samples.len()];
        for feature_scores in &contributions {
            for (total, c) in scores.iter_mut().zip(feature_scores) {
                *total += c;
            }
        }
        info!("Scored {} samples", scores.len());

        Ok(scores)
    }

    fn resolve_feature(
        &self,
        feature: &ScoringFeature,
        catalog: &VariantCatalog,
        proxies: &HashMap<String, Proxy>,
    ) -> Result<Vec<ResolvedMarker>> {
        feature
            .markers()
            .iter()
            .map(|id| {
                let resolved_id = match proxies.get(id) {
                    Some(proxy) => proxy.proxy_id.clone(),
                    None => id.clone(),
                };

                let variant =
                    catalog
                        .lookup(&resolved_id)
                        .ok_or_else(|| ScoreError::UnknownMarker {
                            id: resolved_id.clone(),
                        })?;
                let source = catalog.source_of(&resolved_id).ok_or_else(|| {
                    ScoreError::UnknownMarker {
                        id: resolved_id.clone(),
                    }
                })?;
                let source_idx = self
                    .sources
                    .iter()
                    .position(|(name, _)| name == source)
                    .ok_or_else(|| ScoreError::SourceNotProvided {
                        id: resolved_id.clone(),
                        source_name: source.to_string(),
                    })?;

                Ok(ResolvedMarker {
                    original_id: id.clone(),
                    resolved_id,
                    chrom: variant.chrom.clone(),
                    pos: variant.pos,
                    source_idx,
                })
            })
            .collect()
    }

    fn evaluate_feature(
        &self,
        feature: &ScoringFeature,
        markers: &[ResolvedMarker],
        proxies: &HashMap<String, Proxy>,
    ) -> Result<Vec<f64>> {
        // Calls per marker, translated into the original markers'
        // allele vocabulary so the feature never sees proxy alleles.
        let mut calls_by_marker: Vec<Vec<AlleleCall>> = Vec::with_capacity(markers.len());

        for marker in markers {
            let (source_name, source) = &self.sources[marker.source_idx];
            let calls = {
                let mut source = source.lock().expect("genotype source lock poisoned");
                source.query(&marker.chrom, marker.pos, &marker.resolved_id)?
            };
            let calls = calls.ok_or_else(|| ScoreError::MarkerNotInSource {
                id: marker.resolved_id.clone(),
                source_name: source_name.clone(),
            })?;

            let calls = match proxies.get(&marker.original_id) {
                Some(proxy) => calls.iter().map(|c| proxy.translate_call(c)).collect(),
                None => calls,
            };
            calls_by_marker.push(calls);
        }

        let mut contributions = Vec::with_capacity(self.samples.len());
        let mut sample_alleles: Vec<AlleleCall> = Vec::with_capacity(markers.len());
        for j in 0..self.samples.len() {
            sample_alleles.clear();
            sample_alleles.extend(calls_by_marker.iter().map(|calls| calls[j].clone()));
            contributions.push(feature.contribution(&sample_alleles));
        }

        Ok(contributions)
    }
}
