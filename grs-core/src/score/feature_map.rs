//! Bidirectional index between features and the markers they need.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::error::ScoreError;
use crate::model::feature::ScoringFeature;
use crate::score::definition::RiskScore;

/// Which features need which markers, and vice versa.
///
/// Built once from a parsed score definition, read-only during
/// scoring. Features keep their declaration order.
#[derive(Debug, Clone)]
pub struct VariantFeatureMap {
    /// Features in declaration order.
    features: Vec<ScoringFeature>,
    /// Feature name -> index into `features`.
    feature_index: HashMap<String, usize>,
    /// Marker id -> names of the features that need it.
    variant_to_features: HashMap<String, Vec<String>>,
    /// Ids of all markers this score needs.
    variant_ids: HashSet<String>,
}

impl VariantFeatureMap {
    /// Build the index. Duplicate feature names are fatal.
    pub fn new(score: &RiskScore) -> Result<Self> {
        let mut feature_index = HashMap::with_capacity(score.features.len());
        let mut variant_to_features: HashMap<String, Vec<String>> = HashMap::new();
        let mut variant_ids = HashSet::new();

        for (i, feature) in score.features.iter().enumerate() {
            let name = feature.name().to_string();
            if feature_index.insert(name.clone(), i).is_some() {
                return Err(ScoreError::DuplicateFeatureName { name }.into());
            }

            for marker in feature.markers() {
                variant_ids.insert(marker.clone());
                variant_to_features
                    .entry(marker.clone())
                    .or_default()
                    .push(feature.name().to_string());
            }
        }

        Ok(VariantFeatureMap {
            features: score.features.clone(),
            feature_index,
            variant_to_features,
            variant_ids,
        })
    }

    /// Features in declaration order.
    pub fn features(&self) -> &[ScoringFeature] {
        &self.features
    }

    /// Look a feature up by name.
    pub fn feature_by_name(&self, name: &str) -> Option<&ScoringFeature> {
        self.feature_index.get(name).map(|&i| &self.features[i])
    }

    /// Names of the features that need the given marker.
    pub fn features_for_variant(&self, id: &str) -> &[String] {
        self.variant_to_features
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of all markers this score needs.
    pub fn variant_ids(&self) -> &HashSet<String> {
        &self.variant_ids
    }
}
