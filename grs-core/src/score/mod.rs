//! Score definitions and the feature/marker index.

pub mod definition;
pub mod feature_map;

pub use definition::RiskScore;
pub use feature_map::VariantFeatureMap;
