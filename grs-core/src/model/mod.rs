//! Risk-score data model: variants, proxies, and scoring features.

pub mod feature;
pub mod proxy;
pub mod variant;

pub use feature::ScoringFeature;
pub use proxy::Proxy;
pub use variant::Variant;
