//! grs-core: Scoring engine for GRS-RS
//!
//! Implements the risk-score data model (variants, proxies, scoring
//! features), score-definition parsing, the variant catalog, proxy
//! resolution, per-sample score accumulation, and sanity checking.

pub mod catalog;
pub mod computer;
pub mod error;
pub mod model;
pub mod resolver;
pub mod sanity;
pub mod score;

pub use computer::ScoreComputer;
pub use error::ScoreError;
