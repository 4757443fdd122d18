//! Error taxonomy for scoring runs.
//!
//! Configuration errors are wrong inputs (bad score definitions),
//! consistency errors mean the inputs disagree with each other; both
//! abort the run. Data sparsity (no call for a sample) is not an error
//! anywhere in this crate, it yields zero contributions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Non-unique feature name: {name}")]
    DuplicateFeatureName { name: String },

    #[error("Unknown feature type code '{code}' at line {line}")]
    UnknownTypeCode { code: String, line: usize },

    #[error("Line {line}: {details}")]
    MalformedFeature { line: usize, details: String },

    #[error("Marker {id} not found in any variant info table")]
    UnknownMarker { id: String },

    #[error("Variant {id} not found in genotype source {source_name}")]
    MarkerNotInSource { id: String, source_name: String },

    #[error("No genotype source named {source_name} provided (needed for marker {id})")]
    SourceNotProvided { id: String, source_name: String },
}
