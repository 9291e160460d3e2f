//! Error types for enrichment runs.

use thiserror::Error;

/// A numeric condition that makes a score undefined (a division by zero in disguise).
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DegenerateCondition {
    #[error("sum of hit weights is zero")]
    ZeroHitWeight,

    #[error("sum of hit weights is not finite under weight exponent {weight}")]
    NonFiniteHitWeight { weight: f64 },

    #[error("gene set spans the entire gene universe")]
    SetSpansUniverse,

    #[error("standard deviation of the cluster column is zero")]
    ZeroStdDev,

    #[error("no gene set member is present in the expression matrix")]
    EmptyGeneSet,

    #[error("score distribution is empty")]
    EmptyDistribution,

    #[error("no null score shares the sign of the observed score")]
    NoSameSignedNull,
}

/// Main error type for enrichment operations
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Degenerate input for gene set {gene_set}: {condition}")]
    DegenerateInput {
        gene_set: String,
        #[source]
        condition: DegenerateCondition,
    },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("Invalid expression matrix: {reason}")]
    InvalidMatrix { reason: String },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl EnrichmentError {
    pub(crate) fn degenerate(gene_set: &str, condition: DegenerateCondition) -> Self {
        EnrichmentError::DegenerateInput {
            gene_set: gene_set.to_string(),
            condition,
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        EnrichmentError::Configuration {
            reason: reason.into(),
        }
    }
}

/// Result type alias for enrichment operations
pub type Result<T> = std::result::Result<T, EnrichmentError>;
