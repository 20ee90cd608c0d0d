//! # Errors
//!
//! The estimation model is pure arithmetic, so every failure here is structural:
//! either the configuration handed to the engine is malformed, or the engine was
//! asked to do something its cost model cannot express (a semi-join on an
//! attribute that one side lacks, or on an attribute with no known domain).
//! None of these are transient, so callers abort the run instead of retrying.

/// Errors raised while building a configuration or running the selection engine.
#[derive(Debug, thiserror::Error)]
pub enum SemiJoinError {
    /// A derivation was requested on an attribute absent from one of the two relations.
    #[error("relation '{relation}' has no column '{attribute}' to semi-join on")]
    MissingJoinAttribute { relation: String, attribute: String },
    /// The join attribute has no known domain size, so its selectivity is undefined.
    #[error("attribute '{attribute}' has an unbounded domain and cannot be used as a join key")]
    UnboundedAttributeUsedAsJoinKey { attribute: String },
    /// No two relations in the working set share a bounded-domain attribute.
    #[error("round {round} produced no semi-join candidates")]
    NoCandidatesAvailable { round: usize },
    /// Two relations in the configuration share a name.
    #[error("relation '{name}' is declared more than once")]
    DuplicateRelation { name: String },
    /// A bounded domain must hold at least one value.
    #[error("attribute '{attribute}' has a domain size of zero")]
    InvalidDomainSize { attribute: String },
    /// Cardinalities must be finite and non-negative.
    #[error("relation '{relation}' has an invalid cardinality")]
    InvalidCardinality { relation: String },
    /// Column sizes and value counts must be finite and non-negative.
    #[error("column '{column}' of relation '{relation}' has an invalid size or value count")]
    InvalidColumn { relation: String, column: String },
    /// More relations than relation ids can address.
    #[error("{count} relations exceed the relation id space")]
    TooManyRelations { count: usize },
    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    /// No built-in dataset carries the requested name.
    #[error("unknown dataset '{name}'")]
    UnknownDataset { name: String },
}

impl SemiJoinError {
    /// Whether the error stems from the configuration rather than from running the engine.
    pub fn is_config_error(&self) -> bool {
        !matches!(
            self,
            SemiJoinError::MissingJoinAttribute { .. }
                | SemiJoinError::UnboundedAttributeUsedAsJoinKey { .. }
                | SemiJoinError::NoCandidatesAvailable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SemiJoinError>;
