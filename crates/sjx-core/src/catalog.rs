//! # Catalog and Configuration
//!
//! The engine is seeded once with a domain registry, an initial set of relations
//! and a round bound. [`SemiJoinConfig`] is the serializable description of that
//! seed (what the HTTP service and the CLI accept as JSON); [`Catalog`] is the
//! validated form the engine consumes.
//!
//! ```json
//! {
//!   "maxRounds": 4,
//!   "domains": { "A": 400, "B": 500, "F": null },
//!   "relations": [
//!     { "name": "R1", "cardinality": 1000, "columns": [ { "name": "A", "size": 4, "valueCount": 200 } ] }
//!   ]
//! }
//! ```
//!
//! Relation ids are assigned in declaration order.

use crate::domain::{Domain, DomainRegistry};
use crate::error::{Result, SemiJoinError};
use crate::relation::{Relation, RelationId};
use crate::stats::ColumnStatistic;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of rounds run when a configuration does not say otherwise.
pub const DEFAULT_MAX_ROUNDS: usize = 4;

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}

/// Serializable engine seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemiJoinConfig {
    /// Number of rounds to run; the search never stops early.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    /// Domain sizes of the join attributes. Missing entries are unbounded.
    #[serde(default)]
    pub domains: DomainRegistry,
    /// Initial relations. Their ids follow this order.
    pub relations: Vec<RelationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationConfig {
    pub name: String,
    pub cardinality: f64,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub name: String,
    /// Physical size of one value.
    pub size: f64,
    /// Estimated number of distinct values.
    pub value_count: f64,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>, size: f64, value_count: f64) -> Self {
        Self {
            name: name.into(),
            size,
            value_count,
        }
    }
}

impl SemiJoinConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration and turn it into the engine's starting state.
    pub fn build(&self) -> Result<Catalog> {
        for (attribute, domain) in self.domains.iter() {
            if domain == Domain::Bounded(0) {
                return Err(SemiJoinError::InvalidDomainSize {
                    attribute: attribute.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut relations = Vec::with_capacity(self.relations.len());
        for (index, rel) in self.relations.iter().enumerate() {
            if !seen.insert(rel.name.as_str()) {
                return Err(SemiJoinError::DuplicateRelation {
                    name: rel.name.clone(),
                });
            }
            if !rel.cardinality.is_finite() || rel.cardinality < 0.0 {
                return Err(SemiJoinError::InvalidCardinality {
                    relation: rel.name.clone(),
                });
            }

            let mut columns = Vec::with_capacity(rel.columns.len());
            for col in &rel.columns {
                let valid = |v: f64| v.is_finite() && v >= 0.0;
                if !valid(col.size) || !valid(col.value_count) {
                    return Err(SemiJoinError::InvalidColumn {
                        relation: rel.name.clone(),
                        column: col.name.clone(),
                    });
                }
                columns.push(ColumnStatistic::new(
                    col.name.clone(),
                    col.size,
                    col.value_count,
                    self.domains.domain(&col.name),
                ));
            }

            relations.push(Relation::new(
                relation_id(index, self.relations.len())?,
                rel.name.clone(),
                rel.cardinality,
                columns,
            ));
        }

        Ok(Catalog {
            registry: self.domains.clone(),
            relations,
            max_rounds: self.max_rounds,
        })
    }
}

/// Id of the relation declared at `index` among `count` relations.
fn relation_id(index: usize, count: usize) -> Result<RelationId> {
    u32::try_from(index)
        .map(RelationId)
        .map_err(|_| SemiJoinError::TooManyRelations { count })
}

/// Validated starting state of a selection run.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub registry: DomainRegistry,
    /// Starting working set, ids assigned in declaration order.
    pub relations: Vec<Relation>,
    pub max_rounds: usize,
}

impl Catalog {
    /// Same catalog, different round bound.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}
