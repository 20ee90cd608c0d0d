//! # Semi-Join Cost Model
//!
//! A semi-join `R ⋉ S` on attribute `A` ships the projection of `S` on `A` to the
//! site of `R` and drops every tuple of `R` whose `A` value is not in it. The model
//! prices and scores such a candidate with three numbers:
//!
//! ```text
//! cost    = size(S.A) * values(S.A)      bytes shipped
//! effect  = |R| * sf(S.A)                tuples of R expected to survive
//! revenue = |R| - effect                 tuples of R eliminated
//! ```
//!
//! The selection engine always applies the candidate with the highest revenue.

use crate::domain::DomainRegistry;
use crate::error::{Result, SemiJoinError};
use crate::relation::{Relation, RelationId};
use serde::Serialize;
use std::sync::Arc;

/// Cost of shipping `source`'s projection on `attribute`.
pub fn cost(source: &Relation, attribute: &str) -> Result<f64> {
    let column = source.require_column(attribute)?;
    Ok(column.size() * column.value_count())
}

/// Cardinality of `target` after a semi-join with `source` on `attribute`.
pub fn effect(target: &Relation, source: &Relation, attribute: &str) -> Result<f64> {
    let column = source.require_column(attribute)?;
    Ok(target.cardinality() * column.selectivity())
}

/// Number of `target` tuples a semi-join with `source` on `attribute` eliminates.
pub fn revenue(target: &Relation, source: &Relation, attribute: &str) -> Result<f64> {
    Ok(target.cardinality() - effect(target, source, attribute)?)
}

/// A candidate semi-join `target ⋉ source` on `attribute`.
///
/// The reduced relation is derived eagerly at construction, so applying a chosen
/// candidate is a plain swap in the working set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemiJoin {
    /// Relation being reduced, as it stands in the current round.
    pub target: Arc<Relation>,
    /// Relation whose join-attribute projection is shipped.
    pub source: Arc<Relation>,
    pub attribute: String,
    /// Bytes shipped: `size(S.A) * values(S.A)`.
    pub cost: f64,
    /// Expected surviving cardinality of the target.
    pub effect: f64,
    /// Expected tuples eliminated; zero for re-issued pairings.
    pub revenue: f64,
    /// The target as it looks after this semi-join.
    pub relation: Arc<Relation>,
    /// Set when the candidate is a re-emission of an already applied pairing.
    pub reused: bool,
}

impl SemiJoin {
    pub fn new(
        target: Arc<Relation>,
        source: Arc<Relation>,
        attribute: &str,
        registry: &DomainRegistry,
    ) -> Result<Self> {
        if !registry.is_joinable(attribute) {
            return Err(SemiJoinError::UnboundedAttributeUsedAsJoinKey {
                attribute: attribute.to_string(),
            });
        }

        let cost = cost(&source, attribute)?;
        let effect = effect(&target, &source, attribute)?;
        let revenue = revenue(&target, &source, attribute)?;
        let relation = Arc::new(target.derive_by(&source, attribute, registry)?);

        Ok(Self {
            target,
            source,
            attribute: attribute.to_string(),
            cost,
            effect,
            revenue,
            relation,
            reused: false,
        })
    }

    /// `(target, source)` identity of the pairing, independent of renaming.
    pub fn pair(&self) -> (RelationId, RelationId) {
        (self.target.id(), self.source.id())
    }

    /// Whether both candidates reduce the same base relation by the same base relation.
    pub fn same_pairing(&self, other: &SemiJoin) -> bool {
        self.pair() == other.pair()
    }

    /// Re-emit an already applied candidate against the current version of its target.
    ///
    /// The pairing has nothing left to give: revenue is zero and the effect is the
    /// cardinality the earlier application already produced.
    pub fn reissue(&self, current_target: Arc<Relation>) -> SemiJoin {
        debug_assert_eq!(current_target.id(), self.target.id());
        SemiJoin {
            target: current_target,
            source: Arc::clone(&self.source),
            attribute: self.attribute.clone(),
            cost: self.cost,
            effect: self.relation.cardinality(),
            revenue: 0.0,
            relation: Arc::clone(&self.relation),
            reused: true,
        }
    }
}
