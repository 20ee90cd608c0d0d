//! # Relations
//!
//! A relation is a named cardinality plus one [`ColumnStatistic`] per attribute.
//! Relations are immutable: applying a semi-join produces a new relation that
//! replaces its predecessor in the engine's working set.
//!
//! ## Identity
//!
//! Each relation carries a [`RelationId`] assigned when the configuration is built.
//! A derived relation keeps the id of the relation it was derived from, so the
//! engine can recognize "the same relation, already reduced" across rounds no
//! matter how often it has been replaced. The display name gains a `'` per
//! derivation (`R1`, `R1'`, `R1''`) but plays no part in identity.

use crate::cost;
use crate::domain::DomainRegistry;
use crate::error::{Result, SemiJoinError};
use crate::stats::{self, ColumnStatistic};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Marker appended to a relation's display name each time it is reduced.
pub const DERIVED_MARKER: char = '\'';

/// Stable identifier of a base relation, shared by all of its derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelationId(pub u32);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    id: RelationId,
    name: String,
    cardinality: f64,
    columns: BTreeMap<String, ColumnStatistic>,
}

impl Relation {
    pub fn new(
        id: RelationId,
        name: impl Into<String>,
        cardinality: f64,
        columns: impl IntoIterator<Item = ColumnStatistic>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            cardinality,
            columns: columns
                .into_iter()
                .map(|c| (c.name().to_string(), c))
                .collect(),
        }
    }

    pub fn id(&self) -> RelationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cardinality(&self) -> f64 {
        self.cardinality
    }

    pub fn column(&self, attribute: &str) -> Option<&ColumnStatistic> {
        self.columns.get(attribute)
    }

    /// Like [`Relation::column`], but a missing attribute is a contract violation.
    pub fn require_column(&self, attribute: &str) -> Result<&ColumnStatistic> {
        self.column(attribute)
            .ok_or_else(|| SemiJoinError::MissingJoinAttribute {
                relation: self.name.clone(),
                attribute: attribute.to_string(),
            })
    }

    /// Columns in ascending attribute-name order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnStatistic> {
        self.columns.values()
    }

    /// Attributes present in both relations whose domain is bounded, in ascending order.
    pub fn joinable_attributes<'a>(
        &'a self,
        other: &'a Relation,
        registry: &'a DomainRegistry,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.columns
            .keys()
            .map(String::as_str)
            .filter(move |attr| other.columns.contains_key(*attr) && registry.is_joinable(attr))
    }

    /// The relation left after semi-joining `self` with `source` on `attribute`.
    ///
    /// The cardinality drops to the semi-join's effect. The join attribute keeps the
    /// values both sides agree on (`sf(self) * values(source)`); every other
    /// attribute is re-estimated against the reduced cardinality.
    pub fn derive_by(
        &self,
        source: &Relation,
        attribute: &str,
        registry: &DomainRegistry,
    ) -> Result<Relation> {
        let own = self.require_column(attribute)?;
        let theirs = source.require_column(attribute)?;
        let reduced_cardinality = cost::effect(self, source, attribute)?;

        let columns = self.columns.values().map(|column| {
            let domain = registry.domain(column.name());
            if column.name() == attribute {
                column.with_value_count(own.selectivity() * theirs.value_count(), domain)
            } else {
                let value_count = stats::reestimate_value_count(reduced_cardinality, column.value_count());
                column.with_value_count(value_count, domain)
            }
        });

        Ok(Relation::new(
            self.id,
            format!("{}{}", self.name, DERIVED_MARKER),
            reduced_cardinality,
            columns,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    fn registry() -> DomainRegistry {
        DomainRegistry::new()
            .with_domain("A", Domain::Bounded(400))
            .with_domain("B", Domain::Bounded(500))
            .with_domain("F", Domain::Unbounded)
    }

    fn relation(id: u32, name: &str, card: f64, cols: &[(&str, f64, f64)]) -> Relation {
        let registry = registry();
        Relation::new(
            RelationId(id),
            name,
            card,
            cols.iter()
                .map(|(c, size, val)| ColumnStatistic::new(*c, *size, *val, registry.domain(c))),
        )
    }

    #[test]
    fn test_derive_by_join_attribute() {
        let r1 = relation(0, "R1", 1000.0, &[("A", 4.0, 200.0), ("F", 4.0, 50.0)]);
        let r2 = relation(1, "R2", 1000.0, &[("A", 4.0, 40.0), ("B", 4.0, 100.0)]);

        let derived = r1.derive_by(&r2, "A", &registry()).unwrap();
        assert_eq!(derived.id(), r1.id());
        assert_eq!(derived.name(), "R1'");
        assert_eq!(derived.cardinality(), 100.0);

        let a = derived.column("A").unwrap();
        assert_eq!(a.value_count(), 0.5 * 40.0);
        assert_eq!(a.selectivity(), 20.0 / 400.0);

        // r = 100 is exactly 2m for F, so its estimate is retained.
        let f = derived.column("F").unwrap();
        assert_eq!(f.value_count(), 50.0);
        assert_eq!(f.selectivity(), 0.0);

        // The original is untouched.
        assert_eq!(r1.cardinality(), 1000.0);
        assert_eq!(r1.column("A").unwrap().value_count(), 200.0);
    }

    #[test]
    fn test_derive_by_moderate_reduction() {
        let r2 = relation(1, "R2'", 1000.0, &[("A", 4.0, 40.0), ("B", 4.0, 100.0)]);
        let r1 = relation(0, "R1'", 100.0, &[("A", 4.0, 20.0), ("F", 4.0, 50.0)]);

        let derived = r2.derive_by(&r1, "A", &registry()).unwrap();
        assert_eq!(derived.name(), "R2''");
        assert_eq!(derived.id(), r2.id());
        assert_eq!(derived.cardinality(), 50.0);
        // r = m/2 falls in the middle zone: (50 + 100) / 3.
        assert_eq!(derived.column("B").unwrap().value_count(), 50.0);
    }

    #[test]
    fn test_derive_by_missing_attribute_fails_fast() {
        let r1 = relation(0, "R1", 1000.0, &[("A", 4.0, 200.0)]);
        let r3 = relation(2, "R3", 2000.0, &[("B", 4.0, 400.0)]);

        let err = r1.derive_by(&r3, "A", &registry()).unwrap_err();
        assert!(matches!(
            err,
            SemiJoinError::MissingJoinAttribute { ref relation, .. } if relation == "R3"
        ));

        let err = r1.derive_by(&r3, "B", &registry()).unwrap_err();
        assert!(matches!(
            err,
            SemiJoinError::MissingJoinAttribute { ref relation, .. } if relation == "R1"
        ));
    }

    #[test]
    fn test_joinable_attributes_skip_unbounded() {
        let r1 = relation(0, "R1", 1000.0, &[("A", 4.0, 200.0), ("F", 4.0, 50.0)]);
        let r4 = relation(3, "R4", 1000.0, &[("B", 4.0, 200.0), ("F", 4.0, 50.0)]);
        let r2 = relation(1, "R2", 1000.0, &[("A", 4.0, 40.0), ("B", 4.0, 100.0)]);

        let registry = registry();
        assert_eq!(r1.joinable_attributes(&r4, &registry).count(), 0);
        assert_eq!(r1.joinable_attributes(&r2, &registry).collect::<Vec<_>>(), vec!["A"]);
    }
}
