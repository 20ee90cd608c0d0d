//! Built-in sample configurations.
//!
//! - `default`: four relations chained through `A` and `B`, with `D` and `F` left
//!   unbounded so that the `R1`/`R4` pair (sharing only `F`) is never joinable.
//! - `textbook`: three relations `R`, `S`, `U` connected through `A`, `B` and `C`.

use crate::catalog::{ColumnConfig, RelationConfig, SemiJoinConfig, DEFAULT_MAX_ROUNDS};
use crate::domain::{Domain, DomainRegistry};
use crate::error::{Result, SemiJoinError};

pub const DATASET_NAMES: &[&str] = &["default", "textbook"];

/// Look up a built-in dataset by name.
pub fn dataset(name: &str) -> Result<SemiJoinConfig> {
    match name {
        "default" => Ok(default_dataset()),
        "textbook" => Ok(textbook_dataset()),
        _ => Err(SemiJoinError::UnknownDataset {
            name: name.to_string(),
        }),
    }
}

fn relation(name: &str, cardinality: f64, columns: &[(&str, f64, f64)]) -> RelationConfig {
    RelationConfig {
        name: name.to_string(),
        cardinality,
        columns: columns
            .iter()
            .map(|(c, size, values)| ColumnConfig::new(*c, *size, *values))
            .collect(),
    }
}

pub fn default_dataset() -> SemiJoinConfig {
    SemiJoinConfig {
        max_rounds: DEFAULT_MAX_ROUNDS,
        domains: DomainRegistry::new()
            .with_domain("A", Domain::Bounded(400))
            .with_domain("B", Domain::Bounded(500))
            .with_domain("D", Domain::Unbounded)
            .with_domain("F", Domain::Unbounded),
        relations: vec![
            relation("R1", 1000.0, &[("A", 4.0, 200.0), ("F", 4.0, 50.0)]),
            relation("R2", 1000.0, &[("A", 4.0, 40.0), ("B", 4.0, 100.0)]),
            relation("R3", 2000.0, &[("B", 4.0, 400.0), ("D", 4.0, 50.0)]),
            relation("R4", 1000.0, &[("B", 4.0, 200.0), ("F", 4.0, 50.0)]),
        ],
    }
}

pub fn textbook_dataset() -> SemiJoinConfig {
    SemiJoinConfig {
        max_rounds: DEFAULT_MAX_ROUNDS,
        domains: DomainRegistry::new()
            .with_domain("A", Domain::Bounded(1000))
            .with_domain("B", Domain::Bounded(500))
            .with_domain("C", Domain::Bounded(100))
            .with_domain("D", Domain::Unbounded)
            .with_domain("E", Domain::Unbounded)
            .with_domain("F", Domain::Unbounded),
        relations: vec![
            relation("R", 5000.0, &[("A", 3.0, 1000.0), ("B", 4.0, 500.0), ("E", 25.0, 5000.0)]),
            relation("S", 1000.0, &[("B", 4.0, 200.0), ("C", 2.0, 100.0), ("D", 20.0, 1000.0)]),
            relation("U", 200.0, &[("A", 3.0, 200.0), ("C", 2.0, 50.0)]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_named_datasets_build() {
        for name in DATASET_NAMES {
            let catalog = dataset(name).unwrap().build().unwrap();
            assert!(!catalog.relations.is_empty());
            assert_eq!(catalog.max_rounds, DEFAULT_MAX_ROUNDS);
        }
        assert!(matches!(dataset("tpch"), Err(SemiJoinError::UnknownDataset { .. })));
    }
}
