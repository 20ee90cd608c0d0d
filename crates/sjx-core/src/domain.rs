//! # Domain Registry
//!
//! Every join attribute draws its values from a domain. When the number of distinct
//! values the domain can hold is known, the optimizer can estimate how much of that
//! domain a relation covers (its selectivity factor) and therefore how many tuples
//! a semi-join on the attribute would keep. Attributes without a known domain size
//! are treated as non-joinable: no selectivity can be derived for them, and they
//! never take part in candidate generation.
//!
//! Attributes that are not registered at all behave exactly like unbounded ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The value domain of a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Domain {
    /// The domain holds exactly this many distinct values.
    Bounded(u64),
    /// No domain size is known; the attribute is not joinable.
    Unbounded,
}

impl Domain {
    pub fn size(&self) -> Option<u64> {
        match self {
            Domain::Bounded(size) => Some(*size),
            Domain::Unbounded => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Domain::Bounded(_))
    }
}

impl From<Option<u64>> for Domain {
    fn from(size: Option<u64>) -> Self {
        size.map_or(Domain::Unbounded, Domain::Bounded)
    }
}

impl From<Domain> for Option<u64> {
    fn from(domain: Domain) -> Self {
        domain.size()
    }
}

/// Maps attribute names to their value domains.
///
/// Keyed by a `BTreeMap` so that iteration (used when rendering relation tables)
/// is always in ascending attribute-name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainRegistry {
    domains: BTreeMap<String, Domain>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration, mirroring how statistics are assembled elsewhere.
    pub fn with_domain(mut self, attribute: impl Into<String>, domain: Domain) -> Self {
        self.insert(attribute, domain);
        self
    }

    pub fn insert(&mut self, attribute: impl Into<String>, domain: Domain) {
        self.domains.insert(attribute.into(), domain);
    }

    /// Domain of `attribute`; unregistered attributes are unbounded.
    pub fn domain(&self, attribute: &str) -> Domain {
        self.domains
            .get(attribute)
            .copied()
            .unwrap_or(Domain::Unbounded)
    }

    pub fn is_joinable(&self, attribute: &str) -> bool {
        self.domain(attribute).is_bounded()
    }

    /// Registered attribute names in ascending order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Domain)> {
        self.domains.iter().map(|(name, domain)| (name.as_str(), *domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_attribute_is_unbounded() {
        let registry = DomainRegistry::new().with_domain("A", Domain::Bounded(400));
        assert_eq!(registry.domain("A"), Domain::Bounded(400));
        assert_eq!(registry.domain("Z"), Domain::Unbounded);
        assert!(registry.is_joinable("A"));
        assert!(!registry.is_joinable("Z"));
    }

    #[test]
    fn test_registry_json_uses_null_for_unbounded() {
        let registry: DomainRegistry = serde_json::from_str(r#"{"B": 500, "A": 400, "D": null}"#).unwrap();
        assert_eq!(registry.domain("D"), Domain::Unbounded);
        assert_eq!(registry.attributes().collect::<Vec<_>>(), vec!["A", "B", "D"]);

        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"{"A":400,"B":500,"D":null}"#);
    }
}
