//! # Column Statistics
//!
//! Each relation carries one statistic per attribute:
//!
//! - **size**: the physical size of a single value, used to price shipping the
//!   attribute's projection to another site.
//! - **value count**: the estimated number of distinct values currently held.
//! - **selectivity factor**: the fraction of the attribute's domain covered by those
//!   values, `value_count / domain_size`. Unbounded attributes have a factor of 0.
//!
//! The selectivity factor is computed once, when the statistic is built. Reducing a
//! relation never patches an existing statistic; it builds new ones.
//!
//! ## Re-estimation after a semi-join
//!
//! A semi-join reduces a relation's cardinality to `r`. For an attribute other than
//! the join attribute, holding `m` distinct values before the reduction, the
//! surviving value count is estimated piecewise:
//!
//! ```text
//! r <  m/2        -> r            heavy reduction, bounded by the new cardinality
//! m/2 <= r < 2m   -> (r + m) / 3  moderate reduction, blend of both
//! r >= 2m         -> m            negligible effect on this attribute
//! ```

use crate::domain::Domain;
use serde::Serialize;

/// Per-attribute statistic of a relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistic {
    name: String,
    size: f64,
    value_count: f64,
    selectivity: f64,
}

impl ColumnStatistic {
    pub fn new(name: impl Into<String>, size: f64, value_count: f64, domain: Domain) -> Self {
        Self {
            name: name.into(),
            size,
            value_count,
            selectivity: selectivity_factor(value_count, domain),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn value_count(&self) -> f64 {
        self.value_count
    }

    pub fn selectivity(&self) -> f64 {
        self.selectivity
    }

    /// Same attribute and size unit, new value count, selectivity recomputed.
    pub fn with_value_count(&self, value_count: f64, domain: Domain) -> Self {
        Self::new(self.name.clone(), self.size, value_count, domain)
    }
}

/// Fraction of `domain` covered by `value_count` distinct values, clamped to `[0, 1]`.
pub fn selectivity_factor(value_count: f64, domain: Domain) -> f64 {
    match domain {
        Domain::Bounded(size) if size > 0 => (value_count / size as f64).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Surviving value count of a non-join attribute after a reduction to
/// `reduced_cardinality` rows, given `value_count` distinct values beforehand.
pub fn reestimate_value_count(reduced_cardinality: f64, value_count: f64) -> f64 {
    let r = reduced_cardinality;
    let m = value_count;
    if r < m / 2.0 {
        r
    } else if r < 2.0 * m {
        (r + m) / 3.0
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectivity_bounded_and_unbounded() {
        let a = ColumnStatistic::new("A", 4.0, 40.0, Domain::Bounded(400));
        assert_eq!(a.selectivity(), 0.1);

        let f = ColumnStatistic::new("F", 4.0, 50.0, Domain::Unbounded);
        assert_eq!(f.selectivity(), 0.0);
    }

    #[test]
    fn test_selectivity_stays_in_unit_interval() {
        assert_eq!(selectivity_factor(900.0, Domain::Bounded(500)), 1.0);
        assert_eq!(selectivity_factor(0.0, Domain::Bounded(500)), 0.0);
        for value in [1.0, 7.0, 125.0, 333.0, 500.0] {
            let sf = selectivity_factor(value, Domain::Bounded(500));
            assert!((0.0..=1.0).contains(&sf));
            assert_eq!(sf, value / 500.0);
        }
    }

    #[test]
    fn test_reestimate_zones() {
        // Heavy reduction: tracks the new cardinality.
        assert_eq!(reestimate_value_count(10.0, 100.0), 10.0);
        // Lower boundary of the middle zone is inclusive.
        assert_eq!(reestimate_value_count(50.0, 100.0), 50.0);
        assert_eq!(reestimate_value_count(110.0, 100.0), 70.0);
        // Upper boundary belongs to the last zone.
        assert_eq!(reestimate_value_count(200.0, 100.0), 100.0);
        assert_eq!(reestimate_value_count(400.0, 50.0), 50.0);
    }

    #[test]
    fn test_reestimate_never_exceeds_larger_input() {
        let m = 120.0;
        for step in 0..=60 {
            let r = step as f64 * 10.0;
            let v = reestimate_value_count(r, m);
            assert!(v <= r.max(m), "r={r} m={m} v={v}");
            assert!(v >= 0.0);
        }
    }

    #[test]
    fn test_with_value_count_recomputes_selectivity() {
        let b = ColumnStatistic::new("B", 4.0, 400.0, Domain::Bounded(500));
        let reduced = b.with_value_count(80.0, Domain::Bounded(500));
        assert_eq!(reduced.size(), 4.0);
        assert_eq!(reduced.value_count(), 80.0);
        assert_eq!(reduced.selectivity(), 80.0 / 500.0);
        // The original statistic is untouched.
        assert_eq!(b.selectivity(), 0.8);
    }
}
