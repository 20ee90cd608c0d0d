//! # sjx-core: Greedy Semi-Join Selection
//!
//! This crate implements the cost model and the greedy search used to build a
//! semi-join program for a distributed query: a sequence of semi-joins that shrink
//! base relations before they are shipped and joined.
//!
//! ## Module Overview
//!
//! - **`domain`**: Domain registry mapping join attributes to their domain sizes.
//! - **`stats`**: Per-column statistics, selectivity factors and re-estimation.
//! - **`relation`**: Relations, stable identity, and semi-join derivation.
//! - **`cost`**: Cost/effect/revenue formulas and the semi-join candidate.
//! - **`search`**: The round-based greedy selection engine.
//! - **`catalog`**: Serializable configuration and the validated engine seed.
//! - **`datasets`**: Built-in sample configurations.
//! - **`display`**: Plain-text rendering of relations, candidates and programs.
//! - **`error`**: Error taxonomy.

pub mod catalog;
pub mod cost;
pub mod datasets;
pub mod display;
pub mod domain;
pub mod error;
pub mod relation;
pub mod search;
pub mod stats;

pub use error::{Result, SemiJoinError};
