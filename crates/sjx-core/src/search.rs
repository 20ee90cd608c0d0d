//! # Greedy Semi-Join Selection
//!
//! This module implements the round-based greedy search that builds a semi-join
//! program. Each round:
//!
//! 1. **Enumerate**: every ordered pair `(target, source)` of distinct relations in
//!    the working set contributes one candidate per bounded-domain attribute they
//!    share. A pair that was already applied in an earlier round is not priced
//!    again; its stored candidate is re-issued against the current target with a
//!    revenue of zero.
//! 2. **Select**: candidates are stably sorted by target name and the first one
//!    with strictly greatest revenue wins. Equal-revenue candidates seen later
//!    never replace the current best, which makes the lowest target name win ties.
//! 3. **Commit**: the winner's target leaves the working set, the reduced relation
//!    it owns is appended, and the winner is recorded in the history (replacing an
//!    earlier entry for the same pairing).
//!
//! The schedule is fixed: the search runs exactly `max_rounds` rounds and does not
//! stop on zero-revenue rounds. A round without any candidate is fatal.
//!
//! ```text
//! Initialized --step--> Iterating(1) --step--> ... Iterating(max_rounds) --> Terminated
//!      |                                                                       ^
//!      +----------------------- max_rounds == 0 / error -----------------------+
//! ```

use crate::catalog::Catalog;
use crate::cost::SemiJoin;
use crate::domain::DomainRegistry;
use crate::error::{Result, SemiJoinError};
use crate::relation::{Relation, RelationId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Lifecycle of a [`SemiJoinSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchState {
    Initialized,
    /// The given round (1-based) was the last one completed.
    Iterating(usize),
    Terminated,
}

/// Everything observable about one completed round.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundReport {
    /// 1-based round number.
    pub round: usize,
    /// All candidates of the round, in selection order.
    pub candidates: Vec<SemiJoin>,
    /// First candidate with the greatest revenue.
    pub selected: SemiJoin,
    /// Working set after the commit.
    pub relations: Vec<Arc<Relation>>,
}

/// One entry of the resulting semi-join program: `target ⋉ source` on `attribute`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemiJoinStep {
    pub round: usize,
    pub target: String,
    pub source: String,
    pub attribute: String,
    pub revenue: f64,
    pub cost: f64,
}

impl SemiJoinStep {
    fn from_selected(round: usize, selected: &SemiJoin) -> Self {
        Self {
            round,
            target: selected.target.name().to_string(),
            source: selected.source.name().to_string(),
            attribute: selected.attribute.clone(),
            revenue: selected.revenue,
            cost: selected.cost,
        }
    }
}

/// Outcome of [`SemiJoinSearch::run`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemiJoinProgram {
    pub initial: Vec<Arc<Relation>>,
    pub rounds: Vec<RoundReport>,
    pub steps: Vec<SemiJoinStep>,
}

impl SemiJoinProgram {
    /// Working set after the last round (the initial one if no round ran).
    pub fn final_relations(&self) -> &[Arc<Relation>] {
        self.rounds
            .last()
            .map(|r| r.relations.as_slice())
            .unwrap_or(&self.initial)
    }
}

/// The greedy semi-join selection engine.
///
/// Owns the working set of relations and the history of applied pairings. The
/// working set is only mutated by the commit step at the end of a round.
pub struct SemiJoinSearch {
    registry: DomainRegistry,
    relations: Vec<Arc<Relation>>,
    /// Last applied candidate per `(target, source)` pairing.
    history: BTreeMap<(RelationId, RelationId), SemiJoin>,
    max_rounds: usize,
    completed: usize,
    state: SearchState,
}

impl SemiJoinSearch {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            registry: catalog.registry,
            relations: catalog.relations.into_iter().map(Arc::new).collect(),
            history: BTreeMap::new(),
            max_rounds: catalog.max_rounds,
            completed: 0,
            state: SearchState::Initialized,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    /// Current working set, in insertion order.
    pub fn relations(&self) -> &[Arc<Relation>] {
        &self.relations
    }

    /// Applied pairings, ordered by `(target, source)` id.
    pub fn history(&self) -> impl Iterator<Item = &SemiJoin> {
        self.history.values()
    }

    /// Candidates for the next round, sorted by target name.
    pub fn candidates(&self) -> Result<Vec<SemiJoin>> {
        let mut candidates = Vec::new();

        for target in &self.relations {
            for source in &self.relations {
                if target.id() == source.id() {
                    continue;
                }

                if let Some(applied) = self.history.get(&(target.id(), source.id())) {
                    trace!(
                        "Re-issuing applied semi-join {} by {} on {}",
                        target.name(),
                        source.name(),
                        applied.attribute
                    );
                    candidates.push(applied.reissue(Arc::clone(target)));
                    continue;
                }

                for attribute in target.joinable_attributes(source, &self.registry) {
                    let candidate = SemiJoin::new(
                        Arc::clone(target),
                        Arc::clone(source),
                        attribute,
                        &self.registry,
                    )?;
                    trace!(
                        "Candidate {} by {} on {}: cost={:.1}, effect={:.1}, revenue={:.1}",
                        target.name(),
                        source.name(),
                        attribute,
                        candidate.cost,
                        candidate.effect,
                        candidate.revenue
                    );
                    candidates.push(candidate);
                }
            }
        }

        // Stable: candidates with the same target keep their enumeration order.
        candidates.sort_by(|a, b| a.target.name().cmp(b.target.name()));
        Ok(candidates)
    }

    /// Run one round. Returns `None` once the round bound has been reached.
    ///
    /// Any error terminates the search.
    pub fn step(&mut self) -> Result<Option<RoundReport>> {
        if self.state == SearchState::Terminated {
            return Ok(None);
        }
        if self.completed >= self.max_rounds {
            self.state = SearchState::Terminated;
            return Ok(None);
        }

        let round = self.completed + 1;
        match self.run_round(round) {
            Ok(report) => {
                self.completed = round;
                self.state = if round >= self.max_rounds {
                    SearchState::Terminated
                } else {
                    SearchState::Iterating(round)
                };
                Ok(Some(report))
            }
            Err(err) => {
                self.state = SearchState::Terminated;
                Err(err)
            }
        }
    }

    /// Run every remaining round.
    pub fn run(&mut self) -> Result<SemiJoinProgram> {
        debug!(
            "Starting semi-join selection: relations={}, max_rounds={}",
            self.relations.len(),
            self.max_rounds
        );

        let initial = self.relations.clone();
        let mut rounds = Vec::new();
        while let Some(report) = self.step()? {
            rounds.push(report);
        }

        let steps: Vec<_> = rounds
            .iter()
            .map(|r| SemiJoinStep::from_selected(r.round, &r.selected))
            .collect();
        debug!("Semi-join selection complete: rounds={}", steps.len());

        Ok(SemiJoinProgram {
            initial,
            rounds,
            steps,
        })
    }

    fn run_round(&mut self, round: usize) -> Result<RoundReport> {
        let candidates = self.candidates()?;

        let Some(selected) = select_best(&candidates).cloned() else {
            warn!("Round {} produced no semi-join candidates", round);
            return Err(SemiJoinError::NoCandidatesAvailable { round });
        };

        debug!(
            "Round {}: selected {} by {} on {} (revenue={:.1}, cost={:.1})",
            round,
            selected.target.name(),
            selected.source.name(),
            selected.attribute,
            selected.revenue,
            selected.cost
        );

        self.commit(&selected);

        Ok(RoundReport {
            round,
            candidates,
            selected,
            relations: self.relations.clone(),
        })
    }

    fn commit(&mut self, selected: &SemiJoin) {
        let target_id = selected.target.id();
        self.relations.retain(|r| r.id() != target_id);
        self.relations.push(Arc::clone(&selected.relation));
        if let Some(previous) = self.history.insert(selected.pair(), selected.clone()) {
            debug_assert!(previous.same_pairing(selected));
            trace!(
                "Replaced applied semi-join {} by {} on {}",
                previous.target.name(),
                previous.source.name(),
                previous.attribute
            );
        }
    }
}

/// First candidate with strictly greatest revenue.
pub fn select_best(candidates: &[SemiJoin]) -> Option<&SemiJoin> {
    let mut best: Option<&SemiJoin> = None;
    for candidate in candidates {
        if best.map_or(true, |b| b.revenue < candidate.revenue) {
            best = Some(candidate);
        }
    }
    best
}
