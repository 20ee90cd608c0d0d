//! Plain-text tables for relations and semi-join candidates.

use crate::cost::SemiJoin;
use crate::domain::DomainRegistry;
use crate::relation::Relation;
use crate::search::{RoundReport, SemiJoinProgram};
use std::fmt::Write;
use std::sync::Arc;

/// One row per relation, one `size | val | sf` cell group per registered attribute.
pub fn render_relations(registry: &DomainRegistry, relations: &[Arc<Relation>]) -> String {
    let mut out = String::new();

    let header: Vec<_> = registry
        .attributes()
        .map(|a| format!("{a:>6}.size | {a:>5}.val | {a:>5}.sf"))
        .collect();
    let _ = writeln!(out, " {:>6} | {:>7} | {}", "", "CARD", header.join(" | "));

    for relation in relations {
        let cells: Vec<_> = registry
            .attributes()
            .map(|a| match relation.column(a) {
                Some(c) => format!(
                    "{:>11} | {:>9} | {:>8}",
                    c.size(),
                    c.value_count(),
                    c.selectivity()
                ),
                None => format!("{:>11} | {:>9} | {:>8}", "", "", ""),
            })
            .collect();
        let _ = writeln!(
            out,
            " {:>6} | {:>7} | {}",
            relation.name(),
            relation.cardinality(),
            cells.join(" | ")
        );
    }
    out
}

pub fn render_candidates<'a>(candidates: impl IntoIterator<Item = &'a SemiJoin>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        " {:>6} | {:>4} | {:>6} | {:>8} | {:>8} | {:>8}",
        "R", "COL", "S", "COST", "EFFECT", "REVENUE"
    );
    for sj in candidates {
        let _ = writeln!(
            out,
            " {:>6} | {:>4} | {:>6} | {:>8} | {:>8} | {:>8}",
            sj.target.name(),
            sj.attribute,
            sj.source.name(),
            sj.cost,
            sj.effect,
            sj.revenue
        );
    }
    out
}

pub fn render_round(registry: &DomainRegistry, report: &RoundReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Iteration #{}", report.round);
    let _ = writeln!(out, "\nSemi joins");
    out.push_str(&render_candidates(&report.candidates));
    let _ = writeln!(out, "\nBest semi join");
    out.push_str(&render_candidates([&report.selected]));
    let _ = writeln!(out, "\nRelations");
    out.push_str(&render_relations(registry, &report.relations));
    out
}

/// Initial state followed by every round.
pub fn render_program(registry: &DomainRegistry, program: &SemiJoinProgram) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Initial state");
    out.push_str(&render_relations(registry, &program.initial));
    for report in &program.rounds {
        out.push('\n');
        out.push_str(&render_round(registry, report));
    }
    if !program.steps.is_empty() {
        let _ = writeln!(out, "\nSemi-join program");
        for step in &program.steps {
            let _ = writeln!(
                out,
                " {}. {} ⋉ {} on {}",
                step.round, step.target, step.source, step.attribute
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::default_dataset;
    use crate::search::SemiJoinSearch;

    #[test]
    fn test_render_program_mentions_every_round() {
        let config = default_dataset();
        let catalog = config.build().unwrap();
        let registry = catalog.registry.clone();
        let program = SemiJoinSearch::new(catalog).run().unwrap();

        let text = render_program(&registry, &program);
        assert!(text.starts_with("Initial state"));
        for round in 1..=config.max_rounds {
            assert!(text.contains(&format!("Iteration #{round}")));
        }
        assert!(text.contains("Best semi join"));
        assert!(text.contains("R3'"));
    }

    #[test]
    fn test_render_relations_leaves_absent_columns_blank() {
        let catalog = default_dataset().build().unwrap();
        let relations: Vec<_> = catalog.relations.into_iter().map(Arc::new).collect();
        let text = render_relations(&catalog.registry, &relations);

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 1 + relations.len());
        assert!(lines[0].contains("A.size"));
        assert!(lines[0].contains("F.sf"));
        assert!(lines[1].trim_start().starts_with("R1"));
        assert!(lines[1].contains("0.5"));
    }
}
