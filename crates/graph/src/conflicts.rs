//! Scheduling conflict detection.
//!
//! Cross-references the dependency graph with each initiative's planned
//! dates to flag logically impossible schedules. Only `FINISH_TO_START`
//! edges have defined conflict semantics; `START_TO_START`,
//! `FINISH_TO_FINISH` and `START_TO_FINISH` are structurally valid but
//! conflict-inert until the platform defines their rules.

use crate::builder::DependencyGraph;
use crate::cycles::CycleReport;
use keystone_core::{DependencyType, InitiativeId};
use serde::Serialize;

/// Why a pair of initiatives cannot be scheduled as planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictReason {
    /// The successor's planned start precedes the predecessor's planned end
    SuccessorStartsBeforePredecessorEnds,
}

/// A date conflict on a single dependency edge.
#[derive(Debug, Clone, Serialize)]
pub struct DateConflict {
    /// The predecessor initiative
    pub from: InitiativeId,

    /// The successor initiative
    pub to: InitiativeId,

    /// Why the pair conflicts
    pub reason: ConflictReason,
}

/// The full conflict report for a project.
///
/// Deadlocked dependency chains can never be validly scheduled, so the
/// deadlock scan's findings fold into this report as their own conflict
/// class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConflictReport {
    /// True when any date conflict or deadlock exists
    pub has_conflicts: bool,

    /// Date conflicts on individual edges
    pub conflicts: Vec<DateConflict>,

    /// Deadlocked chains, as reported by the cycle detector
    pub deadlocks: Vec<Vec<InitiativeId>>,
}

/// Scan every edge for date conflicts and fold in the deadlock report.
///
/// Edges are visited in supplied-node order, then edge order, so the
/// report is stable across identical snapshots. Pairs missing either
/// relevant date cannot conflict and are skipped.
pub fn detect_conflicts(graph: &DependencyGraph, cycle_report: &CycleReport) -> ConflictReport {
    let mut conflicts = Vec::new();

    // Dangling sources have no record and therefore no dates; only edges
    // out of known nodes can conflict.
    for &from in graph.nodes_in_order() {
        let Some(predecessor) = graph.node(from) else {
            continue;
        };
        for edge in graph.successors(from) {
            match edge.kind {
                DependencyType::FinishToStart => {
                    let Some(successor) = graph.node(edge.to) else {
                        continue;
                    };
                    if let (Some(end), Some(start)) =
                        (predecessor.planned_end, successor.planned_start)
                    {
                        if start < end {
                            conflicts.push(DateConflict {
                                from,
                                to: edge.to,
                                reason: ConflictReason::SuccessorStartsBeforePredecessorEnds,
                            });
                        }
                    }
                }
                // Conflict semantics for these types are not defined yet.
                DependencyType::StartToStart
                | DependencyType::FinishToFinish
                | DependencyType::StartToFinish => {}
            }
        }
    }

    ConflictReport {
        has_conflicts: !conflicts.is_empty() || cycle_report.has_deadlocks,
        conflicts,
        deadlocks: cycle_report.cycles.clone(),
    }
}
