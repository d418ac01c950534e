//! Deadlock (cycle) detection.
//!
//! A dependency chain that loops back on itself can never be validly
//! scheduled; this module finds those chains so they can be surfaced to
//! the caller. Cycles are detected and reported, never prevented - edge
//! writes are only gated by the synchronous mutation guard.

use crate::builder::DependencyGraph;
use keystone_core::InitiativeId;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Result of a deadlock scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    /// True when at least one cycle was found
    pub has_deadlocks: bool,

    /// Each cycle as the ordered node sequence forming the loop. The first
    /// element is the node the traversal re-entered; the closing repeat is
    /// omitted.
    pub cycles: Vec<Vec<InitiativeId>>,
}

/// Depth-first scan for dependency cycles.
///
/// Roots are visited in supplied-node order (then dangling edge sources in
/// edge order), with a visited set persisting across roots, so identical
/// inputs always produce identical reports.
pub fn detect_cycles(graph: &DependencyGraph) -> CycleReport {
    let mut cycles = Vec::new();
    let mut visited: HashSet<InitiativeId> = HashSet::new();

    let roots = graph
        .nodes_in_order()
        .iter()
        .chain(graph.edge_only_sources())
        .copied();

    for root in roots {
        if visited.contains(&root) {
            continue;
        }
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();
        if let Some(cycle) = find_cycle(root, graph, &mut visited, &mut on_stack, &mut path) {
            debug!(len = cycle.len(), "dependency cycle found");
            cycles.push(cycle);
        }
    }

    CycleReport {
        has_deadlocks: !cycles.is_empty(),
        cycles,
    }
}

/// Find a cycle reachable from `node` using DFS.
fn find_cycle(
    node: InitiativeId,
    graph: &DependencyGraph,
    visited: &mut HashSet<InitiativeId>,
    on_stack: &mut HashSet<InitiativeId>,
    path: &mut Vec<InitiativeId>,
) -> Option<Vec<InitiativeId>> {
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);

    for edge in graph.successors(node) {
        if !visited.contains(&edge.to) {
            if let Some(cycle) = find_cycle(edge.to, graph, visited, on_stack, path) {
                return Some(cycle);
            }
        } else if on_stack.contains(&edge.to) {
            // Back edge: the loop runs from the re-entered node to here.
            let start = path.iter().position(|id| *id == edge.to).unwrap();
            return Some(path[start..].to_vec());
        }
    }

    path.pop();
    on_stack.remove(&node);
    None
}
