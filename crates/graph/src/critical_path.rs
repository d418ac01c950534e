//! Critical path computation (CPM longest path).
//!
//! The critical path is the duration-weighted longest chain of dependent
//! initiatives; its total duration is the minimum project duration. The
//! computation is a memoized depth-first longest-path pass restricted to
//! the acyclic substructure: an on-stack set drops back edges, so cyclic
//! input degrades to a bounded best-effort answer instead of hanging.

use crate::builder::DependencyGraph;
use keystone_core::{Initiative, InitiativeId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// The longest duration-weighted chain through the graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CriticalPath {
    /// Initiatives on the path, predecessor first
    pub initiatives: Vec<Initiative>,

    /// Sum of the path members' durations in days
    pub total_duration_days: u64,
}

/// Compute the critical path of a built graph.
///
/// Start candidates are the nodes with no incoming edges, in supplied
/// order; a fully cyclic component has no such node, in which case every
/// node is a candidate. Ties in total duration resolve to the earliest
/// node in the supplied order, at the start and at every hop, so repeated
/// calls on the same snapshot return identical paths.
pub fn calculate_critical_path(graph: &DependencyGraph) -> CriticalPath {
    if graph.is_empty() {
        return CriticalPath::default();
    }

    let rank: HashMap<InitiativeId, usize> = graph
        .nodes_in_order()
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let incoming = graph.incoming_counts();
    let mut starts: Vec<InitiativeId> = graph
        .nodes_in_order()
        .iter()
        .filter(|id| incoming[*id] == 0)
        .copied()
        .collect();
    if starts.is_empty() {
        // Every node sits on a cycle; fall back to scanning them all.
        starts = graph.nodes_in_order().to_vec();
    }

    let mut memo: HashMap<InitiativeId, Longest> = HashMap::new();
    let mut on_stack: HashSet<InitiativeId> = HashSet::new();

    let mut best_start: Option<(InitiativeId, u64)> = None;
    for start in starts {
        let longest = longest_from(start, graph, &rank, &mut memo, &mut on_stack);
        // Strict comparison keeps the earliest start on ties.
        if best_start.map_or(true, |(_, d)| longest.total > d) {
            best_start = Some((start, longest.total));
        }
    }

    let Some((start, total)) = best_start else {
        return CriticalPath::default();
    };

    let mut initiatives = Vec::new();
    let mut cursor = Some(start);
    while let Some(id) = cursor {
        if let Some(node) = graph.node(id) {
            initiatives.push(node.clone());
        }
        cursor = memo.get(&id).and_then(|l| l.next);
    }

    debug!(
        len = initiatives.len(),
        total_days = total,
        "critical path computed"
    );

    CriticalPath {
        initiatives,
        total_duration_days: total,
    }
}

#[derive(Debug, Clone, Copy)]
struct Longest {
    /// Path duration from this node to its best sink, own duration included
    total: u64,
    /// Best successor to follow when reconstructing the path
    next: Option<InitiativeId>,
}

fn longest_from(
    id: InitiativeId,
    graph: &DependencyGraph,
    rank: &HashMap<InitiativeId, usize>,
    memo: &mut HashMap<InitiativeId, Longest>,
    on_stack: &mut HashSet<InitiativeId>,
) -> Longest {
    if let Some(&cached) = memo.get(&id) {
        return cached;
    }

    let own = graph
        .node(id)
        .map(|i| u64::from(i.duration_days()))
        .unwrap_or(0);

    on_stack.insert(id);

    // Candidate successors: known nodes not currently on the DFS stack
    // (back edges are dropped - that is what bounds cyclic input), ranked
    // by supplied order so ties resolve deterministically.
    let mut successors: Vec<InitiativeId> = graph
        .successors(id)
        .iter()
        .map(|e| e.to)
        .filter(|to| rank.contains_key(to) && !on_stack.contains(to))
        .collect();
    successors.sort_by_key(|to| rank[to]);
    successors.dedup();

    let mut best: (u64, Option<InitiativeId>) = (0, None);
    for succ in successors {
        let longest = longest_from(succ, graph, rank, memo, on_stack);
        if longest.total > best.0 {
            best = (longest.total, Some(succ));
        }
    }

    on_stack.remove(&id);

    let result = Longest {
        total: own + best.0,
        next: best.1,
    };
    memo.insert(id, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_core::{DependencyEdge, DependencyType, ProjectId};

    fn sized(project: ProjectId, name: &str, days: u32) -> Initiative {
        Initiative::new(project, name).with_duration(days)
    }

    fn names(path: &CriticalPath) -> Vec<&str> {
        path.initiatives.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn empty_graph_yields_zero() {
        let graph = DependencyGraph::build(Vec::new(), &[]);
        let path = calculate_critical_path(&graph);
        assert!(path.initiatives.is_empty());
        assert_eq!(path.total_duration_days, 0);
    }

    #[test]
    fn isolated_node_is_its_own_path() {
        let project = ProjectId::new();
        let a = sized(project, "a", 4);
        let graph = DependencyGraph::build(vec![a], &[]);

        let path = calculate_critical_path(&graph);
        assert_eq!(names(&path), vec!["a"]);
        assert_eq!(path.total_duration_days, 4);
    }

    #[test]
    fn no_edges_picks_the_single_longest_node() {
        let project = ProjectId::new();
        let nodes = vec![
            sized(project, "a", 3),
            sized(project, "b", 9),
            sized(project, "c", 6),
        ];
        let graph = DependencyGraph::build(nodes, &[]);

        let path = calculate_critical_path(&graph);
        assert_eq!(names(&path), vec!["b"]);
        assert_eq!(path.total_duration_days, 9);
    }

    #[test]
    fn linear_chain_sums_durations() {
        let project = ProjectId::new();
        let a = sized(project, "a", 5);
        let b = sized(project, "b", 10);
        let c = sized(project, "c", 2);
        let edges = vec![
            DependencyEdge::new(a.id, b.id, DependencyType::FinishToStart),
            DependencyEdge::new(b.id, c.id, DependencyType::FinishToStart),
        ];
        let graph = DependencyGraph::build(vec![a, b, c], &edges);

        let path = calculate_critical_path(&graph);
        assert_eq!(names(&path), vec!["a", "b", "c"]);
        assert_eq!(path.total_duration_days, 17);
    }

    #[test]
    fn unconnected_node_does_not_inflate_the_path() {
        let project = ProjectId::new();
        let a = sized(project, "a", 5);
        let b = sized(project, "b", 10);
        let c = sized(project, "c", 5);
        let edges = vec![DependencyEdge::new(a.id, b.id, DependencyType::FinishToStart)];
        let graph = DependencyGraph::build(vec![a, b, c], &edges);

        let path = calculate_critical_path(&graph);
        assert_eq!(names(&path), vec!["a", "b"]);
        assert_eq!(path.total_duration_days, 15);
    }

    #[test]
    fn branches_pick_the_heavier_arm() {
        // a -> b(10) and a -> c(3) -> d(4): the b arm wins.
        let project = ProjectId::new();
        let a = sized(project, "a", 1);
        let b = sized(project, "b", 10);
        let c = sized(project, "c", 3);
        let d = sized(project, "d", 4);
        let edges = vec![
            DependencyEdge::new(a.id, b.id, DependencyType::FinishToStart),
            DependencyEdge::new(a.id, c.id, DependencyType::FinishToStart),
            DependencyEdge::new(c.id, d.id, DependencyType::FinishToStart),
        ];
        let graph = DependencyGraph::build(vec![a, b, c, d], &edges);

        let path = calculate_critical_path(&graph);
        assert_eq!(names(&path), vec!["a", "b"]);
        assert_eq!(path.total_duration_days, 11);
    }

    #[test]
    fn equal_paths_prefer_the_earlier_supplied_node() {
        // Two arms of identical weight; the successor supplied first wins.
        let project = ProjectId::new();
        let a = sized(project, "a", 2);
        let b = sized(project, "b", 7);
        let c = sized(project, "c", 7);
        let edges = vec![
            DependencyEdge::new(a.id, c.id, DependencyType::FinishToStart),
            DependencyEdge::new(a.id, b.id, DependencyType::FinishToStart),
        ];
        // b is supplied before c, so the tie resolves to b even though the
        // a->c edge was recorded first.
        let graph = DependencyGraph::build(vec![a, b, c], &edges);

        let path = calculate_critical_path(&graph);
        assert_eq!(names(&path), vec!["a", "b"]);
        assert_eq!(path.total_duration_days, 9);
    }

    #[test]
    fn cyclic_graph_terminates_with_a_result() {
        let project = ProjectId::new();
        let a = sized(project, "a", 5);
        let b = sized(project, "b", 3);
        let edges = vec![
            DependencyEdge::new(a.id, b.id, DependencyType::FinishToStart),
            DependencyEdge::new(b.id, a.id, DependencyType::FinishToStart),
        ];
        let graph = DependencyGraph::build(vec![a, b], &edges);

        let path = calculate_critical_path(&graph);
        // Best-effort: the heavier entry point wins once its back edge is
        // dropped.
        assert_eq!(path.total_duration_days, 8);
        assert_eq!(names(&path), vec!["a", "b"]);
    }

    #[test]
    fn dangling_edges_are_ignored_for_duration() {
        let project = ProjectId::new();
        let a = sized(project, "a", 5);
        let ghost = InitiativeId::new();
        let edges = vec![DependencyEdge::new(a.id, ghost, DependencyType::FinishToStart)];
        let graph = DependencyGraph::build(vec![a], &edges);

        let path = calculate_critical_path(&graph);
        assert_eq!(names(&path), vec!["a"]);
        assert_eq!(path.total_duration_days, 5);
    }

    #[test]
    fn identical_snapshots_compute_identical_paths() {
        let project = ProjectId::new();
        let a = sized(project, "a", 2);
        let b = sized(project, "b", 2);
        let c = sized(project, "c", 2);
        let edges = vec![
            DependencyEdge::new(a.id, b.id, DependencyType::FinishToStart),
            DependencyEdge::new(a.id, c.id, DependencyType::FinishToStart),
        ];
        let graph = DependencyGraph::build(vec![a, b, c], &edges);

        let first = calculate_critical_path(&graph);
        let second = calculate_critical_path(&graph);
        let first_ids: Vec<_> = first.initiatives.iter().map(|i| i.id).collect();
        let second_ids: Vec<_> = second.initiatives.iter().map(|i| i.id).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(first.total_duration_days, second.total_duration_days);
    }
}
