//! Dependency graph construction.

use keystone_core::{DependencyEdge, DependencyType, Initiative, InitiativeId};
use std::collections::HashMap;

/// An outgoing edge in the adjacency structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    /// The successor initiative
    pub to: InitiativeId,
    /// Constraint type carried by the edge
    pub kind: DependencyType,
}

/// Adjacency representation of one project's dependency graph.
///
/// The graph is a read model over possibly-inconsistent external data:
/// edges referencing IDs outside the node table are kept, and downstream
/// consumers decide how to treat them. The supplied node order is preserved
/// and drives every deterministic tie-break in the engine.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: HashMap<InitiativeId, Initiative>,
    order: Vec<InitiativeId>,
    edge_only: Vec<InitiativeId>,
    adjacency: HashMap<InitiativeId, Vec<GraphEdge>>,
    edge_count: usize,
}

impl DependencyGraph {
    /// Build the graph from a flat node and edge list. Pure and infallible.
    pub fn build(initiatives: Vec<Initiative>, edges: &[DependencyEdge]) -> Self {
        let mut nodes = HashMap::with_capacity(initiatives.len());
        let mut order = Vec::with_capacity(initiatives.len());
        for initiative in initiatives {
            let id = initiative.id;
            // Last record wins on duplicate IDs; order keeps the first slot.
            if nodes.insert(id, initiative).is_none() {
                order.push(id);
            }
        }

        let mut adjacency: HashMap<InitiativeId, Vec<GraphEdge>> = HashMap::new();
        let mut edge_only = Vec::new();
        for edge in edges {
            if !nodes.contains_key(&edge.from) && !edge_only.contains(&edge.from) {
                edge_only.push(edge.from);
            }
            adjacency.entry(edge.from).or_default().push(GraphEdge {
                to: edge.to,
                kind: edge.kind,
            });
        }

        Self {
            nodes,
            order,
            edge_only,
            adjacency,
            edge_count: edges.len(),
        }
    }

    /// Look up an initiative by ID.
    pub fn node(&self, id: InitiativeId) -> Option<&Initiative> {
        self.nodes.get(&id)
    }

    /// Initiative IDs in supplied order.
    pub fn nodes_in_order(&self) -> &[InitiativeId] {
        &self.order
    }

    /// IDs that appear as edge sources without a matching initiative
    /// record, in edge order. Dangling, but still traversable.
    pub fn edge_only_sources(&self) -> &[InitiativeId] {
        &self.edge_only
    }

    /// Outgoing edges of a node, in edge insertion order.
    pub fn successors(&self, id: InitiativeId) -> &[GraphEdge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of initiative records.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the graph holds no initiative records.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of edges, dangling ones included.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// In-degree of every known node, counting only edges whose endpoints
    /// both have initiative records. Dangling edges carry no scheduling
    /// weight, so they do not disqualify a node from being a start node.
    pub fn incoming_counts(&self) -> HashMap<InitiativeId, usize> {
        let mut counts: HashMap<InitiativeId, usize> =
            self.order.iter().map(|id| (*id, 0)).collect();
        for (from, edges) in &self.adjacency {
            if !self.nodes.contains_key(from) {
                continue;
            }
            for edge in edges {
                if let Some(count) = counts.get_mut(&edge.to) {
                    *count += 1;
                }
            }
        }
        counts
    }
}
