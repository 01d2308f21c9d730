//! Reference graph management using `petgraph`.
//!
//! Builds a directed graph from resource references and links, and resolves
//! a deterministic materialization order.

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use stackwire_common::error::{ResolutionError, Result};

/// A dependency graph of resources.
///
/// Node indices follow insertion order, which callers keep equal to
/// declaration order; ties in the ordering are broken on it.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: petgraph::Graph<String, ()>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: petgraph::Graph::new(),
        }
    }

    /// Adds a resource node to the graph.
    pub fn add_resource(&mut self, name: impl Into<String>) -> NodeIndex {
        self.graph.add_node(name.into())
    }

    /// Adds a dependency edge: `dependent` depends on `dependency`.
    ///
    /// The graph edge points from `dependency` to `dependent` so that
    /// dependencies come out first. Repeated edges are collapsed.
    pub fn add_dependency(&mut self, dependent: NodeIndex, dependency: NodeIndex) {
        let _ = self.graph.update_edge(dependency, dependent, ());
    }

    /// Returns the materialization order.
    ///
    /// Resources are grouped by rank: rank 0 holds resources with no
    /// dependencies, rank `n` those whose longest dependency chain has length
    /// `n`. Ranks are emitted in ascending order, and each rank in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Cycle`] naming every resource that sits on
    /// a cycle.
    pub fn resolve_order(&self) -> Result<Vec<String>> {
        let mut pending: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();

        let mut rank: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|n| pending[n.index()] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.graph.node_count());

        while !rank.is_empty() {
            rank.sort_unstable();
            let mut next = Vec::new();
            for &node in &rank {
                for dependent in self.graph.neighbors_directed(node, Direction::Outgoing) {
                    pending[dependent.index()] -= 1;
                    if pending[dependent.index()] == 0 {
                        next.push(dependent);
                    }
                }
                order.push(self.graph[node].clone());
            }
            rank = next;
        }

        if order.len() < self.graph.node_count() {
            return Err(ResolutionError::Cycle {
                resources: self.cycle_members(),
            }
            .into());
        }
        Ok(order)
    }

    fn cycle_members(&self) -> Vec<String> {
        let mut members: Vec<NodeIndex> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .flatten()
            .collect();
        members.sort_unstable();
        members.into_iter().map(|n| self.graph[n].clone()).collect()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
