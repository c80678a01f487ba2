use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::analysis::graph::DependencyGraph;
use crate::core::types::{DependencyEdge, Item};

/// An item reached by a neighborhood query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborhoodNode {
    #[serde(flatten)]
    pub item: Item,
    /// Hops from the root
    pub depth: usize,
    /// Degree in the full graph, not the neighborhood
    pub degree: usize,
}

/// Bounded view around one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighborhood {
    pub root: String,
    pub depth: usize,
    pub nodes: Vec<NeighborhoodNode>,
    pub edges: Vec<DependencyEdge>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.item.id == id)
    }
}

/// Breadth-first walk from `root` up to `max_depth` hops, following
/// dependencies and dependents alike.
///
/// Each node is recorded at the depth it is first discovered at. Edges are
/// the traversal edges in discovery order, oriented dependency -> dependent.
/// An unknown root yields an empty neighborhood.
pub fn query_neighborhood(graph: &DependencyGraph, root: &str, max_depth: usize) -> Neighborhood {
    let mut neighborhood = Neighborhood {
        root: root.to_string(),
        depth: max_depth,
        nodes: Vec::new(),
        edges: Vec::new(),
    };

    let Some(root_item) = graph.item(root) else {
        tracing::debug!(root, "Neighborhood root is not a known item");
        return neighborhood;
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    visited.insert(root_item.id.as_str());
    queue.push_back((root_item.id.as_str(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if let Some(item) = graph.item(current) {
            neighborhood.nodes.push(NeighborhoodNode {
                item: item.clone(),
                depth,
                degree: graph.degree(current),
            });
        }
        if depth >= max_depth {
            continue;
        }

        for dependency in graph.dependencies_of(current) {
            if visited.insert(dependency) {
                neighborhood
                    .edges
                    .push(traversal_edge(graph, dependency, current));
                queue.push_back((dependency, depth + 1));
            }
        }
        for dependent in graph.dependents_of(current) {
            if visited.insert(dependent) {
                neighborhood
                    .edges
                    .push(traversal_edge(graph, current, dependent));
                queue.push_back((dependent, depth + 1));
            }
        }
    }

    tracing::debug!(
        root,
        nodes = neighborhood.nodes.len(),
        edges = neighborhood.edges.len(),
        "Collected neighborhood"
    );
    neighborhood
}

fn traversal_edge(graph: &DependencyGraph, from: &str, to: &str) -> DependencyEdge {
    DependencyEdge {
        from: from.to_string(),
        to: to.to_string(),
        label: graph.label(from, to).map(String::from),
    }
}
