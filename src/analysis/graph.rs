use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::core::types::{DependencyEdge, Item};

/// Items and their dependency relations in both directions.
///
/// `dependents[a]` holds every item that references `a`; `dependencies[b]`
/// holds every item `b` references. The two maps are only ever modified
/// together, so `b ∈ dependents[a]` exactly when `a ∈ dependencies[b]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    items: BTreeMap<String, Item>,
    dependents: BTreeMap<String, BTreeSet<String>>,
    dependencies: BTreeMap<String, BTreeSet<String>>,
    labels: HashMap<(String, String), String>,
}

/// Summary numbers for logs and report headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub items: usize,
    pub edges: usize,
    pub isolated: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an item record. Existing edges are kept.
    /// Returns the replaced record, if any.
    pub fn add_item(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id.clone(), item)
    }

    /// Adds the edge `from -> to` (dependency -> dependent). Both endpoints
    /// must be known items; otherwise nothing is inserted and `false` is
    /// returned. The first label recorded for a pair is kept.
    pub fn add_edge(&mut self, from: &str, to: &str, label: Option<&str>) -> bool {
        if !self.items.contains_key(from) || !self.items.contains_key(to) {
            return false;
        }
        self.dependents
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.dependencies
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        if let Some(label) = label {
            self.labels
                .entry((from.to_string(), to.to_string()))
                .or_insert_with(|| label.to_string());
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Items ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items that reference `id`.
    pub fn dependents_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Items referenced by `id`.
    pub fn dependencies_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.dependencies
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn dependents(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.dependents
    }

    pub fn dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.dependencies
    }

    pub fn label(&self, from: &str, to: &str) -> Option<&str> {
        self.labels
            .get(&(from.to_string(), to.to_string()))
            .map(String::as_str)
    }

    /// Number of incident edges; a self-reference counts twice.
    pub fn degree(&self, id: &str) -> usize {
        self.dependents.get(id).map_or(0, BTreeSet::len)
            + self.dependencies.get(id).map_or(0, BTreeSet::len)
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(BTreeSet::len).sum()
    }

    /// All edges, ordered by `(from, to)`.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.dependents
            .iter()
            .flat_map(|(from, targets)| {
                targets.iter().map(move |to| DependencyEdge {
                    from: from.clone(),
                    to: to.clone(),
                    label: self.label(from, to).map(String::from),
                })
            })
            .collect()
    }

    /// Keeps only the items in `keep`; edges with an endpoint outside the set
    /// are dropped and empty adjacency entries removed.
    pub fn retain_items(&mut self, keep: &BTreeSet<String>) {
        self.items.retain(|id, _| keep.contains(id));
        for map in [&mut self.dependents, &mut self.dependencies] {
            map.retain(|id, _| keep.contains(id));
            for targets in map.values_mut() {
                targets.retain(|t| keep.contains(t));
            }
            map.retain(|_, targets| !targets.is_empty());
        }
        self.labels
            .retain(|(from, to), _| keep.contains(from) && keep.contains(to));
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            items: self.items.len(),
            edges: self.edge_count(),
            isolated: self.items.keys().filter(|id| self.degree(id) == 0).count(),
        }
    }
}
