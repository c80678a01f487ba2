//! Flag-based subgraph filtering
//!
//! Narrows the graph to the items connected to "flagged" items (items whose
//! row sets one of the indicator columns to 1). The traversal follows edges
//! in both directions and is bounded so dense or cyclic catalogs cannot make
//! it run away.

use std::collections::{BTreeSet, VecDeque};

use crate::analysis::graph::DependencyGraph;
use crate::config::ExplorerConfig;
use crate::core::extractor::row_id;
use crate::core::schema::Schema;
use crate::core::section::{Section, find_marker_column, flag_is_set};

/// A detected flag: the marker text and the column holding its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagColumn {
    pub marker: String,
    pub value_column: usize,
}

/// Locates the configured flag markers in `section`. Markers that do not
/// appear anywhere are left out.
pub fn detect_flag_columns(section: &Section<'_>, config: &ExplorerConfig) -> Vec<FlagColumn> {
    config
        .flag_markers
        .iter()
        .filter_map(|marker| {
            let value_column = find_marker_column(section, marker)?;
            tracing::debug!(marker = %marker, value_column, "Found flag column");
            Some(FlagColumn {
                marker: marker.clone(),
                value_column,
            })
        })
        .collect()
}

/// Ids of items whose row sets any flag column to "1".
pub fn flagged_items(
    section: &Section<'_>,
    schema: &Schema,
    flags: &[FlagColumn],
) -> BTreeSet<String> {
    if flags.is_empty() {
        return BTreeSet::new();
    }
    section
        .rows
        .iter()
        .filter(|row| flags.iter().any(|f| flag_is_set(row, f.value_column)))
        .filter_map(|row| row_id(row, schema))
        .collect()
}

/// Items reachable from `start` within `max_depth` hops, following both
/// dependents and dependencies. Ids unknown to the graph are ignored.
pub fn connected_items(
    graph: &DependencyGraph,
    start: &BTreeSet<String>,
    max_depth: usize,
) -> BTreeSet<String> {
    let mut connected: BTreeSet<String> = start
        .iter()
        .filter(|id| graph.contains(id))
        .cloned()
        .collect();
    let mut queue: VecDeque<(String, usize)> =
        connected.iter().map(|id| (id.clone(), 0)).collect();

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let neighbors: Vec<&str> = graph
            .dependencies_of(&current)
            .chain(graph.dependents_of(&current))
            .collect();
        for next in neighbors {
            if graph.contains(next) && !connected.contains(next) {
                connected.insert(next.to_string());
                queue.push_back((next.to_string(), depth + 1));
            }
        }
    }

    connected
}

/// Restricts `graph` to the component around `flagged`. Without flagged
/// items the graph is returned unchanged.
pub fn filter_by_flags(
    graph: &DependencyGraph,
    flagged: &BTreeSet<String>,
    max_depth: usize,
) -> DependencyGraph {
    if !flagged.iter().any(|id| graph.contains(id)) {
        tracing::info!("No flagged items found, keeping all items");
        return graph.clone();
    }

    let keep = connected_items(graph, flagged, max_depth);
    tracing::info!(
        flagged = flagged.len(),
        kept = keep.len(),
        total = graph.item_count(),
        "Filtered graph to flagged component"
    );

    let mut filtered = graph.clone();
    filtered.retain_items(&keep);
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Item, Row};

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// a -> b -> c -> d, plus an unrelated x -> y
    fn chain() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for id in ["a", "b", "c", "d", "x", "y"] {
            graph.add_item(Item::new(id, "Item"));
        }
        graph.add_edge("a", "b", None);
        graph.add_edge("b", "c", None);
        graph.add_edge("c", "d", None);
        graph.add_edge("x", "y", None);
        graph
    }

    #[test]
    fn test_filter_keeps_component_in_both_directions() {
        let graph = chain();
        let filtered = filter_by_flags(&graph, &ids(&["c"]), 10);

        assert_eq!(filtered.item_count(), 4);
        assert!(!filtered.contains("x"));
        assert_eq!(filtered.edge_count(), 3);
    }

    #[test]
    fn test_filter_depth_bound() {
        let graph = chain();
        let filtered = filter_by_flags(&graph, &ids(&["a"]), 2);

        let kept: Vec<_> = filtered.items().map(|i| i.id.as_str()).collect();
        assert_eq!(kept, vec!["a", "b", "c"]);
        // Edge c -> d leaves the kept set
        assert!(filtered.dependents_of("c").next().is_none());
    }

    #[test]
    fn test_no_flags_is_noop() {
        let graph = chain();
        assert_eq!(filter_by_flags(&graph, &BTreeSet::new(), 10), graph);
        assert_eq!(filter_by_flags(&graph, &ids(&["unknown"]), 10), graph);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let graph = chain();
        let flagged = ids(&["b", "y"]);
        let once = filter_by_flags(&graph, &flagged, 1);
        let twice = filter_by_flags(&once, &flagged, 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flag_detection_from_rows() {
        let header = Row::from_fields(&[
            "id",
            "name",
            "type",
            "actuarial_liability",
            "",
            "PAYMENT_RISK",
            "",
        ]);
        let rows = vec![
            Row::from_fields(&["1", "A", "Item", "", "1", "", "0"]),
            Row::from_fields(&["2", "B", "Item", "", "0", "", "1 "]),
            Row::from_fields(&["3", "C", "Item", "", "0", "", "0"]),
        ];
        let section = Section {
            anchor_row: Some(0),
            header: Some(&header),
            rows: rows.iter().collect(),
        };

        let flags = detect_flag_columns(&section, &ExplorerConfig::default());
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].value_column, 4);
        assert_eq!(flags[1].value_column, 6);

        let flagged = flagged_items(&section, &Schema::default(), &flags);
        assert_eq!(flagged, ids(&["1", "2"]));
    }
}
