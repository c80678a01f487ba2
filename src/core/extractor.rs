//! Graph extraction
//!
//! Builds the item table and the dependency graph from the located section.
//! A reference can only be validated once every item is known, so extraction
//! runs in two passes: pass A turns rows into items plus raw references,
//! pass B keeps the references whose target exists.

use serde::Serialize;

use crate::analysis::graph::DependencyGraph;
use crate::config::ExplorerConfig;
use crate::core::address::ColumnRange;
use crate::core::schema::{Field, Schema};
use crate::core::section::Section;
use crate::core::types::{Item, Row};
use crate::error::Result;

/// Fixed identity columns of every export.
pub const ID_COLUMN: usize = 0;
pub const NAME_COLUMN: usize = 1;
pub const TYPE_COLUMN: usize = 2;

const NAME_SEPARATOR: &str = " - ";

/// Unvalidated dependency found in a row: `source` depends on `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Counters collected while extracting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub rows_scanned: usize,
    pub rows_skipped: usize,
    pub duplicate_ids: usize,
    pub references_found: usize,
    pub references_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub graph: DependencyGraph,
    pub report: ExtractionReport,
}

/// Canonical id of a row: the detected `id_item` value when present,
/// otherwise the identity column. `None` for rows without an id.
pub fn row_id(row: &Row, schema: &Schema) -> Option<String> {
    schema
        .column(Field::IdItem)
        .and_then(|col| row.cell(col).trimmed())
        .or_else(|| row.cell(ID_COLUMN).trimmed())
        .map(String::from)
}

/// Builds the graph for `section` using the detected `schema`.
pub fn build_graph(
    section: &Section<'_>,
    schema: &Schema,
    config: &ExplorerConfig,
) -> Result<Extraction> {
    let (primary, series) = config.dependency_ranges()?;
    let mut graph = DependencyGraph::new();
    let mut report = ExtractionReport::default();
    let mut references = Vec::new();

    // Pass A: items and raw references
    for row in &section.rows {
        report.rows_scanned += 1;
        let Some(id) = row_id(row, schema) else {
            report.rows_skipped += 1;
            continue;
        };

        let item = build_item(row, &id, schema);
        let is_series = item.item_type.contains("Series");
        if let Some(previous) = graph.add_item(item) {
            report.duplicate_ids += 1;
            tracing::debug!(
                id = %previous.id,
                "Duplicate item id, later row overwrites earlier record"
            );
        }

        references.extend(decode_references(row, &id, primary));
        if is_series {
            references.extend(decode_references(row, &id, series));
        }
    }

    // Pass B: resolve against the complete item table
    report.references_found = references.len();
    for reference in &references {
        if !graph.add_edge(&reference.target, &reference.source, Some(reference.label.as_str())) {
            report.references_dropped += 1;
            tracing::trace!(
                source = %reference.source,
                target = %reference.target,
                "Dropping reference to unknown item"
            );
        }
    }

    tracing::info!(
        items = graph.item_count(),
        edges = graph.edge_count(),
        dropped = report.references_dropped,
        "Built dependency graph"
    );

    Ok(Extraction { graph, report })
}

fn build_item(row: &Row, id: &str, schema: &Schema) -> Item {
    let fragment = |field: Field| {
        schema
            .column(field)
            .and_then(|col| row.cell(col).trimmed())
    };

    let name = fragment(Field::ItemName).or_else(|| row.cell(NAME_COLUMN).trimmed());
    let mut parts: Vec<&str> = Vec::with_capacity(4);
    for part in [
        fragment(Field::IdItem),
        fragment(Field::IdEvent),
        fragment(Field::DisplayGroup),
        name,
    ]
    .into_iter()
    .flatten()
    {
        if !parts.contains(&part) {
            parts.push(part);
        }
    }

    let item_type = row
        .cell(TYPE_COLUMN)
        .trimmed()
        .unwrap_or("Unknown")
        .to_string();

    let mut item = Item::new(id, item_type);
    if let Some(last) = parts.last() {
        item.short_name = last.to_string();
        item.display_name = parts.join(NAME_SEPARATOR);
    }
    item
}

/// Walks `(label, value)` pairs of `range`. Labels look like `Name:Type`;
/// only `Item` and `Series` types reference other items.
pub fn decode_references(row: &Row, source: &str, range: ColumnRange) -> Vec<RawReference> {
    range
        .pairs()
        .filter_map(|(label_col, value_col)| {
            let label = row.cell(label_col).as_text()?;
            let (name, kind) = label.split_once(':')?;
            if !matches!(kind.trim(), "Item" | "Series") {
                return None;
            }
            let target = reference_target(row.cell(value_col).trimmed()?)?;
            Some(RawReference {
                source: source.to_string(),
                target: target.to_string(),
                label: name.trim().to_string(),
            })
        })
        .collect()
}

/// Id part of a dependency token (`"12:Pension"` -> `"12"`); placeholder
/// values yield `None`.
fn reference_target(value: &str) -> Option<&str> {
    if value.eq_ignore_ascii_case("empty") || value.eq_ignore_ascii_case("nan") {
        return None;
    }
    let id = match value.split_once(':') {
        Some((id, _)) => id.trim(),
        None => value,
    };
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnRangeConfig;
    use crate::core::schema::{MatchTier, Resolved};

    /// Dependency ranges D..G (primary) and H..K (series) keep rows short.
    fn config() -> ExplorerConfig {
        ExplorerConfig {
            primary_range: ColumnRangeConfig::new("D", "G"),
            series_range: ColumnRangeConfig::new("H", "K"),
            ..Default::default()
        }
    }

    fn section(rows: &[Row]) -> Section<'_> {
        Section {
            anchor_row: None,
            header: None,
            rows: rows.iter().collect(),
        }
    }

    fn row(fields: &[&str]) -> Row {
        Row::from_fields(fields)
    }

    fn resolved(column: usize) -> Option<Resolved> {
        Some(Resolved {
            column,
            tier: MatchTier::Exact,
        })
    }

    #[test]
    fn test_reference_produces_edge_from_dependency() -> Result<()> {
        let rows = vec![
            row(&["3", "Age", "Item"]),
            row(&["7", "Pension", "Item", "Age:Item", "3"]),
        ];
        let extraction = build_graph(&section(&rows), &Schema::default(), &config())?;
        let edges = extraction.graph.edges();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, "3");
        assert_eq!(edges[0].to, "7");
        assert_eq!(edges[0].label.as_deref(), Some("Age"));
        Ok(())
    }

    #[test]
    fn test_unknown_reference_is_dropped() -> Result<()> {
        let rows = vec![row(&["7", "Pension", "Item", "Age:Item", "99"])];
        let extraction = build_graph(&section(&rows), &Schema::default(), &config())?;

        assert_eq!(extraction.graph.edge_count(), 0);
        assert_eq!(extraction.report.references_found, 1);
        assert_eq!(extraction.report.references_dropped, 1);
        Ok(())
    }

    #[test]
    fn test_forward_reference_resolves_in_second_pass() -> Result<()> {
        let rows = vec![
            row(&["1", "A", "Item", "Dep:Series", "2:Later item"]),
            row(&["2", "B", "Series"]),
        ];
        let extraction = build_graph(&section(&rows), &Schema::default(), &config())?;
        assert_eq!(extraction.graph.dependents_of("2").collect::<Vec<_>>(), vec!["1"]);
        Ok(())
    }

    #[test]
    fn test_label_rules() {
        let range = ColumnRange::from_letters("D", "K").unwrap();
        let r = row(&[
            "1", "", "Item", // identity
            "Rate:Number", "5", // wrong type
            "NoColon", "2", // not a label
            " Salary : Item ", " 4 ", // accepted, trimmed
            "Spouse:Item", "empty", // placeholder
        ]);
        let refs = decode_references(&r, "1", range);

        assert_eq!(
            refs,
            vec![RawReference {
                source: "1".into(),
                target: "4".into(),
                label: "Salary".into(),
            }]
        );
    }

    #[test]
    fn test_numeric_label_cell_is_ignored() {
        let range = ColumnRange::from_letters("D", "E").unwrap();
        let r = row(&["1", "", "Item", "12", "3"]);
        assert!(decode_references(&r, "1", range).is_empty());
    }

    #[test]
    fn test_series_range_only_for_series_rows() -> Result<()> {
        let rows = vec![
            row(&["1", "Base", "Item"]),
            row(&["2", "Plain", "Item", "", "", "", "", "Stage:Item", "1"]),
            row(&["3", "Staged", "Benefit Series", "", "", "", "", "Stage:Item", "1"]),
        ];
        let extraction = build_graph(&section(&rows), &Schema::default(), &config())?;
        let dependents: Vec<_> = extraction.graph.dependents_of("1").collect();
        assert_eq!(dependents, vec!["3"]);
        Ok(())
    }

    #[test]
    fn test_pair_straddling_range_end_is_skipped() -> Result<()> {
        // Primary range D..F: the label in F would need its value in G
        let config = ExplorerConfig {
            primary_range: ColumnRangeConfig::new("D", "F"),
            ..config()
        };
        let rows = vec![
            row(&["1", "A", "Item"]),
            row(&["2", "B", "Item", "", "", "X:Item", "1"]),
        ];
        let extraction = build_graph(&section(&rows), &Schema::default(), &config)?;
        assert_eq!(extraction.graph.edge_count(), 0);
        Ok(())
    }

    #[test]
    fn test_rows_without_id_are_skipped() -> Result<()> {
        let rows = vec![row(&["", "Orphan", "Item", "X:Item", "1"]), row(&["1", "A"])];
        let extraction = build_graph(&section(&rows), &Schema::default(), &config())?;
        assert_eq!(extraction.graph.item_count(), 1);
        assert_eq!(extraction.report.rows_skipped, 1);
        assert_eq!(extraction.report.references_found, 0);
        assert_eq!(extraction.graph.item("1").unwrap().item_type, "Unknown");
        Ok(())
    }

    #[test]
    fn test_display_name_fragments() -> Result<()> {
        let schema = Schema {
            id_item: resolved(3),
            id_event: resolved(4),
            display_group: resolved(5),
            item_name: None,
        };
        let config = ExplorerConfig {
            primary_range: ColumnRangeConfig::new("H", "K"),
            series_range: ColumnRangeConfig::new("L", "O"),
            ..Default::default()
        };
        let rows = vec![
            row(&["row-1", "Pension", "Item", "P1", "6:Retirement", "Benefit calc"]),
            row(&["row-2", "P2", "Item", "P2", "", ""]),
            row(&["row-3", "", "Item", "", "", ""]),
        ];
        let graph = build_graph(&section(&rows), &schema, &config)?.graph;

        let p1 = graph.item("P1").unwrap();
        assert_eq!(p1.display_name, "P1 - 6:Retirement - Benefit calc - Pension");
        assert_eq!(p1.short_name, "Pension");

        // Duplicate fragments collapse
        let p2 = graph.item("P2").unwrap();
        assert_eq!(p2.display_name, "P2");
        assert_eq!(p2.short_name, "P2");

        // Empty id_item falls back to the identity column
        let p3 = graph.item("row-3").unwrap();
        assert_eq!(p3.short_name, "row-3");
        Ok(())
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() -> Result<()> {
        let rows = vec![
            row(&["1", "First", "Item"]),
            row(&["2", "Other", "Item", "Dep:Item", "1"]),
            row(&["2", "Second", "Series"]),
        ];
        let extraction = build_graph(&section(&rows), &Schema::default(), &config())?;
        let item = extraction.graph.item("2").unwrap();

        assert_eq!(item.short_name, "Second");
        assert_eq!(extraction.report.duplicate_ids, 1);
        // References from the overwritten row survive
        assert_eq!(extraction.graph.dependencies_of("2").collect::<Vec<_>>(), vec!["1"]);
        Ok(())
    }

    #[test]
    fn test_self_reference_is_kept() -> Result<()> {
        let rows = vec![row(&["5", "Loop", "Item", "Me:Item", "5"])];
        let graph = build_graph(&section(&rows), &Schema::default(), &config())?.graph;
        assert_eq!(graph.dependents_of("5").collect::<Vec<_>>(), vec!["5"]);
        Ok(())
    }

    #[test]
    fn test_reference_target_parsing() {
        assert_eq!(reference_target("12"), Some("12"));
        assert_eq!(reference_target("12:Pension"), Some("12"));
        assert_eq!(reference_target("EMPTY"), None);
        assert_eq!(reference_target("nan"), None);
        assert_eq!(reference_target(":x"), None);
    }
}
