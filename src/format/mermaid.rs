use anyhow::Result;
use std::collections::HashMap;
use std::io::Write;

use super::Formatter;
use crate::analysis::graph::DependencyGraph;
use crate::analysis::neighborhood::Neighborhood;
use crate::core::extractor::ExtractionReport;
use crate::core::types::{DependencyEdge, Item, ItemCategory};

/// Diagrams above this size are unreadable; a comment is emitted instead.
pub const MAX_DIAGRAM_NODES: usize = 200;

pub struct MermaidFormatter;

impl Formatter for MermaidFormatter {
    fn write_graph(
        &mut self,
        output: &mut dyn Write,
        graph: &DependencyGraph,
        _report: Option<&ExtractionReport>,
    ) -> Result<()> {
        let items: Vec<&Item> = graph.items().collect();
        writeln!(output, "{}", generate_diagram(&items, &graph.edges(), None))?;
        Ok(())
    }

    fn write_neighborhood(
        &mut self,
        output: &mut dyn Write,
        neighborhood: &Neighborhood,
    ) -> Result<()> {
        let items: Vec<&Item> = neighborhood.nodes.iter().map(|n| &n.item).collect();
        writeln!(
            output,
            "{}",
            generate_diagram(&items, &neighborhood.edges, Some(&neighborhood.root))
        )?;
        Ok(())
    }
}

/// Generates a left-to-right Mermaid diagram, one class per item category.
pub fn generate_diagram(items: &[&Item], edges: &[DependencyEdge], root: Option<&str>) -> String {
    if items.len() > MAX_DIAGRAM_NODES {
        return format!(
            "%% Graph too large to display ({} nodes). Limit is {}.",
            items.len(),
            MAX_DIAGRAM_NODES
        );
    }
    if items.is_empty() {
        return String::new();
    }

    let mut lines = vec!["graph LR".to_string()];

    // Item ids are free text, so nodes get synthetic ids
    let node_ids: HashMap<&str, String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.as_str(), format!("N{i}")))
        .collect();

    for item in items {
        let id = &node_ids[item.id.as_str()];
        let name = escape(&format!("{}: {}", item.id, item.short_name));
        lines.push(format!(
            "    {id}[\"{name}\"]:::{}",
            class_name(item.category)
        ));
    }

    for edge in edges {
        let (Some(from), Some(to)) = (
            node_ids.get(edge.from.as_str()),
            node_ids.get(edge.to.as_str()),
        ) else {
            continue;
        };
        match &edge.label {
            Some(label) => lines.push(format!("    {from} -->|\"{}\"| {to}", escape(label))),
            None => lines.push(format!("    {from} --> {to}")),
        }
    }

    for category in [ItemCategory::Item, ItemCategory::Series, ItemCategory::Other] {
        lines.push(format!(
            "    classDef {} fill:{},stroke:#555,stroke-width:1px;",
            class_name(category),
            category.color()
        ));
    }
    if let Some(root) = root.and_then(|r| node_ids.get(r)) {
        lines.push(format!("    style {root} stroke:#000,stroke-width:3px"));
    }

    lines.join("\n")
}

fn class_name(category: ItemCategory) -> &'static str {
    match category {
        ItemCategory::Item => "item",
        ItemCategory::Series => "series",
        ItemCategory::Other => "other",
    }
}

/// Node and edge labels must stay on one line of the diagram source.
fn escape(text: &str) -> String {
    text.replace('"', "'").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_nodes_edges_and_classes() {
        let a = Item::new("3", "Item");
        let mut b = Item::new("7", "Series");
        b.short_name = "Salary \"base\"".to_string();
        let edges = vec![
            DependencyEdge {
                from: "3".into(),
                to: "7".into(),
                label: Some("Age".into()),
            },
            DependencyEdge {
                from: "3".into(),
                to: "missing".into(),
                label: None,
            },
        ];

        let diagram = generate_diagram(&[&a, &b], &edges, Some("7"));
        assert!(diagram.starts_with("graph LR"));
        assert!(diagram.contains("N0[\"3: 3\"]:::item"));
        assert!(diagram.contains("N1[\"7: Salary 'base'\"]:::series"));
        assert!(diagram.contains("N0 -->|\"Age\"| N1"));
        assert_eq!(diagram.matches("-->").count(), 1);
        assert!(diagram.contains("classDef other fill:#007bff"));
        assert!(diagram.contains("style N1 stroke:#000"));
    }

    #[test]
    fn test_multiline_labels_stay_on_one_line() {
        let mut item = Item::new("1", "Item");
        item.short_name = "Age\r\nin years".to_string();
        let edges = vec![DependencyEdge {
            from: "1".into(),
            to: "1".into(),
            label: Some("Entry\nage".into()),
        }];

        let diagram = generate_diagram(&[&item], &edges, None);
        assert!(diagram.contains("N0[\"1: Age  in years\"]:::item"));
        assert!(diagram.contains("N0 -->|\"Entry age\"| N0"));
        assert!(diagram.lines().all(|line| line.matches('"').count() % 2 == 0));
    }

    #[test]
    fn test_diagram_size_limit() {
        let items: Vec<Item> = (0..=MAX_DIAGRAM_NODES)
            .map(|i| Item::new(i.to_string(), "Item"))
            .collect();
        let refs: Vec<&Item> = items.iter().collect();
        let diagram = generate_diagram(&refs, &[], None);
        assert!(diagram.contains("too large"));
        assert!(generate_diagram(&[], &[], None).is_empty());
    }

    #[test]
    fn test_mermaid_formatter_graph() {
        let mut graph = DependencyGraph::new();
        graph.add_item(Item::new("1", "Item"));
        graph.add_item(Item::new("2", "Item"));
        graph.add_edge("1", "2", None);

        let mut output = Vec::new();
        MermaidFormatter
            .write_graph(&mut output, &graph, None)
            .unwrap();
        let result = String::from_utf8(output).unwrap();
        assert!(result.contains("N0 --> N1"));
    }
}
