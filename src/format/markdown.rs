//! Markdown output format for benefit-graph

use anyhow::Result;
use std::io::Write;

use super::mermaid::generate_diagram;
use super::{Formatter, table_cell};
use crate::analysis::graph::DependencyGraph;
use crate::analysis::neighborhood::Neighborhood;
use crate::core::extractor::ExtractionReport;
use crate::core::types::{DependencyEdge, Item};

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn write_graph(
        &mut self,
        output: &mut dyn Write,
        graph: &DependencyGraph,
        report: Option<&ExtractionReport>,
    ) -> Result<()> {
        let stats = graph.stats();
        writeln!(output, "# Benefit Item Graph")?;
        writeln!(output)?;
        writeln!(output, "| Metric | Value |")?;
        writeln!(output, "|--------|-------|")?;
        writeln!(output, "| Items | {} |", stats.items)?;
        writeln!(output, "| Dependencies | {} |", stats.edges)?;
        writeln!(output, "| Isolated items | {} |", stats.isolated)?;
        if let Some(r) = report {
            writeln!(output, "| Rows scanned | {} |", r.rows_scanned)?;
            writeln!(output, "| Rows without id | {} |", r.rows_skipped)?;
            writeln!(output, "| Duplicate ids | {} |", r.duplicate_ids)?;
            writeln!(output, "| Unresolved references | {} |", r.references_dropped)?;
        }
        writeln!(output)?;

        writeln!(output, "## Items")?;
        writeln!(output)?;
        writeln!(output, "| ID | Name | Type | Degree |")?;
        writeln!(output, "|----|------|------|--------|")?;
        for item in graph.items() {
            writeln!(
                output,
                "| {} | {} | {} | {} |",
                table_cell(&item.id),
                table_cell(&item.display_name),
                table_cell(&item.item_type),
                graph.degree(&item.id)
            )?;
        }
        writeln!(output)?;

        let edges = graph.edges();
        write_edge_table(output, &edges)?;

        let items: Vec<&Item> = graph.items().collect();
        write_diagram(output, &generate_diagram(&items, &edges, None))
    }

    fn write_neighborhood(
        &mut self,
        output: &mut dyn Write,
        neighborhood: &Neighborhood,
    ) -> Result<()> {
        writeln!(output, "# Neighborhood of {}", neighborhood.root)?;
        writeln!(output)?;
        if neighborhood.is_empty() {
            writeln!(output, "> Item `{}` was not found.", neighborhood.root)?;
            return Ok(());
        }
        writeln!(output, "> Depth limit: {}", neighborhood.depth)?;
        writeln!(output)?;

        writeln!(output, "| ID | Name | Type | Depth | Degree |")?;
        writeln!(output, "|----|------|------|-------|--------|")?;
        for node in &neighborhood.nodes {
            writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                table_cell(&node.item.id),
                table_cell(&node.item.display_name),
                table_cell(&node.item.item_type),
                node.depth,
                node.degree
            )?;
        }
        writeln!(output)?;

        write_edge_table(output, &neighborhood.edges)?;

        let items: Vec<&Item> = neighborhood.nodes.iter().map(|n| &n.item).collect();
        write_diagram(
            output,
            &generate_diagram(&items, &neighborhood.edges, Some(&neighborhood.root)),
        )
    }
}

fn write_edge_table(output: &mut dyn Write, edges: &[DependencyEdge]) -> Result<()> {
    if edges.is_empty() {
        return Ok(());
    }
    writeln!(output, "## Dependencies")?;
    writeln!(output)?;
    writeln!(output, "| From | To | Label |")?;
    writeln!(output, "|------|----|-------|")?;
    for edge in edges {
        writeln!(
            output,
            "| {} | {} | {} |",
            table_cell(&edge.from),
            table_cell(&edge.to),
            table_cell(edge.label.as_deref().unwrap_or(""))
        )?;
    }
    writeln!(output)?;
    Ok(())
}

fn write_diagram(output: &mut dyn Write, diagram: &str) -> Result<()> {
    if diagram.is_empty() {
        return Ok(());
    }
    writeln!(output, "## Diagram")?;
    writeln!(output)?;
    writeln!(output, "```mermaid")?;
    writeln!(output, "{}", diagram)?;
    writeln!(output, "```")?;
    Ok(())
}
