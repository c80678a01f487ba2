//! Plain text output format for benefit-graph

use anyhow::Result;
use std::io::Write;

use super::Formatter;
use crate::analysis::graph::DependencyGraph;
use crate::analysis::neighborhood::Neighborhood;
use crate::core::extractor::ExtractionReport;
use crate::core::types::DependencyEdge;

pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn write_graph(
        &mut self,
        output: &mut dyn Write,
        graph: &DependencyGraph,
        report: Option<&ExtractionReport>,
    ) -> Result<()> {
        let stats = graph.stats();
        writeln!(output, "=== BENEFIT ITEM GRAPH ===")?;
        writeln!(
            output,
            "Items: {}  Dependencies: {}  Isolated: {}",
            stats.items, stats.edges, stats.isolated
        )?;
        if let Some(r) = report {
            writeln!(
                output,
                "Rows scanned: {}  Skipped: {}  Duplicates: {}  Unresolved references: {}",
                r.rows_scanned, r.rows_skipped, r.duplicate_ids, r.references_dropped
            )?;
        }
        writeln!(output)?;

        writeln!(output, "=== ITEMS ===")?;
        for item in graph.items() {
            writeln!(
                output,
                "{} [{}] {} (degree {})",
                item.id,
                item.item_type,
                item.display_name,
                graph.degree(&item.id)
            )?;
        }
        writeln!(output)?;

        write_edges(output, &graph.edges())?;
        writeln!(output, "=== END OF GRAPH ===")?;
        Ok(())
    }

    fn write_neighborhood(
        &mut self,
        output: &mut dyn Write,
        neighborhood: &Neighborhood,
    ) -> Result<()> {
        writeln!(
            output,
            "=== NEIGHBORHOOD OF {} (depth {}) ===",
            neighborhood.root, neighborhood.depth
        )?;
        if neighborhood.is_empty() {
            writeln!(output, "Item not found.")?;
        }
        for node in &neighborhood.nodes {
            writeln!(
                output,
                "{}{} [{}] {} (degree {})",
                "  ".repeat(node.depth),
                node.item.id,
                node.item.item_type,
                node.item.display_name,
                node.degree
            )?;
        }
        writeln!(output)?;

        write_edges(output, &neighborhood.edges)?;
        writeln!(output, "=== END OF NEIGHBORHOOD ===")?;
        Ok(())
    }
}

fn write_edges(output: &mut dyn Write, edges: &[DependencyEdge]) -> Result<()> {
    writeln!(output, "=== DEPENDENCIES ===")?;
    for edge in edges {
        match &edge.label {
            Some(label) => writeln!(output, "{} -> {} ({})", edge.from, edge.to, label)?,
            None => writeln!(output, "{} -> {}", edge.from, edge.to)?,
        }
    }
    writeln!(output)?;
    Ok(())
}
