//! JSON output format for benefit-graph

use anyhow::Result;
use serde::Serialize;

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use super::Formatter;
use crate::analysis::graph::{DependencyGraph, GraphStats};
use crate::analysis::neighborhood::Neighborhood;
use crate::core::extractor::ExtractionReport;
use crate::core::types::{DependencyEdge, Item};

pub struct JsonFormatter {
    pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Single-line output, for piping into other tools.
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn write_value<T: Serialize>(&self, output: &mut dyn Write, value: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *output, value)?;
        } else {
            serde_json::to_writer(&mut *output, value)?;
        }
        writeln!(output)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ItemEntry<'a> {
    #[serde(flatten)]
    item: &'a Item,
    color: &'static str,
    degree: usize,
}

#[derive(Serialize)]
struct GraphDocument<'a> {
    stats: GraphStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ExtractionReport>,
    items: Vec<ItemEntry<'a>>,
    edges: Vec<DependencyEdge>,
    dependents: &'a BTreeMap<String, BTreeSet<String>>,
    dependencies: &'a BTreeMap<String, BTreeSet<String>>,
}

impl Formatter for JsonFormatter {
    fn write_graph(
        &mut self,
        output: &mut dyn Write,
        graph: &DependencyGraph,
        report: Option<&ExtractionReport>,
    ) -> Result<()> {
        let document = GraphDocument {
            stats: graph.stats(),
            report,
            items: graph
                .items()
                .map(|item| ItemEntry {
                    item,
                    color: item.category.color(),
                    degree: graph.degree(&item.id),
                })
                .collect(),
            edges: graph.edges(),
            dependents: graph.dependents(),
            dependencies: graph.dependencies(),
        };
        self.write_value(output, &document)
    }

    fn write_neighborhood(
        &mut self,
        output: &mut dyn Write,
        neighborhood: &Neighborhood,
    ) -> Result<()> {
        self.write_value(output, neighborhood)
    }
}
