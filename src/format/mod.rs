//! Output format modules for benefit-graph

pub mod json;
pub mod markdown;
pub mod mermaid;
pub mod plain;

use anyhow::Result;
use std::io::Write;

use crate::analysis::graph::DependencyGraph;
use crate::analysis::neighborhood::Neighborhood;
use crate::config::OutputFormat;
use crate::core::extractor::ExtractionReport;

pub trait Formatter {
    /// Writes the whole graph. `report` is present when the graph came
    /// straight from extraction.
    fn write_graph(
        &mut self,
        output: &mut dyn Write,
        graph: &DependencyGraph,
        report: Option<&ExtractionReport>,
    ) -> Result<()>;

    fn write_neighborhood(
        &mut self,
        output: &mut dyn Write,
        neighborhood: &Neighborhood,
    ) -> Result<()>;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
        OutputFormat::Mermaid => Box::new(mermaid::MermaidFormatter),
        OutputFormat::Markdown => Box::new(markdown::MarkdownFormatter),
        OutputFormat::Plain => Box::new(plain::PlainFormatter),
    }
}

/// Escapes `|` so free text stays inside a table cell.
pub(crate) fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
