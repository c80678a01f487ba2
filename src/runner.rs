use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::filter::{detect_flag_columns, filter_by_flags, flagged_items};
use crate::analysis::graph::DependencyGraph;
use crate::analysis::neighborhood::{Neighborhood, query_neighborhood};
use crate::config::{ExplorerConfig, OutputFormat};
use crate::core::extractor::{ExtractionReport, build_graph};
use crate::core::schema::{Schema, detect_schema};
use crate::core::section::{exclude_marked_rows, locate_section};
use crate::core::sheet::{Sheet, load_sheet};
use crate::format::json::JsonFormatter;
use crate::format::{Formatter, create_formatter};

/// Everything one pass over a sheet produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub schema: Schema,
    /// Graph after optional flag filtering
    pub graph: DependencyGraph,
    pub report: ExtractionReport,
    /// Flagged item ids, empty when no flag column was found
    pub flagged: BTreeSet<String>,
    pub neighborhood: Option<Neighborhood>,
}

/// Main entry point in CLI mode: runs the pipeline and writes the result to
/// `config.output` in the configured format.
pub fn run(config: ExplorerConfig) -> Result<()> {
    let output = run_pipeline(&config)?;
    write_output(&config, &output)?;

    let stats = output.graph.stats();
    tracing::info!(
        items = stats.items,
        edges = stats.edges,
        output = %config.output.display(),
        "Done"
    );
    Ok(())
}

/// Validates `config`, reads the input and processes it.
pub fn run_pipeline(config: &ExplorerConfig) -> crate::error::Result<PipelineOutput> {
    config.validate()?;
    let sheet = load_sheet(&config.input)?;
    process_sheet(&sheet, config)
}

/// Runs section location, schema detection, extraction, the optional flag
/// filter and the optional neighborhood query on an in-memory sheet.
pub fn process_sheet(
    sheet: &Sheet,
    config: &ExplorerConfig,
) -> crate::error::Result<PipelineOutput> {
    let mut section = locate_section(sheet, config);
    if let Some(marker) = &config.exclude_marker {
        exclude_marked_rows(&mut section, marker);
    }

    let schema = detect_schema(&section, config);
    let extraction = build_graph(&section, &schema, config)?;

    let flags = detect_flag_columns(&section, config);
    let flagged = flagged_items(&section, &schema, &flags);
    let graph = if config.filter_by_flags {
        filter_by_flags(&extraction.graph, &flagged, config.filter_max_depth)
    } else {
        extraction.graph
    };

    let neighborhood = config
        .root
        .as_deref()
        .map(|root| query_neighborhood(&graph, root, config.depth));

    Ok(PipelineOutput {
        schema,
        graph,
        report: extraction.report,
        flagged,
        neighborhood,
    })
}

fn writes_to_stdout(config: &ExplorerConfig) -> bool {
    config.output == Path::new("-")
}

/// JSON written to stdout is compact, one document per line.
fn formatter_for(config: &ExplorerConfig) -> Box<dyn Formatter> {
    match config.output_format {
        OutputFormat::Json if writes_to_stdout(config) => Box::new(JsonFormatter::compact()),
        format => create_formatter(format),
    }
}

/// Writes the neighborhood when one was queried, the whole graph otherwise.
/// An output path of `-` writes to stdout.
pub fn write_output(config: &ExplorerConfig, output: &PipelineOutput) -> Result<()> {
    let mut sink: Box<dyn Write> = if writes_to_stdout(config) {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&config.output)
            .with_context(|| format!("Failed to create output: {:?}", config.output))?;
        Box::new(BufWriter::new(file))
    };

    let mut formatter = formatter_for(config);
    match &output.neighborhood {
        Some(neighborhood) => formatter.write_neighborhood(&mut sink, neighborhood)?,
        None => formatter.write_graph(&mut sink, &output.graph, Some(&output.report))?,
    }
    sink.flush()?;
    Ok(())
}
