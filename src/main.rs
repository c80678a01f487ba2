use anyhow::{Context, Result};
use benefit_graph::config::{CONFIG_FILE, OutputFormat};
use benefit_graph::{ExplorerConfig, run};
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Json,
    Mermaid,
    Md,
    Plain,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Mermaid => OutputFormat::Mermaid,
            CliOutputFormat::Md => OutputFormat::Markdown,
            CliOutputFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Dependency graph explorer for benefit item exports",
    long_about = None
)]
struct Args {
    /// CSV export to read
    input: Option<PathBuf>,

    /// Output file path ("-" for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Write the neighborhood of this item id instead of the whole graph
    #[arg(long)]
    root: Option<String>,

    /// Neighborhood depth (hops from the root)
    #[arg(long)]
    depth: Option<usize>,

    /// Keep all items instead of the component around flagged items
    #[arg(long)]
    no_filter: bool,

    /// Maximum hop count of the flag filter
    #[arg(long)]
    filter_depth: Option<usize>,

    /// Number of front-matter rows to skip
    #[arg(long)]
    data_start_row: Option<usize>,

    /// Marker text of the data table
    #[arg(long)]
    anchor: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Whether an input comes from the command line or from a config file.
fn has_input_source(args: &Args, file_config: Option<&ExplorerConfig>) -> bool {
    args.input.is_some() || file_config.is_some()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // 1. Load from file or default
    let file_config = ExplorerConfig::load_from_file()
        .with_context(|| format!("Failed to load {CONFIG_FILE}"))?;
    if !has_input_source(&args, file_config.as_ref()) {
        Args::command().print_help()?;
        anyhow::bail!("no input given and no {CONFIG_FILE} found");
    }
    let mut config = file_config.unwrap_or_default();

    // 2. Override with CLI args
    if let Some(i) = args.input {
        config.input = i;
    }
    if let Some(o) = args.output {
        config.output = o;
    }
    if let Some(f) = args.format {
        config.output_format = f.into();
    }
    if let Some(r) = args.root {
        config.root = Some(r);
    }
    if let Some(d) = args.depth {
        config.depth = d;
    }
    if args.no_filter {
        config.filter_by_flags = false;
    }
    if let Some(d) = args.filter_depth {
        config.filter_max_depth = d;
    }
    if let Some(s) = args.data_start_row {
        config.data_start_row = s;
    }
    if let Some(a) = args.anchor {
        config.anchor = a;
    }

    run(config)
}
