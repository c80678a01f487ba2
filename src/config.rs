use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::address::ColumnRange;
use crate::error::{Error, Result};

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "benefit-graph.toml";

/// Output format for the generated graph or neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Mermaid,
    Markdown,
    Plain,
}

/// Inclusive column range written as spreadsheet letters (e.g. `DF`..`HV`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRangeConfig {
    pub start: String,
    pub end: String,
}

impl ColumnRangeConfig {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn resolve(&self) -> Result<ColumnRange> {
        ColumnRange::from_letters(&self.start, &self.end)
    }
}

/// Main configuration for benefit-graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Path to the CSV export
    pub input: PathBuf,
    /// Path to the output file ("-" writes to stdout)
    pub output: PathBuf,
    /// Output format (JSON, Mermaid, Markdown, Plain)
    pub output_format: OutputFormat,
    /// Number of leading front-matter rows to skip
    pub data_start_row: usize,
    /// Marker text locating the data table (case-sensitive)
    pub anchor: String,
    /// Dependency columns scanned for every item
    pub primary_range: ColumnRangeConfig,
    /// Extra dependency columns scanned only for "Series" items
    pub series_range: ColumnRangeConfig,
    /// How many leading cells of the first data row the pattern detector inspects
    pub sample_columns: usize,
    /// Words that mark a sample cell as a display group
    pub group_keywords: Vec<String>,
    /// Flag column markers; an item is flagged when the cell right of a marker is "1"
    pub flag_markers: Vec<String>,
    /// Rows whose marker column (cell right of the marker) is "1" are excluded
    pub exclude_marker: Option<String>,
    /// Restrict the graph to items connected to flagged items
    pub filter_by_flags: bool,
    /// Maximum hop count of the flag filter traversal
    pub filter_max_depth: usize,
    /// Root item for a neighborhood query; the full graph is written when unset
    pub root: Option<String>,
    /// Depth of the neighborhood query
    pub depth: usize,
}

impl ExplorerConfig {
    /// Validates the configuration: the input must exist and the two
    /// dependency ranges must be valid and disjoint.
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::FileNotFound(self.input.clone()));
        }
        let (primary, series) = self.dependency_ranges()?;
        if primary.overlaps(&series) {
            return Err(Error::Config(format!(
                "dependency ranges {primary} and {series} overlap"
            )));
        }
        if self.anchor.is_empty() {
            return Err(Error::Config("anchor text must not be empty".into()));
        }
        Ok(())
    }

    /// Resolved `(primary, series)` dependency ranges.
    pub fn dependency_ranges(&self) -> Result<(ColumnRange, ColumnRange)> {
        Ok((self.primary_range.resolve()?, self.series_range.resolve()?))
    }

    /// Loads `benefit-graph.toml` from the current directory. `Ok(None)` when
    /// the file does not exist.
    pub fn load_from_file() -> Result<Option<Self>> {
        Self::load_from_path(Path::new(CONFIG_FILE))
    }

    /// Loads a config file; a file that exists but does not parse is an error
    /// rather than a silent fallback to the defaults.
    pub fn load_from_path(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(Some(config))
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("benefits.csv"),
            output: PathBuf::from("benefit-graph.json"),
            output_format: OutputFormat::Json,
            data_start_row: 24,
            anchor: "BENEFIT ITEMS".to_string(),
            primary_range: ColumnRangeConfig::new("DF", "HV"),
            series_range: ColumnRangeConfig::new("HW", "MN"),
            sample_columns: 30,
            group_keywords: ["calculation", "input", "benefit", "service", "rate"]
                .into_iter()
                .map(String::from)
                .collect(),
            flag_markers: ["actuarial_liability", "payment_risk", "payment_insured"]
                .into_iter()
                .map(String::from)
                .collect(),
            exclude_marker: Some("is_quote".to_string()),
            filter_by_flags: true,
            filter_max_depth: 10,
            root: None,
            depth: 2,
        }
    }
}
