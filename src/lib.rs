pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod runner;

// Re-export key items for convenience
pub use analysis::{DependencyGraph, Neighborhood, filter_by_flags, query_neighborhood};
pub use config::{ExplorerConfig, OutputFormat};
pub use crate::core::{Item, ItemCategory, build_graph, detect_schema, load_sheet, locate_section};
pub use error::{Error, Result};
pub use runner::{PipelineOutput, process_sheet, run, run_pipeline};
