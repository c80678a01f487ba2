//! Core module for benefit-graph
//!
//! Reading the sheet, locating the item table, detecting its columns and
//! extracting the dependency graph.

pub mod address;
pub mod extractor;
pub mod schema;
pub mod section;
pub mod sheet;
pub mod types;

pub use address::{ColumnRange, to_index, to_letters};
pub use extractor::{Extraction, ExtractionReport, build_graph};
pub use schema::{Field, MatchTier, Schema, detect_schema};
pub use section::{Section, exclude_marked_rows, locate_section};
pub use sheet::{Sheet, load_sheet, read_sheet};
pub use types::*;
