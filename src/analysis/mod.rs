//! Graph model and the queries run on it
//!
//! The [`DependencyGraph`] is built once by the extractor; filtering and
//! neighborhood queries read it and produce new values.

pub mod filter;
pub mod graph;
pub mod neighborhood;

pub use filter::{FlagColumn, detect_flag_columns, filter_by_flags, flagged_items};
pub use graph::{DependencyGraph, GraphStats};
pub use neighborhood::{Neighborhood, NeighborhoodNode, query_neighborhood};
