//! Feature selection utilities.
//!
//! `incremental_selection` grows feature combinations one cardinality at a
//! time, keeping the features of combinations that score above a threshold
//! and optionally discarding redundant ones.
pub mod incremental_selection;

pub use incremental_selection::{select, IncrementalSelector, IterationSummary, SelectionReport};
