//! redeem-feature-selection: incremental feature subset selection.
//!
//! Given a pool of candidate features and a scoring function over feature
//! subsets, the selector keeps the features of combinations scoring above a
//! threshold, exploring combinations of growing cardinality, and can discard
//! features that are redundant with the rest of a relevant combination.
//!
//! The scorer is supplied by the caller (any type implementing [`Scorer`],
//! including plain closures). Scores are memoized per selection run in a
//! bounded LRU cache, and subsets are enumerated lazily.
pub mod cache;
pub mod config;
pub mod error;
pub mod feature_selection;
pub mod feature_set;
pub mod scorer;
pub mod subsets;

pub use cache::{CacheStats, LruCache, ScoreCache};
pub use config::SelectionConfig;
pub use error::{Result, SelectionError};
pub use feature_selection::{select, IncrementalSelector, IterationSummary, SelectionReport};
pub use feature_set::FeatureSet;
pub use scorer::Scorer;
pub use subsets::{combinations, powerset};
