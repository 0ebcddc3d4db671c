use crate::feature_set::FeatureSet;

/// A scoring function over feature subsets.
///
/// Implementations must be deterministic and free of side effects: the
/// selector memoizes scores and assumes repeated calls on the same subset
/// return the same value. Scores need not be monotone in the subset.
///
/// The selector may call `score` with any subset of cardinality
/// `0..=max_size + 1`; the redundancy pass scores one size past the relevance
/// pass of the same iteration.
///
/// Each distinct subset is scored at most once per selection run only while
/// the score cache can hold every subset the run queries. The default
/// capacity (`n_features ^ max_size`) is too small for that once the
/// redundancy pass is enabled; evicted subsets are scored again. Set
/// `SelectionConfig::cache_capacity` when scoring is expensive.
pub trait Scorer<T: Ord> {
    fn score(&self, features: &FeatureSet<T>) -> anyhow::Result<f64>;

    /// Optional human readable name for the scorer
    fn name(&self) -> &str {
        "scorer"
    }
}

impl<T, F> Scorer<T> for F
where
    T: Ord,
    F: Fn(&FeatureSet<T>) -> anyhow::Result<f64>,
{
    fn score(&self, features: &FeatureSet<T>) -> anyhow::Result<f64> {
        self(features)
    }
}
