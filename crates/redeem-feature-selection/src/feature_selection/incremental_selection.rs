//! Incremental relevance/redundancy feature selection.
//!
//! Features are tested in combinations of growing cardinality. At size `i`
//! every `i`-subset of the features not yet known to be relevant is scored;
//! the members of every subset scoring strictly above the threshold are
//! relevant for that iteration. Optionally, each `(i + 1)`-subset of the
//! relevant features is then searched for members whose removal costs less
//! than the threshold, and those are dropped as redundant.
//!
//! Scores are memoized in a [`ScoreCache`] owned by the selection call, so
//! the redundancy pass reuses scores computed by the relevance pass.

use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, ScoreCache};
use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::feature_set::FeatureSet;
use crate::scorer::Scorer;
use crate::subsets::{binomial, combinations};

/// Per-cardinality counters of a selection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationSummary {
    /// Cardinality of the subsets tested for relevance.
    pub size: usize,
    /// Number of subsets scored in the relevance pass.
    pub candidates: usize,
    pub relevant: usize,
    pub redundant: usize,
    /// Features added to the result (relevant and not redundant).
    pub accepted: usize,
}

/// Outcome of [`IncrementalSelector::select_with_report`].
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport<T: Ord> {
    pub selected: FeatureSet<T>,
    pub iterations: Vec<IterationSummary>,
    pub cache: CacheStats,
}

/// Incremental feature selector configured by a [`SelectionConfig`].
#[derive(Debug, Clone, Default)]
pub struct IncrementalSelector {
    config: SelectionConfig,
}

impl IncrementalSelector {
    /// Creates a new selector, rejecting invalid configurations.
    pub fn new(config: SelectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(IncrementalSelector { config })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Select the relevant (and, if configured, non-redundant) features of
    /// `features` under `scorer`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Scorer`] as soon as the scorer fails on any
    /// subset; no partial selection is returned.
    pub fn select<T, S>(&self, features: &FeatureSet<T>, scorer: &S) -> Result<FeatureSet<T>>
    where
        T: Ord + Clone,
        S: Scorer<T> + ?Sized,
    {
        self.select_with_report(features, scorer)
            .map(|report| report.selected)
    }

    /// Like [`select`](Self::select), also returning per-iteration counters
    /// and cache statistics.
    pub fn select_with_report<T, S>(
        &self,
        features: &FeatureSet<T>,
        scorer: &S,
    ) -> Result<SelectionReport<T>>
    where
        T: Ord + Clone,
        S: Scorer<T> + ?Sized,
    {
        let threshold = self.config.threshold;
        let mut cache = ScoreCache::new(self.config.cache_capacity_for(features.len()), scorer);

        let mut known_relevant = FeatureSet::new();
        let mut rel = FeatureSet::new();
        let mut selected = FeatureSet::new();
        let mut iterations = Vec::new();

        for size in 1..=self.config.max_size {
            let tf = features.difference(&known_relevant);
            if tf.len() < size {
                // nothing new can become relevant at this or any larger size
                log::debug!(
                    "Stopping at size {}: only {} untested feature(s) left",
                    size,
                    tf.len()
                );
                break;
            }

            rel.clear();
            log::debug!(
                "Scoring {} subset(s) of size {} drawn from {} feature(s)",
                binomial(tf.len(), size),
                size,
                tf.len()
            );

            let mut candidates = 0;
            let mut warned_nan = false;
            for fs in combinations(&tf, size) {
                candidates += 1;
                let score = score_subset(&mut cache, &fs)?;
                log::trace!("size {} candidate #{} scored {}", size, candidates, score);
                if score.is_nan() && !warned_nan {
                    log::warn!(
                        "{} returned NaN for a subset of size {}; NaN scores are never relevant",
                        scorer.name(),
                        size
                    );
                    warned_nan = true;
                }
                if score > threshold {
                    rel.union_with(&fs);
                }
            }

            let redundant = if self.config.remove_redundant {
                redundant_features(&rel, size, threshold, &mut cache)?
            } else {
                FeatureSet::new()
            };

            let accepted = rel.difference(&redundant);
            selected.union_with(&accepted);
            known_relevant.union_with(&rel);

            let summary = IterationSummary {
                size,
                candidates,
                relevant: rel.len(),
                redundant: redundant.len(),
                accepted: accepted.len(),
            };
            log::debug!(
                "Size {}: {} relevant, {} redundant, {} accepted",
                summary.size,
                summary.relevant,
                summary.redundant,
                summary.accepted
            );
            iterations.push(summary);
        }

        let stats = cache.stats();
        log::info!(
            "Selected {} of {} feature(s) with {} scorer call(s) ({:.1}% cache hits)",
            selected.len(),
            features.len(),
            stats.misses,
            stats.hit_rate() * 100.0
        );

        Ok(SelectionReport {
            selected,
            iterations,
            cache: stats,
        })
    }
}

/// Run an incremental selection with explicit parameters.
///
/// Shorthand for building an [`IncrementalSelector`] from
/// `SelectionConfig::new(threshold, max_size, remove_red)`.
///
/// # Parameters
///
/// * `features` - The pool of candidate features. An empty pool selects
///   nothing and never calls the scorer.
/// * `scorer` - The function scoring a feature subset.
/// * `threshold` - A subset is relevant when its score is strictly greater
///   than `threshold`; a feature is redundant when removing it lowers the
///   score by strictly less than `threshold`. Must be finite.
/// * `max_size` - The largest combination size tested for relevance.
/// * `remove_red` - A boolean indicating whether redundant features are
///   discarded.
///
/// # Returns
///
/// The selected features, or the first scorer failure as
/// [`SelectionError::Scorer`]. A non-finite `threshold` is reported as
/// [`SelectionError::InvalidConfiguration`].
///
/// # Examples
///
/// ```rust
/// use redeem_feature_selection::{select, FeatureSet};
///
/// let features = FeatureSet::from(["rt_delta", "mz_error", "charge"]);
/// let scorer = |fs: &FeatureSet<&'static str>| -> anyhow::Result<f64> {
///     Ok(if fs.contains(&"rt_delta") { 0.8 } else { 0.1 })
/// };
/// let selected = select(&features, &scorer, 0.5, 1, false).unwrap();
/// assert_eq!(selected, FeatureSet::from(["rt_delta"]));
/// ```
pub fn select<T, S>(
    features: &FeatureSet<T>,
    scorer: &S,
    threshold: f64,
    max_size: usize,
    remove_red: bool,
) -> Result<FeatureSet<T>>
where
    T: Ord + Clone,
    S: Scorer<T> + ?Sized,
{
    IncrementalSelector::new(SelectionConfig::new(threshold, max_size, remove_red))?
        .select(features, scorer)
}

/// Redundancy pass over the relevant features of one iteration.
///
/// For each `(size + 1)`-subset of `rel` that shares no feature with those
/// already marked, the first member whose removal lowers the score by less
/// than `threshold` is marked redundant.
fn redundant_features<T, S>(
    rel: &FeatureSet<T>,
    size: usize,
    threshold: f64,
    cache: &mut ScoreCache<'_, T, S>,
) -> Result<FeatureSet<T>>
where
    T: Ord + Clone,
    S: Scorer<T> + ?Sized,
{
    let mut red = FeatureSet::new();

    for fs in combinations(rel, size + 1) {
        if !fs.is_disjoint(&red) {
            continue;
        }
        let full = score_subset(cache, &fs)?;
        for f in fs.iter() {
            let diff = full - score_subset(cache, &fs.without(f))?;
            if diff < threshold {
                red.insert(f.clone());
                break;
            }
        }
    }

    Ok(red)
}

fn score_subset<T, S>(cache: &mut ScoreCache<'_, T, S>, fs: &FeatureSet<T>) -> Result<f64>
where
    T: Ord + Clone,
    S: Scorer<T> + ?Sized,
{
    cache
        .get_or_compute(fs)
        .map_err(|source| SelectionError::Scorer {
            size: fs.len(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// Scores subsets from a lookup table; unknown subsets score 0.
    struct TableScorer {
        table: HashMap<FeatureSet<char>, f64>,
        calls: Cell<usize>,
        seen: RefCell<Vec<FeatureSet<char>>>,
    }

    impl TableScorer {
        fn new(entries: &[(&str, f64)]) -> Self {
            let table = entries
                .iter()
                .map(|(key, score)| (key.chars().collect::<FeatureSet<char>>(), *score))
                .collect();
            TableScorer {
                table,
                calls: Cell::new(0),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Scorer<char> for TableScorer {
        fn score(&self, features: &FeatureSet<char>) -> anyhow::Result<f64> {
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().push(features.clone());
            Ok(self.table.get(features).copied().unwrap_or(0.0))
        }
    }

    fn set(s: &str) -> FeatureSet<char> {
        s.chars().collect()
    }

    #[test]
    fn test_singletons_above_threshold() {
        let scorer = TableScorer::new(&[("A", 0.6), ("B", 0.4), ("C", 0.5), ("AC", 0.65)]);
        let selected = select(&set("ABC"), &scorer, 0.5, 1, false).unwrap();

        // C sits exactly on the threshold and is excluded
        assert_eq!(selected, set("A"));
        assert_eq!(scorer.calls.get(), 3);
    }

    #[test]
    fn test_second_iteration_skips_known_relevant() {
        let scorer = TableScorer::new(&[("A", 0.6), ("B", 0.4), ("C", 0.5), ("BC", 0.7)]);
        let selected = select(&set("ABC"), &scorer, 0.5, 2, false).unwrap();

        assert_eq!(selected, set("ABC"));
        // no pair containing the already relevant A is ever scored
        assert!(scorer
            .seen
            .borrow()
            .iter()
            .all(|fs| fs.len() < 2 || !fs.contains(&'A')));
    }

    #[test]
    fn test_redundant_feature_dropped() {
        let entries = [("a", 0.5), ("b", 0.5), ("c", 0.05), ("ab", 0.55)];

        let scorer = TableScorer::new(&entries);
        let plain = select(&set("abc"), &scorer, 0.1, 1, false).unwrap();
        assert_eq!(plain, set("ab"));

        // removing a from {a, b} only costs 0.05 < 0.1
        let scorer = TableScorer::new(&entries);
        let pruned = select(&set("abc"), &scorer, 0.1, 1, true).unwrap();
        assert_eq!(pruned, set("b"));
    }

    #[test]
    fn test_redundancy_boundary_is_strict() {
        // diff is exactly the threshold: nothing is redundant
        let scorer = TableScorer::new(&[("a", 0.5), ("b", 0.5), ("ab", 0.75)]);
        let selected = select(&set("ab"), &scorer, 0.25, 1, true).unwrap();
        assert_eq!(selected, set("ab"));
    }

    #[test]
    fn test_relevant_set_reset_each_iteration() {
        let scorer = TableScorer::new(&[("a", 1.0), ("cd", 1.0), ("acd", 5.0)]);
        let report = IncrementalSelector::new(SelectionConfig::new(0.5, 2, true))
            .unwrap()
            .select_with_report(&set("abcd"), &scorer)
            .unwrap();

        assert_eq!(report.iterations[1].relevant, 2);
        // a stale {a} would have produced the triple {a, c, d} in the
        // second redundancy pass
        assert!(!scorer.seen.borrow().contains(&set("acd")));
        assert_eq!(report.selected, set("acd"));
    }

    #[test]
    fn test_empty_features_never_scores() {
        let scorer = TableScorer::new(&[]);
        let selected = select(&FeatureSet::new(), &scorer, 0.0, 3, true).unwrap();
        assert!(selected.is_empty());
        assert_eq!(scorer.calls.get(), 0);
    }

    #[test]
    fn test_zero_max_size_selects_nothing() {
        let scorer = TableScorer::new(&[("a", 1.0)]);
        let report = IncrementalSelector::new(SelectionConfig::new(0.0, 0, false))
            .unwrap()
            .select_with_report(&set("a"), &scorer)
            .unwrap();
        assert!(report.selected.is_empty());
        assert!(report.iterations.is_empty());
        assert_eq!(scorer.calls.get(), 0);
    }

    #[test]
    fn test_selector_keeps_config() {
        let config = SelectionConfig::new(0.3, 2, true).with_cache_capacity(32);
        let selector = IncrementalSelector::new(config.clone()).unwrap();
        assert_eq!(selector.config(), &config);
        assert_eq!(IncrementalSelector::default().config(), &SelectionConfig::default());
    }

    #[test]
    fn test_default_cache_may_rescore_with_redundancy_pass() {
        let entries = [
            ("a", 1.0),
            ("b", 1.0),
            ("c", 1.0),
            ("ab", 1.0),
            ("ac", 1.0),
            ("bc", 1.0),
        ];

        // default capacity is 3^1: the pairs evict singletons, so {c} is
        // scored again while checking {b, c}
        let small = TableScorer::new(&entries);
        let selected = select(&set("abc"), &small, 0.5, 1, true).unwrap();
        assert_eq!(selected, set("c"));
        assert_eq!(small.seen.borrow().iter().filter(|fs| **fs == set("c")).count(), 2);
        assert_eq!(small.calls.get(), 6);

        // a cache holding every queried subset scores each one once
        let large = TableScorer::new(&entries);
        let config = SelectionConfig::new(0.5, 1, true).with_cache_capacity(64);
        let selected_large = IncrementalSelector::new(config)
            .unwrap()
            .select(&set("abc"), &large)
            .unwrap();
        assert_eq!(selected_large, selected);
        assert_eq!(large.calls.get(), 5);
    }

    #[test]
    fn test_scorer_failure_propagates() {
        let scorer = |fs: &FeatureSet<u32>| -> anyhow::Result<f64> {
            if fs.contains(&3) {
                anyhow::bail!("feature 3 has no variance");
            }
            Ok(1.0)
        };
        let features: FeatureSet<u32> = (0..5).collect();
        let err = select(&features, &scorer, 0.5, 1, false).unwrap_err();

        match err {
            SelectionError::Scorer { size, source } => {
                assert_eq!(size, 1);
                assert!(source.to_string().contains("no variance"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let scorer = TableScorer::new(&[]);
        let err = select(&set("ab"), &scorer, f64::NAN, 1, false).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidConfiguration(_)));
        assert_eq!(scorer.calls.get(), 0);
    }

    #[test]
    fn test_nan_scores_are_not_relevant() {
        let scorer = |fs: &FeatureSet<char>| -> anyhow::Result<f64> {
            Ok(if fs.contains(&'x') { f64::NAN } else { 1.0 })
        };
        let selected = select(&set("xy"), &scorer, 0.0, 1, false).unwrap();
        assert_eq!(selected, set("y"));
    }

    #[test]
    fn test_report_counts_cache_hits() {
        let scorer = TableScorer::new(&[("a", 0.5), ("b", 0.5), ("ab", 0.55)]);
        let report = IncrementalSelector::new(SelectionConfig::new(0.1, 1, true))
            .unwrap()
            .select_with_report(&set("ab"), &scorer)
            .unwrap();

        // {a}, {b} in the relevance pass and {a, b} in the redundancy pass;
        // {b} is re-read from the cache when testing a
        assert_eq!(report.cache.misses, 3);
        assert_eq!(report.cache.hits, 1);
        assert_eq!(scorer.calls.get(), 3);
        assert_eq!(
            report.iterations,
            vec![IterationSummary {
                size: 1,
                candidates: 2,
                relevant: 2,
                redundant: 1,
                accepted: 1,
            }]
        );
    }
}
