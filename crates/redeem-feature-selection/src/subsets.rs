//! Lazy subset enumeration over feature sets.
//!
//! Subsets are produced on demand from a sorted snapshot of the input set,
//! so peak memory stays bounded by a single candidate even when the number of
//! combinations is large. The returned iterators are `Clone`; cloning one
//! before it is consumed restarts the enumeration.

use itertools::Itertools;

use crate::feature_set::FeatureSet;

/// Enumerate subsets of `set`.
///
/// With `exact == true` only subsets of exactly `size` features are produced.
/// Otherwise every subset of `0..=size` features is produced, smallest first.
/// Within a cardinality subsets appear in lexicographic order of the canonical
/// feature order, and no subset is produced twice.
///
/// # Parameters
///
/// * `set` - The features to draw subsets from.
/// * `size` - The subset cardinality (exact) or the largest cardinality.
/// * `exact` - A boolean indicating whether only subsets of exactly `size`
///   features are produced.
///
/// # Returns
///
/// A lazy iterator over the subsets. It is empty when `exact` is set and
/// `size` exceeds `set.len()`.
pub fn powerset<T>(
    set: &FeatureSet<T>,
    size: usize,
    exact: bool,
) -> impl Iterator<Item = FeatureSet<T>> + Clone
where
    T: Ord + Clone,
{
    let items = set.to_vec();
    let smallest = if exact { size } else { 0 };
    let largest = size.min(items.len());

    (smallest..=largest).flat_map(move |k| {
        items
            .clone()
            .into_iter()
            .combinations(k)
            .map(FeatureSet::from)
    })
}

/// Every subset of `set` holding exactly `size` features.
pub fn combinations<T>(
    set: &FeatureSet<T>,
    size: usize,
) -> impl Iterator<Item = FeatureSet<T>> + Clone
where
    T: Ord + Clone,
{
    powerset(set, size, true)
}

/// Number of subsets of `n` items with exactly `k` items, saturating at
/// `usize::MAX`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    acc as usize
}
