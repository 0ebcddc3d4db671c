//! Ordered feature sets.
//!
//! `FeatureSet` keeps its elements in a `BTreeSet` so iteration order is
//! canonical. Two sets holding the same features always compare, hash and
//! iterate identically, which lets them key the score cache directly.

use std::collections::btree_set::{self, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet<T: Ord> {
    features: BTreeSet<T>,
}

impl<T: Ord> FeatureSet<T> {
    pub fn new() -> Self {
        Self {
            features: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, feature: &T) -> bool {
        self.features.contains(feature)
    }

    /// Insert a feature, returning `false` if it was already present.
    pub fn insert(&mut self, feature: T) -> bool {
        self.features.insert(feature)
    }

    pub fn remove(&mut self, feature: &T) -> bool {
        self.features.remove(feature)
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    /// Iterate in canonical (ascending) order.
    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.features.iter()
    }

    pub fn is_disjoint(&self, other: &FeatureSet<T>) -> bool {
        self.features.is_disjoint(&other.features)
    }

    pub fn is_subset(&self, other: &FeatureSet<T>) -> bool {
        self.features.is_subset(&other.features)
    }

    pub fn as_btree_set(&self) -> &BTreeSet<T> {
        &self.features
    }

    pub fn into_btree_set(self) -> BTreeSet<T> {
        self.features
    }
}

impl<T: Ord + Clone> FeatureSet<T> {
    pub fn union(&self, other: &FeatureSet<T>) -> FeatureSet<T> {
        self.features.union(&other.features).cloned().collect()
    }

    /// Features of `self` that are not in `other`.
    pub fn difference(&self, other: &FeatureSet<T>) -> FeatureSet<T> {
        self.features.difference(&other.features).cloned().collect()
    }

    pub fn intersection(&self, other: &FeatureSet<T>) -> FeatureSet<T> {
        self.features.intersection(&other.features).cloned().collect()
    }

    /// Copy of `self` with `feature` removed.
    pub fn without(&self, feature: &T) -> FeatureSet<T> {
        let mut reduced = self.clone();
        reduced.remove(feature);
        reduced
    }

    /// Add every feature of `other` to `self`.
    pub fn union_with(&mut self, other: &FeatureSet<T>) {
        self.features.extend(other.features.iter().cloned());
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.features.iter().cloned().collect()
    }
}

impl<T: Ord> Default for FeatureSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for FeatureSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> Extend<T> for FeatureSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.features.extend(iter);
    }
}

impl<T: Ord> From<BTreeSet<T>> for FeatureSet<T> {
    fn from(features: BTreeSet<T>) -> Self {
        Self { features }
    }
}

impl<T: Ord> From<Vec<T>> for FeatureSet<T> {
    fn from(features: Vec<T>) -> Self {
        features.into_iter().collect()
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for FeatureSet<T> {
    fn from(features: [T; N]) -> Self {
        features.into_iter().collect()
    }
}

impl<T: Ord> IntoIterator for FeatureSet<T> {
    type Item = T;
    type IntoIter = btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

impl<'a, T: Ord> IntoIterator for &'a FeatureSet<T> {
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
