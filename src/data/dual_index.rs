//! Bidirectional priority index with matching forward and reverse views.
//!
//! The original bookkeeping for removal priorities and candidate
//! reconnections kept a key→score map and a score→keys multimap in sync by
//! hand at every call site. [`DualPriorityIndex`] owns that pairing as one
//! abstraction with an enforced consistency invariant: after any sequence of
//! operations, the multiset of (key, score) pairs reconstructed from the
//! reverse view equals the forward view exactly.
//!
//! Both ends are addressable: the removal queue extracts minima (most
//! redundant point first), the ear queue extracts maxima (most
//! Delaunay-legal candidate first). Equal scores resolve to the smallest key,
//! so extraction order is reproducible across runs and platforms.

use crate::debug_invariants::DebugInvariants;
use crate::error::CoarsenError;
use hashbrown::HashMap;
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Total-order wrapper over a float score. NaN is rejected at insertion, so
/// stored scores are always comparable.
#[derive(Clone, Copy, Debug)]
struct OrderedScore<S>(S);

impl<S: Float> PartialEq for OrderedScore<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: Float> Eq for OrderedScore<S> {}

impl<S: Float> PartialOrd for OrderedScore<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Float> Ord for OrderedScore<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN never reaches storage; incomparable cannot happen.
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// Key↔score priority structure; multiple keys may share a score.
#[derive(Clone, Debug)]
pub struct DualPriorityIndex<K, S> {
    forward: HashMap<K, S>,
    reverse: BTreeMap<OrderedScore<S>, BTreeSet<K>>,
}

impl<K, S> Default for DualPriorityIndex<K, S> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: BTreeMap::new(),
        }
    }
}

impl<K, S> DualPriorityIndex<K, S>
where
    K: Copy + Eq + Hash + Ord,
    S: Float,
{
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keyed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the index holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Whether `key` has an entry.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    /// Current score of `key`, if present.
    #[inline]
    pub fn score(&self, key: &K) -> Option<S> {
        self.forward.get(key).copied()
    }

    /// Inserts `key` with `score`, replacing any previous score of `key`.
    ///
    /// Infinite scores are accepted (collision escalation relies on them);
    /// NaN fails with [`CoarsenError::NonFiniteScore`].
    pub fn insert(&mut self, key: K, score: S) -> Result<(), CoarsenError> {
        if score.is_nan() {
            return Err(CoarsenError::NonFiniteScore(
                score.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if let Some(old) = self.forward.insert(key, score) {
            self.detach_reverse(&key, old);
        }
        self.reverse
            .entry(OrderedScore(score))
            .or_default()
            .insert(key);
        Ok(())
    }

    /// Removes the entry of `key`, returning its score.
    pub fn remove(&mut self, key: &K) -> Option<S> {
        let score = self.forward.remove(key)?;
        self.detach_reverse(key, score);
        Some(score)
    }

    /// The entry with the smallest score; ties resolve to the smallest key.
    pub fn peek_min(&self) -> Option<(K, S)> {
        self.reverse
            .first_key_value()
            .and_then(|(score, keys)| keys.first().map(|&k| (k, score.0)))
    }

    /// Removes and returns the entry with the smallest score.
    pub fn pop_min(&mut self) -> Option<(K, S)> {
        let (key, score) = self.peek_min()?;
        self.remove(&key);
        Some((key, score))
    }

    /// The entry with the largest score; ties resolve to the smallest key.
    pub fn peek_max(&self) -> Option<(K, S)> {
        self.reverse
            .last_key_value()
            .and_then(|(score, keys)| keys.first().map(|&k| (k, score.0)))
    }

    /// Removes and returns the entry with the largest score.
    pub fn pop_max(&mut self) -> Option<(K, S)> {
        let (key, score) = self.peek_max()?;
        self.remove(&key);
        Some((key, score))
    }

    /// Iterates over all (key, score) entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (K, S)> + '_ {
        self.forward.iter().map(|(&k, &s)| (k, s))
    }

    fn detach_reverse(&mut self, key: &K, score: S) {
        let bucket = OrderedScore(score);
        let emptied = match self.reverse.get_mut(&bucket) {
            Some(keys) => {
                let present = keys.remove(key);
                debug_assert!(present, "reverse view missing a forward entry");
                keys.is_empty()
            }
            None => {
                debug_assert!(false, "reverse view missing a score bucket");
                false
            }
        };
        if emptied {
            self.reverse.remove(&bucket);
        }
    }
}

impl<K, S> DebugInvariants for DualPriorityIndex<K, S>
where
    K: Copy + Eq + Hash + Ord + Debug,
    S: Float + Debug,
{
    fn validate_invariants(&self) -> Result<(), CoarsenError> {
        let reverse_cardinality: usize = self.reverse.values().map(BTreeSet::len).sum();
        if reverse_cardinality != self.forward.len() {
            return Err(CoarsenError::PriorityIndexCorruption(format!(
                "forward view has {} entries, reverse view has {}",
                self.forward.len(),
                reverse_cardinality
            )));
        }
        for (key, &score) in &self.forward {
            let mirrored = self
                .reverse
                .get(&OrderedScore(score))
                .is_some_and(|keys| keys.contains(key));
            if !mirrored {
                return Err(CoarsenError::PriorityIndexCorruption(format!(
                    "entry ({key:?}, {score:?}) missing from the reverse view"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_extraction() {
        let mut idx = DualPriorityIndex::<u32, f64>::new();
        idx.insert(1, 0.5).unwrap();
        idx.insert(2, 0.1).unwrap();
        idx.insert(3, 0.9).unwrap();
        assert_eq!(idx.peek_min(), Some((2, 0.1)));
        assert_eq!(idx.peek_max(), Some((3, 0.9)));
        assert_eq!(idx.pop_min(), Some((2, 0.1)));
        assert_eq!(idx.pop_max(), Some((3, 0.9)));
        assert_eq!(idx.pop_min(), Some((1, 0.5)));
        assert!(idx.is_empty());
    }

    #[test]
    fn ties_resolve_to_smallest_key() {
        let mut idx = DualPriorityIndex::<u32, f64>::new();
        idx.insert(7, 1.0).unwrap();
        idx.insert(3, 1.0).unwrap();
        idx.insert(5, 1.0).unwrap();
        assert_eq!(idx.pop_min(), Some((3, 1.0)));
        assert_eq!(idx.pop_min(), Some((5, 1.0)));
        assert_eq!(idx.pop_min(), Some((7, 1.0)));
    }

    #[test]
    fn insert_replaces_previous_score() {
        let mut idx = DualPriorityIndex::<u32, f64>::new();
        idx.insert(1, 0.5).unwrap();
        idx.insert(1, 2.0).unwrap();
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.score(&1), Some(2.0));
        assert_eq!(idx.peek_max(), Some((1, 2.0)));
        idx.validate_invariants().unwrap();
    }

    #[test]
    fn nan_is_rejected_infinity_is_not() {
        let mut idx = DualPriorityIndex::<u32, f64>::new();
        assert!(matches!(
            idx.insert(1, f64::NAN),
            Err(CoarsenError::NonFiniteScore(_))
        ));
        idx.insert(2, f64::INFINITY).unwrap();
        assert_eq!(idx.peek_max(), Some((2, f64::INFINITY)));
        idx.validate_invariants().unwrap();
    }

    #[test]
    fn remove_detaches_both_views() {
        let mut idx = DualPriorityIndex::<u32, f64>::new();
        idx.insert(1, 0.5).unwrap();
        idx.insert(2, 0.5).unwrap();
        assert_eq!(idx.remove(&1), Some(0.5));
        assert_eq!(idx.remove(&1), None);
        assert_eq!(idx.peek_min(), Some((2, 0.5)));
        idx.validate_invariants().unwrap();
    }
}
