//! Pairwise scoring and set helpers shared by the grouper, the decomposition
//! tree and the cluster report.

use std::collections::BTreeSet;

use crate::types::{Taggable, Word};

/// Number of words two entities share. Symmetric.
pub fn overlap<A: Taggable + ?Sized, B: Taggable + ?Sized>(a: &A, b: &B) -> usize {
    a.word_set().intersection(b.word_set()).count()
}

/// The words two entities share
pub fn shared_words<A: Taggable + ?Sized, B: Taggable + ?Sized>(a: &A, b: &B) -> BTreeSet<Word> {
    a.word_set().intersection(b.word_set()).cloned().collect()
}

/// Jaccard similarity of two entities' word sets
pub fn similarity<A: Taggable + ?Sized, B: Taggable + ?Sized>(a: &A, b: &B) -> f64 {
    jaccard(a.word_set(), b.word_set())
}

/// `|a ∩ b| / |a ∪ b|`, or 0.0 when both sets are empty
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Running intersection over sets already sorted by ascending size.
///
/// Starts from the first set and intersects with each following one. Whenever the
/// running intersection empties, it restarts from the full contents of the set
/// that emptied it, so the result is non-empty as soon as any later set is.
pub fn common_elements<T: Ord + Clone>(sorted: &[&BTreeSet<T>]) -> BTreeSet<T> {
    let mut sets = sorted.iter();
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };

    let mut common: BTreeSet<T> = (*first).clone();
    for set in sets {
        common.retain(|element| set.contains(element));
        if common.is_empty() {
            common = (*set).clone();
        }
    }
    common
}

/// For each set, the elements found in no other set.
///
/// Sets with equal content do not subtract from each other.
pub fn unique_elements<T: Ord + Clone>(sets: &[BTreeSet<T>]) -> Vec<BTreeSet<T>> {
    sets.iter()
        .map(|set| {
            let mut unique = set.clone();
            for other in sets.iter().filter(|other| *other != set) {
                unique.retain(|element| !other.contains(element));
            }
            unique
        })
        .collect()
}
