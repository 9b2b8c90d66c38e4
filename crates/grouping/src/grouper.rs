use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::GroupingConfig;
use crate::similarity::overlap;
use crate::types::Taggable;

/// A set of entities, identified by their position in the input slice
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    members: BTreeSet<usize>,
}

impl Group {
    fn new(members: BTreeSet<usize>) -> Self {
        Self { members }
    }

    /// Member positions in ascending order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The partition produced by [`Grouper::make_groups`].
///
/// Borrows the entities it was built from. Groups with identical membership
/// are kept once.
#[derive(Debug, Clone)]
pub struct Groups<'a, T> {
    entities: &'a [T],
    groups: Vec<Group>,
}

impl<'a, T: Taggable> Groups<'a, T> {
    fn new(entities: &'a [T], candidates: impl IntoIterator<Item = Group>) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        for group in candidates {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        Self { entities, groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Entities the partition was computed over
    pub fn entities(&self) -> &'a [T] {
        self.entities
    }

    /// Entities belonging to `group`, in input order
    pub fn members(&self, group: &Group) -> Vec<&'a T> {
        let entities = self.entities;
        group.indices().map(|idx| &entities[idx]).collect()
    }

    /// Every group as its member entities
    pub fn iter(&self) -> impl Iterator<Item = Vec<&'a T>> + '_ {
        self.groups.iter().map(|group| self.members(group))
    }

    /// Every group as its member names
    pub fn names(&self) -> Vec<BTreeSet<String>> {
        self.iter()
            .map(|members| members.iter().map(|m| m.name().to_string()).collect())
            .collect()
    }

    /// Whether every input entity belongs to at least one group
    pub fn covers_all(&self) -> bool {
        (0..self.entities.len()).all(|idx| self.groups.iter().any(|g| g.contains(idx)))
    }
}

/// Greedy nearest-overlap grouper.
///
/// Each entity is linked to its single best-overlapping peer; links are
/// collected in buckets keyed by entity position and every bucket becomes a
/// group. The bucket choice is order-sensitive: an entity joins the bucket
/// already keyed by its best peer before it opens a bucket of its own.
#[derive(Debug, Clone, Default)]
pub struct Grouper {
    config: GroupingConfig,
}

impl Grouper {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    pub fn for_projects() -> Self {
        Self::new(GroupingConfig::for_projects())
    }

    pub fn for_documents() -> Self {
        Self::new(GroupingConfig::for_documents())
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Effective threshold for a requested overlap
    pub fn threshold(&self, overlap: i64) -> usize {
        self.config.clamp(overlap)
    }

    /// Partition `entities` into groups sharing more than `overlap` words.
    ///
    /// `overlap` is clamped into the configured band first.
    pub fn make_groups<'a, T: Taggable>(&self, overlap: i64, entities: &'a [T]) -> Groups<'a, T> {
        let threshold = self.threshold(overlap);
        warn_on_duplicate_names(entities);

        let mut index: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        let mut missed: Vec<usize> = Vec::new();

        for (a, entity) in entities.iter().enumerate() {
            let Some(best) = best_match(entities, a) else {
                debug!("{} has no peer to compare against", entity.name());
                missed.push(a);
                continue;
            };

            let common = overlap_at(entities, a, best);
            if common > threshold {
                link(&mut index, a, best);
                debug!(
                    "{} -> {} (strong, {} shared words)",
                    entity.name(),
                    entities[best].name(),
                    common
                );
            } else if common > 0 {
                index.insert(a, BTreeSet::from([best]));
                debug!(
                    "{} -> {} (weak, {} shared words)",
                    entity.name(),
                    entities[best].name(),
                    common
                );
            } else {
                debug!("{} shares no words with any peer", entity.name());
                missed.push(a);
            }
        }

        for a in missed {
            index.entry(a).or_default().insert(a);
        }

        let groups = Groups::new(
            entities,
            index.into_iter().map(|(key, mut bucket)| {
                bucket.insert(key);
                Group::new(bucket)
            }),
        );

        info!(
            "Grouped {} entities into {} groups (threshold {})",
            entities.len(),
            groups.len(),
            threshold
        );

        groups
    }

    /// Group successive prefixes of `entities`: step `k` covers the first `k`.
    pub fn make_groups_incrementally<'a, T: Taggable>(
        &self,
        overlap: i64,
        entities: &'a [T],
    ) -> Vec<Groups<'a, T>> {
        (1..=entities.len())
            .map(|step| self.make_groups(overlap, &entities[..step]))
            .collect()
    }
}

/// Partition `entities` with the project band
pub fn make_groups<T: Taggable>(overlap: i64, entities: &[T]) -> Groups<'_, T> {
    Grouper::for_projects().make_groups(overlap, entities)
}

// First peer with the strictly greatest overlap, scanning in input order.
fn best_match<T: Taggable>(entities: &[T], a: usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for b in (0..entities.len()).filter(|&b| b != a) {
        let score = overlap_at(entities, a, b);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((b, score)),
        }
    }
    best.map(|(b, _)| b)
}

fn overlap_at<T: Taggable>(entities: &[T], a: usize, b: usize) -> usize {
    overlap(&entities[a], &entities[b])
}

// Strong link: extend a's own bucket if it has one, otherwise join the bucket
// keyed by `best`, otherwise open a new bucket keyed by `a`.
fn link(index: &mut BTreeMap<usize, BTreeSet<usize>>, a: usize, best: usize) {
    if let Some(bucket) = index.get_mut(&a) {
        bucket.insert(best);
    } else if let Some(bucket) = index.get_mut(&best) {
        bucket.insert(a);
    } else {
        index.insert(a, BTreeSet::from([best]));
    }
}

fn warn_on_duplicate_names<T: Taggable>(entities: &[T]) {
    let mut seen = HashSet::new();
    for entity in entities {
        if !seen.insert(entity.name()) {
            warn!("Duplicate entity name {}; members are tracked by position", entity.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Project;

    fn project(name: &str, words: &[&str]) -> Project {
        Project::from_elements(name, words)
    }

    fn names(groups: &[&[&str]]) -> Vec<BTreeSet<String>> {
        groups
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let entities: Vec<Project> = vec![];
        let groups = make_groups(3, &entities);
        assert!(groups.is_empty());
        assert!(groups.covers_all());
    }

    #[test]
    fn test_single_entity_is_singleton() {
        let entities = vec![project("solo", &["a", "b", "c"])];
        let groups = make_groups(3, &entities);
        assert_eq!(groups.names(), names(&[&["solo"]]));
    }

    #[test]
    fn test_best_match_keeps_first_maximum() {
        let entities = vec![
            project("a", &["x", "y"]),
            project("b", &["x", "q"]),
            project("c", &["x", "r"]),
        ];
        assert_eq!(best_match(&entities, 0), Some(1));
        assert_eq!(best_match(&entities, 2), Some(0));
    }

    #[test]
    fn test_best_match_without_overlap_is_first_peer() {
        let entities = vec![project("a", &["x"]), project("b", &["y"]), project("c", &["z"])];
        assert_eq!(best_match(&entities, 0), Some(1));
        assert_eq!(best_match(&entities, 1), Some(0));
    }

    #[test]
    fn test_link_prefers_existing_bucket_of_best() {
        let mut index = BTreeMap::new();
        link(&mut index, 0, 1);
        assert_eq!(index.get(&0), Some(&BTreeSet::from([1])));

        // 2's best is 0, which already keys a bucket: 2 joins it
        link(&mut index, 2, 0);
        assert_eq!(index.get(&0), Some(&BTreeSet::from([1, 2])));
        assert!(!index.contains_key(&2));

        // 3's best is 4, nobody keyed: 3 opens its own bucket
        link(&mut index, 3, 4);
        assert_eq!(index.get(&3), Some(&BTreeSet::from([4])));

        // 3 already keyed: its own bucket grows
        link(&mut index, 3, 0);
        assert_eq!(index.get(&3), Some(&BTreeSet::from([0, 4])));
    }

    #[test]
    fn test_weak_links_do_not_chain() {
        // a-b and a-c each share one word; with the document band (threshold 1)
        // all links are weak, so b and c never meet in one group.
        let entities = vec![
            project("a", &["x", "y"]),
            project("b", &["x", "q"]),
            project("c", &["x", "r"]),
        ];
        let groups = Grouper::for_documents().make_groups(0, &entities);
        assert_eq!(groups.names(), names(&[&["a", "b"], &["a", "c"]]));
    }
}
