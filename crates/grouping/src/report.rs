use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::grouper::Groups;
use crate::similarity::common_elements;
use crate::types::{Taggable, WordSet};

/// One reported group: its shared words and member names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub words: BTreeSet<String>,
    pub members: BTreeSet<String>,
}

/// Serializable summary of a partition, `{ "clusters": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub clusters: Vec<Cluster>,
}

/// Shape of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStats {
    pub clusters: usize,

    /// Mean member count (integer division)
    pub average_size: usize,

    /// Clusters with exactly one member
    pub singletons: usize,
}

impl ClusterReport {
    /// Render every group with the words its members have in common.
    ///
    /// Groups whose common words come out empty are left out of the report;
    /// they remain part of the partition itself.
    pub fn from_groups<T: Taggable>(groups: &Groups<'_, T>) -> Self {
        let clusters = groups
            .iter()
            .filter_map(|members| {
                let words = group_words(&members);
                if words.is_empty() {
                    return None;
                }
                Some(Cluster {
                    words,
                    members: members.iter().map(|m| m.name().to_string()).collect(),
                })
            })
            .collect();

        let report = Self { clusters };
        report.log_stats("clusters");
        report
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn stats(&self) -> ClusterStats {
        if self.clusters.is_empty() {
            return ClusterStats::default();
        }

        let total: usize = self.clusters.iter().map(|c| c.members.len()).sum();
        ClusterStats {
            clusters: self.clusters.len(),
            average_size: total / self.clusters.len(),
            singletons: self.clusters.iter().filter(|c| c.members.len() == 1).count(),
        }
    }

    /// Log cluster statistics under `label`
    pub fn log_stats(&self, label: &str) {
        if self.clusters.is_empty() || !log::log_enabled!(log::Level::Info) {
            return;
        }

        let stats = self.stats();
        info!("{}: produced {} clusters", label, stats.clusters);
        info!("{}: cluster average size: {}", label, stats.average_size);
        info!("{}: singleton clusters: {}", label, stats.singletons);
    }
}

/// Words common to a group's members.
///
/// Members are ordered by ascending word-set size (input order on ties) and
/// folded with [`common_elements`], including its reset-on-empty rule.
pub fn group_words<T: Taggable>(members: &[&T]) -> BTreeSet<String> {
    let mut sets: Vec<&WordSet> = members.iter().map(|m| m.word_set()).collect();
    sets.sort_by_key(|set| set.len());

    common_elements(&sets)
        .into_iter()
        .map(|w| w.element().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::make_groups;
    use crate::types::Project;

    #[test]
    fn test_group_words_reset_rule() {
        let p1 = Project::from_elements("p1", &["a", "b"]);
        let p2 = Project::from_elements("p2", &["b", "c"]);
        let p3 = Project::from_elements("p3", &["c", "d"]);

        let words = group_words(&[&p1, &p2, &p3]);
        assert_eq!(words, BTreeSet::from(["c".to_string(), "d".to_string()]));
    }

    #[test]
    fn test_group_words_sorts_by_size() {
        let big = Project::from_elements("big", &["a", "b", "c", "d"]);
        let small = Project::from_elements("small", &["b", "c"]);

        // smallest first: {b,c} ∩ {a,b,c,d}
        let words = group_words(&[&big, &small]);
        assert_eq!(words, BTreeSet::from(["b".to_string(), "c".to_string()]));
    }

    #[test]
    fn test_empty_word_groups_are_dropped() {
        let entities = vec![
            Project::from_elements("empty", &[] as &[&str]),
            Project::from_elements("full", &["java", "boot", "spring"]),
        ];
        let groups = make_groups(3, &entities);
        assert_eq!(groups.len(), 2);

        let report = ClusterReport::from_groups(&groups);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.clusters[0].members,
            BTreeSet::from(["full".to_string()])
        );
    }

    #[test]
    fn test_stats() {
        let report = ClusterReport {
            clusters: vec![
                Cluster {
                    words: BTreeSet::from(["a".to_string()]),
                    members: BTreeSet::from(["x".to_string(), "y".to_string(), "z".to_string()]),
                },
                Cluster {
                    words: BTreeSet::from(["b".to_string()]),
                    members: BTreeSet::from(["w".to_string()]),
                },
            ],
        };

        assert_eq!(
            report.stats(),
            ClusterStats {
                clusters: 2,
                average_size: 2,
                singletons: 1
            }
        );
        assert_eq!(ClusterReport::default().stats(), ClusterStats::default());
    }

    #[test]
    fn test_json_shape() {
        let report = ClusterReport {
            clusters: vec![Cluster {
                words: BTreeSet::from(["boot".to_string()]),
                members: BTreeSet::from(["p1".to_string()]),
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["clusters"][0]["words"][0], "boot");
        assert_eq!(json["clusters"][0]["members"][0], "p1");
    }
}
