use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::{normalize, Taggable, Word, WordSet};

/// Default minimum count for a word to land on a stop list
pub const DEFAULT_STOP_COUNT: u64 = 10;

/// Words of many entities unified by normalized text
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: BTreeMap<String, Word>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_taggables<T: Taggable>(entities: &[T]) -> Self {
        let mut vocabulary = Self::new();
        for entity in entities {
            for word in entity.word_set() {
                vocabulary.add(word);
            }
        }
        info!("Total words collected is {}", vocabulary.len());
        vocabulary
    }

    /// Add a word, merging containers and counts into an existing duplicate
    pub fn add(&mut self, word: &Word) {
        match self.words.get_mut(word.element()) {
            Some(existing) => {
                existing.merge(word);
            }
            None => {
                self.words.insert(word.element().to_string(), word.clone());
            }
        }
    }

    pub fn get(&self, element: &str) -> Option<&Word> {
        self.words.get(&normalize(element))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.values()
    }

    /// Words seen at least `min_count` times, most frequent first
    pub fn frequent(&self, min_count: u64) -> Vec<&Word> {
        let mut words: Vec<&Word> = self
            .words
            .values()
            .filter(|w| w.count() >= min_count)
            .collect();
        words.sort_by(|a, b| b.count().cmp(&a.count()).then_with(|| a.element().cmp(b.element())));
        words
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StopList {
    stops: Vec<String>,
}

/// Words to remove from entities before grouping.
///
/// Persisted as `{ "stops": [...] }`, keeping the order it was built in.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    ordered: Vec<String>,
    lookup: HashSet<String>,
}

impl StopWords {
    pub fn new<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        let mut stops = Self::default();
        for word in words {
            let element = normalize(word.as_ref());
            if stops.lookup.insert(element.clone()) {
                stops.ordered.push(element);
            }
        }
        stops
    }

    /// Frequent words of a vocabulary, most frequent first
    pub fn from_frequent(vocabulary: &Vocabulary, min_count: u64) -> Self {
        let frequent = vocabulary.frequent(min_count);
        info!(
            "Top {} words selected from {} words",
            frequent.len(),
            vocabulary.len()
        );
        Self::new(frequent.into_iter().map(Word::element))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let list: StopList = serde_json::from_str(raw)?;
        Ok(Self::new(list.stops))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let list = StopList {
            stops: self.ordered.clone(),
        };
        Ok(serde_json::to_string_pretty(&list)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json_pretty()?)?;
        info!("{} was created.", path.display());
        Ok(())
    }

    pub fn contains(&self, element: &str) -> bool {
        self.lookup.contains(&normalize(element))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Copy of `words` without the listed stop words
    pub fn filter(&self, words: &WordSet) -> WordSet {
        words
            .iter()
            .filter(|w| !self.lookup.contains(w.element()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Project;

    #[test]
    fn test_vocabulary_merges_duplicates() {
        let entities = vec![
            Project::new(
                "boofcv",
                vec![
                    Word::new("kernel").with_container("boofcv.Kernel1D").with_count(7),
                    Word::new("image").with_count(2),
                ],
            ),
            Project::new(
                "catalano",
                vec![Word::new("Kernel").with_container("Catalano.Kernel").with_count(5)],
            ),
        ];

        let vocabulary = Vocabulary::from_taggables(&entities);
        assert_eq!(vocabulary.len(), 2);

        let kernel = vocabulary.get("KERNEL").expect("kernel present");
        assert_eq!(kernel.count(), 12);
        assert_eq!(kernel.containers().len(), 2);
    }

    #[test]
    fn test_frequent_orders_by_count() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.add(&Word::new("b").with_count(10));
        vocabulary.add(&Word::new("a").with_count(10));
        vocabulary.add(&Word::new("c").with_count(30));
        vocabulary.add(&Word::new("d").with_count(9));

        let frequent: Vec<&str> = vocabulary.frequent(10).into_iter().map(Word::element).collect();
        assert_eq!(frequent, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_stop_words_filter() {
        let stops = StopWords::new(["Image", "noise", "image"]);
        assert_eq!(stops.len(), 2);
        assert!(stops.contains("IMAGE"));

        let project = Project::from_elements("p", &["image", "pixel", "noise"]);
        let filtered = stops.filter(project.word_set());
        let left: Vec<&str> = filtered.iter().map(Word::element).collect();
        assert_eq!(left, vec!["pixel"]);
    }

    #[test]
    fn test_stop_words_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stops.json");

        let stops = StopWords::new(["zeta", "alpha"]);
        stops.save(&path).unwrap();

        let loaded = StopWords::load(&path).unwrap();
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_stop_words_rejects_malformed_json() {
        assert!(StopWords::from_json("{\"stop\": 3}").is_err());
    }
}
