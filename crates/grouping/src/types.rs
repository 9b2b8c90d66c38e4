use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// Ordered set of words owned by one entity
pub type WordSet = BTreeSet<Word>;

/// A normalized vocabulary unit extracted from identifiers.
///
/// Identity is the normalized `element` only. `containers` (where the word was
/// seen) and `count` are accumulators that grow as duplicates are merged.
#[derive(Debug, Clone, Serialize)]
pub struct Word {
    element: String,
    containers: BTreeSet<String>,
    count: u64,
}

impl Word {
    /// Create a word seen once, normalizing its text
    pub fn new(element: impl AsRef<str>) -> Self {
        Self {
            element: normalize(element.as_ref()),
            containers: BTreeSet::new(),
            count: 1,
        }
    }

    /// Builder: record the container (class, document) this word came from
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.containers.insert(container.into());
        self
    }

    /// Builder: set the occurrence count
    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Normalized text
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn containers(&self) -> &BTreeSet<String> {
        &self.containers
    }

    pub const fn count(&self) -> u64 {
        self.count
    }

    pub fn add_container(&mut self, container: impl Into<String>) {
        self.containers.insert(container.into());
    }

    /// Fold `occurrences` more sightings into the count
    pub fn record(&mut self, occurrences: u64) {
        self.count = self.count.saturating_add(occurrences);
    }

    /// Unify a duplicate of this word into it.
    ///
    /// Returns `false` (and changes nothing) when `other` is a different word.
    pub fn merge(&mut self, other: &Word) -> bool {
        if self.element != other.element {
            return false;
        }

        self.containers.extend(other.containers.iter().cloned());
        self.record(other.count);
        true
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering {
        self.element.cmp(&other.element)
    }
}

/// Lowercased, trimmed form used for word identity
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Anything that can be clustered by its vocabulary
pub trait Taggable {
    /// Unique name of the entity
    fn name(&self) -> &str;

    /// Words characterizing the entity (possibly empty)
    fn word_set(&self) -> &WordSet;

    /// Normalized text of every word
    fn elements(&self) -> BTreeSet<String> {
        self.word_set()
            .iter()
            .map(|w| w.element().to_string())
            .collect()
    }
}

impl<T: Taggable + ?Sized> Taggable for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn word_set(&self) -> &WordSet {
        (**self).word_set()
    }
}

/// A software project characterized by its most significant words
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    name: String,
    words: WordSet,
}

impl Project {
    pub fn new(name: impl Into<String>, words: impl IntoIterator<Item = Word>) -> Self {
        Self {
            name: name.into(),
            words: unify_words(words),
        }
    }

    /// Convenience constructor from raw word texts
    pub fn from_elements<S: AsRef<str>>(name: impl Into<String>, elements: &[S]) -> Self {
        Self::new(name, elements.iter().map(Word::new))
    }
}

impl Taggable for Project {
    fn name(&self) -> &str {
        &self.name
    }

    fn word_set(&self) -> &WordSet {
        &self.words
    }
}

/// A single source document (typically one class) and the words of its identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Short name, e.g. the class name
    name: String,

    /// Where the document lives, when known
    path: Option<String>,

    words: WordSet,
}

impl Document {
    pub fn new(name: impl Into<String>, words: impl IntoIterator<Item = Word>) -> Self {
        Self {
            name: name.into(),
            path: None,
            words: unify_words(words),
        }
    }

    /// Builder: set the document path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl Taggable for Document {
    fn name(&self) -> &str {
        &self.name
    }

    fn word_set(&self) -> &WordSet {
        &self.words
    }
}

/// Collect words into a set, merging duplicates instead of dropping them
pub fn unify_words(words: impl IntoIterator<Item = Word>) -> WordSet {
    let mut merged: BTreeMap<String, Word> = BTreeMap::new();
    for word in words {
        match merged.get_mut(word.element()) {
            Some(existing) => {
                existing.merge(&word);
            }
            None => {
                merged.insert(word.element().to_string(), word);
            }
        }
    }
    merged.into_values().collect()
}
