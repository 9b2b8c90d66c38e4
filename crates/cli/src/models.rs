use anyhow::{Context as AnyhowContext, Result};
use partition_grouping::{
    unify_words, Candidate, ClusterReport, Document, Project, StopWords, Taggable, Word,
    WordSet,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Entities and their ready-made word sets, as produced by the extraction stage
#[derive(Debug, Deserialize)]
pub struct EntityManifest {
    pub entities: Vec<EntityRecord>,
}

#[derive(Debug, Deserialize)]
pub struct EntityRecord {
    pub name: String,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub words: Vec<WordRecord>,
}

/// A word given either as bare text or with its provenance
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WordRecord {
    Text(String),
    Detailed {
        element: String,
        #[serde(default)]
        containers: Vec<String>,
        #[serde(default = "default_count")]
        count: u64,
    },
}

const fn default_count() -> u64 {
    1
}

impl WordRecord {
    fn to_word(&self) -> Word {
        match self {
            Self::Text(text) => Word::new(text),
            Self::Detailed {
                element,
                containers,
                count,
            } => containers
                .iter()
                .fold(Word::new(element), |word, c| word.with_container(c.as_str()))
                .with_count(*count),
        }
    }
}

impl EntityRecord {
    fn words(&self, stops: Option<&StopWords>) -> WordSet {
        let words = unify_words(self.words.iter().map(WordRecord::to_word));
        match stops {
            Some(stops) => stops.filter(&words),
            None => words,
        }
    }
}

impl EntityManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid entity manifest {}", path.display()))?;
        log::info!(
            "Loaded {} entities from {}",
            manifest.entities.len(),
            path.display()
        );
        Ok(manifest)
    }

    pub fn projects(&self, stops: Option<&StopWords>) -> Vec<Project> {
        self.entities
            .iter()
            .map(|e| Project::new(&e.name, e.words(stops)))
            .collect()
    }

    pub fn documents(&self, stops: Option<&StopWords>) -> Vec<Document> {
        self.entities
            .iter()
            .map(|e| {
                let doc = Document::new(&e.name, e.words(stops));
                match &e.path {
                    Some(path) => doc.with_path(path),
                    None => doc,
                }
            })
            .collect()
    }
}

/// One labelled step of an incremental run
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub label: String,

    #[serde(flatten)]
    pub report: ClusterReport,
}

#[derive(Debug, Serialize)]
pub struct CandidateOutput {
    pub label: String,
    pub words: BTreeSet<String>,
}

impl From<Candidate<String>> for CandidateOutput {
    fn from(candidate: Candidate<String>) -> Self {
        Self {
            label: candidate.label,
            words: candidate.data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DecompositionOutput {
    pub tree: String,
    pub candidates: Vec<CandidateOutput>,

    /// Words only one entity has
    pub unique: BTreeMap<String, BTreeSet<String>>,
}

impl DecompositionOutput {
    pub fn unique_words<T: Taggable>(entities: &[T]) -> BTreeMap<String, BTreeSet<String>> {
        let sets: Vec<BTreeSet<String>> = entities.iter().map(|e| e.elements()).collect();
        entities
            .iter()
            .map(|e| e.name().to_string())
            .zip(partition_grouping::unique_elements(&sets))
            .collect()
    }
}
