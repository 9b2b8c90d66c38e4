//! # Partition Grouping
//!
//! Clusters projects or source documents by the vocabulary they share.
//!
//! ## Architecture
//!
//! ```text
//! Taggable[] (name + word set)
//!     │
//!     ├──> Grouper (greedy nearest overlap)
//!     │      ├─ Clamp requested overlap into the configured band
//!     │      ├─ Link every entity to its best-overlapping peer
//!     │      └─ Seed singletons for entities sharing nothing
//!     │
//!     ├──> DecompositionTree (optional, exploratory)
//!     │      ├─ Intersect/subtract word sets breadth-first
//!     │      └─ Keep subsets resembling reference members
//!     │
//!     └──> ClusterReport
//!            └─ { words, members } per group
//! ```
//!
//! ## Example
//!
//! ```rust
//! use partition_grouping::{ClusterReport, Grouper, Project};
//!
//! let projects = vec![
//!     Project::from_elements("p1", &["java", "spring", "boot"]),
//!     Project::from_elements("p2", &["java", "boot", "cloud"]),
//!     Project::from_elements("p3", &["python", "django"]),
//! ];
//!
//! let groups = Grouper::for_projects().make_groups(1, &projects);
//! assert_eq!(groups.len(), 2);
//!
//! let report = ClusterReport::from_groups(&groups);
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```

mod config;
mod decomposition;
mod error;
mod grouper;
mod report;
mod similarity;
mod types;
mod vocabulary;

pub use config::{
    DecompositionConfig, GroupingConfig, DOCUMENT_OVERLAP_MIN, MIN_SHARED, OVERLAP_MAX,
    OVERLAP_MIN, SIMILARITY_CUTOFF,
};
pub use decomposition::{decompose, Candidate, DecompositionTree, Item};
pub use error::{GroupingError, Result};
pub use grouper::{make_groups, Group, Grouper, Groups};
pub use report::{group_words, Cluster, ClusterReport, ClusterStats};
pub use similarity::{
    common_elements, jaccard, overlap, shared_words, similarity, unique_elements,
};
pub use types::{normalize, unify_words, Document, Project, Taggable, Word, WordSet};
pub use vocabulary::{StopWords, Vocabulary, DEFAULT_STOP_COUNT};
