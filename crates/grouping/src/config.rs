use serde::{Deserialize, Serialize};

use crate::error::{GroupingError, Result};

/// Lower bound of the overlap band used for whole projects
pub const OVERLAP_MIN: usize = 3;

/// Upper bound of the overlap band
pub const OVERLAP_MAX: usize = 30;

/// Lower bound of the overlap band used for single source documents
pub const DOCUMENT_OVERLAP_MIN: usize = 1;

/// Jaccard similarity a candidate subset must exceed to match a reference member
pub const SIMILARITY_CUTOFF: f64 = 0.6;

/// Smallest intersection/difference the decomposition tree will consider
pub const MIN_SHARED: usize = 2;

/// Configuration for the greedy nearest-overlap grouper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Smallest threshold a caller may effectively request
    pub min_overlap: usize,

    /// Largest threshold a caller may effectively request
    pub max_overlap: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self::for_projects()
    }
}

impl GroupingConfig {
    /// Band for projects: many words per entity, so demand a real overlap
    pub const fn for_projects() -> Self {
        Self {
            min_overlap: OVERLAP_MIN,
            max_overlap: OVERLAP_MAX,
        }
    }

    /// Band for documents: identifier word sets are tiny
    pub const fn for_documents() -> Self {
        Self {
            min_overlap: DOCUMENT_OVERLAP_MIN,
            max_overlap: OVERLAP_MAX,
        }
    }

    /// Clamp a requested overlap into `[min_overlap, max_overlap]`.
    ///
    /// Negative and zero requests land on the lower bound.
    #[must_use]
    pub fn clamp(&self, overlap: i64) -> usize {
        let requested = usize::try_from(overlap.max(0)).unwrap_or(usize::MAX);
        requested.max(self.min_overlap).min(self.max_overlap)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_overlap == 0 {
            return Err(GroupingError::invalid_config("max_overlap must be > 0"));
        }

        if self.min_overlap > self.max_overlap {
            return Err(GroupingError::invalid_config(format!(
                "min_overlap ({}) cannot exceed max_overlap ({})",
                self.min_overlap, self.max_overlap
            )));
        }

        Ok(())
    }
}

/// Configuration for the candidate decomposition tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecompositionConfig {
    /// Jaccard similarity a subset must strictly exceed against a reference member
    pub similarity_cutoff: f64,

    /// Minimum subset size worth testing
    pub min_shared: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            similarity_cutoff: SIMILARITY_CUTOFF,
            min_shared: MIN_SHARED,
        }
    }
}

impl DecompositionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.similarity_cutoff) {
            return Err(GroupingError::invalid_config(format!(
                "similarity_cutoff ({}) must lie in [0, 1)",
                self.similarity_cutoff
            )));
        }

        if self.min_shared == 0 {
            return Err(GroupingError::invalid_config("min_shared must be > 0"));
        }

        Ok(())
    }
}
