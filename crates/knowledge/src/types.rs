//! Document index type definitions.

use coach_core::config::RetrievalConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a document index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Vocabulary cap; 0 keeps every term
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Exclude English stop words from the vocabulary
    #[serde(default = "default_stop_words")]
    pub stop_words: bool,
}

fn default_max_features() -> usize {
    5000
}

fn default_stop_words() -> bool {
    true
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            stop_words: default_stop_words(),
        }
    }
}

impl From<&RetrievalConfig> for IndexConfig {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            max_features: config.max_features,
            stop_words: config.stop_words,
        }
    }
}

/// A chunk returned from a query, closest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Insertion position within the corpus
    pub position: usize,

    /// Chunk text
    pub text: String,

    /// L2 distance to the query vector
    pub distance: f32,
}

/// Outcome of an ingest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Chunks appended by this call
    pub added: usize,

    /// Corpus size after the call
    pub corpus_size: usize,

    /// Dimensionality of the rebuilt vector space
    pub dimensions: usize,

    /// Generation number now being served
    pub generation: u64,
}

/// Snapshot statistics for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub dimensions: usize,
    pub generation: u64,
}
