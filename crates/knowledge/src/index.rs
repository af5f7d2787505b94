//! In-memory document index with TF-IDF retrieval.
//!
//! The corpus, its fitted vector space and the similarity index form one
//! immutable [`Generation`]. Every ingest fits a new generation over the
//! whole corpus and swaps it in; readers keep whichever generation they
//! cloned, so a query never observes a half-built index.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use crate::types::{IndexConfig, IndexStats, IngestStats, RetrievedChunk};
use crate::vector_index::{FlatL2Index, VectorIndex};
use crate::vectorizer::{TfIdfModel, TfIdfVectorizer};

struct Generation {
    id: u64,
    corpus: Vec<Arc<str>>,
    model: Option<TfIdfModel>,
    neighbors: Option<Box<dyn VectorIndex>>,
}

impl Generation {
    fn empty() -> Self {
        Self {
            id: 0,
            corpus: Vec::new(),
            model: None,
            neighbors: None,
        }
    }

    fn dimensions(&self) -> usize {
        self.model.as_ref().map_or(0, TfIdfModel::dimensions)
    }
}

/// Retrieval-augmented context store.
///
/// Safe to share across threads. Queries never block on an ingest in
/// progress; concurrent ingests are serialized.
pub struct DocumentIndex {
    config: IndexConfig,
    vectorizer: TfIdfVectorizer,
    current: RwLock<Arc<Generation>>,
    ingest_lock: Mutex<()>,
}

impl DocumentIndex {
    /// Create an empty index with default settings.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            vectorizer: TfIdfVectorizer::new(&config),
            config,
            current: RwLock::new(Arc::new(Generation::empty())),
            ingest_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    fn snapshot(&self) -> Arc<Generation> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Append chunks to the corpus and rebuild the vector space.
    ///
    /// Chunks keep their order and are never deduplicated. An empty batch
    /// leaves the index untouched.
    pub fn ingest<I, S>(&self, chunks: I) -> IngestStats
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let incoming: Vec<Arc<str>> = chunks
            .into_iter()
            .map(|chunk| {
                let text: String = chunk.into();
                Arc::from(text)
            })
            .collect();

        let _guard = self.ingest_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.snapshot();

        if incoming.is_empty() {
            return IngestStats {
                added: 0,
                corpus_size: base.corpus.len(),
                dimensions: base.dimensions(),
                generation: base.id,
            };
        }

        let start = Instant::now();
        let added = incoming.len();
        let mut corpus = Vec::with_capacity(base.corpus.len() + added);
        corpus.extend(base.corpus.iter().cloned());
        corpus.extend(incoming);

        let (model, vectors) = self.vectorizer.fit(&corpus);
        let dimensions = model.dimensions();
        let neighbors: Box<dyn VectorIndex> = Box::new(FlatL2Index::new(dimensions, vectors));

        let next = Generation {
            id: base.id + 1,
            corpus,
            model: Some(model),
            neighbors: Some(neighbors),
        };
        let stats = IngestStats {
            added,
            corpus_size: next.corpus.len(),
            dimensions,
            generation: next.id,
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);

        tracing::info!(
            "Rebuilt document index: +{} chunks, {} total, {} dimensions in {:.1}ms (generation {})",
            stats.added,
            stats.corpus_size,
            stats.dimensions,
            start.elapsed().as_secs_f64() * 1000.0,
            stats.generation
        );

        stats
    }

    /// Return the texts of the `top_k` chunks closest to `text`.
    pub fn query(&self, text: &str, top_k: usize) -> Vec<String> {
        self.query_scored(text, top_k)
            .into_iter()
            .map(|chunk| chunk.text)
            .collect()
    }

    /// Return the `top_k` chunks closest to `text` with their distances.
    ///
    /// Results are ordered by ascending L2 distance; equal distances keep
    /// insertion order.
    pub fn query_scored(&self, text: &str, top_k: usize) -> Vec<RetrievedChunk> {
        if top_k == 0 {
            return Vec::new();
        }

        let generation = self.snapshot();
        let (Some(model), Some(neighbors)) = (&generation.model, &generation.neighbors) else {
            return Vec::new();
        };

        let query = model.transform(text);
        let hits = neighbors.search(&query, top_k);

        tracing::debug!(
            "Query matched {} of {} chunks (generation {})",
            hits.len(),
            generation.corpus.len(),
            generation.id
        );

        hits.into_iter()
            .map(|hit| RetrievedChunk {
                position: hit.position,
                text: generation.corpus[hit.position].to_string(),
                distance: hit.distance,
            })
            .collect()
    }

    /// Number of chunks in the corpus.
    pub fn len(&self) -> usize {
        self.snapshot().corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> IndexStats {
        let generation = self.snapshot();
        IndexStats {
            documents: generation.corpus.len(),
            dimensions: generation.dimensions(),
            generation: generation.id,
        }
    }
}

impl Default for DocumentIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DocumentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndex")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_index_is_empty() {
        let index = DocumentIndex::new();
        assert!(index.is_empty());
        assert_eq!(
            index.stats(),
            IndexStats {
                documents: 0,
                dimensions: 0,
                generation: 0
            }
        );
        assert!(index.query("anything", 5).is_empty());
    }

    #[test]
    fn test_ingest_reports_stats() {
        let index = DocumentIndex::new();
        let stats = index.ingest(["cats are great", "dogs are great"]);
        assert_eq!(stats.added, 2);
        assert_eq!(stats.corpus_size, 2);
        assert_eq!(stats.dimensions, 3);
        assert_eq!(stats.generation, 1);

        let stats = index.ingest(vec!["birds sing".to_string()]);
        assert_eq!(stats.corpus_size, 3);
        assert_eq!(stats.generation, 2);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_empty_ingest_keeps_generation() {
        let index = DocumentIndex::new();
        index.ingest(["planning"]);
        let stats = index.ingest(Vec::<String>::new());
        assert_eq!(stats.added, 0);
        assert_eq!(stats.corpus_size, 1);
        assert_eq!(stats.generation, 1);
    }

    #[test]
    fn test_query_scored_positions_and_distances() {
        let index = DocumentIndex::new();
        index.ingest(["cats are great", "dogs are great"]);

        let results = index.query_scored("cats", 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].position, 0);
        assert_eq!(results[0].text, "cats are great");
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_whitespace_chunks_are_accepted() {
        let index = DocumentIndex::new();
        let stats = index.ingest(["", "   ", "focus blocks"]);
        assert_eq!(stats.corpus_size, 3);
        assert_eq!(index.query("focus", 1), vec!["focus blocks"]);
    }

    #[test]
    fn test_all_stop_word_corpus_still_answers() {
        let index = DocumentIndex::new();
        let stats = index.ingest(["the and of", "to be or not"]);
        assert_eq!(stats.dimensions, 0);
        // Every vector is zero, so ties fall back to insertion order
        assert_eq!(index.query("anything", 2), vec!["the and of", "to be or not"]);
    }

    #[test]
    fn test_with_config_caps_vocabulary() {
        let index = DocumentIndex::with_config(IndexConfig {
            max_features: 2,
            stop_words: true,
        });
        let stats = index.ingest(["alpha alpha beta", "gamma delta"]);
        assert_eq!(stats.dimensions, 2);
        assert_eq!(index.config().max_features, 2);
    }
}
