//! Document retrieval for the coach.
//!
//! Provides an in-memory TF-IDF index over ingested documents with exact
//! L2 nearest-neighbour search, plus helpers to extract documents from disk.

pub mod index;
pub mod parser;
pub mod sources;
pub mod tokenizer;
pub mod types;
pub mod vector_index;
pub mod vectorizer;


// Re-export commonly used types
pub use index::DocumentIndex;
pub use sources::{collect_sources, SourceDocument};
pub use types::{IndexConfig, IndexStats, IngestStats, RetrievedChunk};
pub use vectorizer::{TfIdfModel, TfIdfVectorizer};
