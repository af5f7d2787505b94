//! TF-IDF vectorizer over a bounded vocabulary.
//!
//! The vector space is fitted jointly over the whole corpus:
//! - vocabulary: the `max_features` terms with the highest total count,
//!   ties broken lexicographically, laid out in lexicographic order
//! - weight: raw count × `ln((1 + n) / (1 + df)) + 1`
//! - every vector is L2-normalized (an all-zero vector stays zero)

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::tokenizer::Tokenizer;
use crate::types::IndexConfig;

/// Fits [`TfIdfModel`]s from a corpus.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    max_features: usize,
    tokenizer: Tokenizer,
}

impl TfIdfVectorizer {
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            max_features: config.max_features,
            tokenizer: Tokenizer::new(config.stop_words),
        }
    }

    /// Fit a vector space to `corpus` and embed every document in it.
    ///
    /// Returns the model and one vector per document, in corpus order.
    pub fn fit<S: AsRef<str>>(&self, corpus: &[S]) -> (TfIdfModel, Vec<Vec<f32>>) {
        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|doc| self.tokenizer.tokenize(doc.as_ref()))
            .collect();

        let mut totals: HashMap<&str, u64> = HashMap::new();
        let mut doc_freq: HashMap<&str, u32> = HashMap::new();
        for tokens in &documents {
            let mut seen: HashSet<&str> = HashSet::new();
            for token in tokens {
                *totals.entry(token.as_str()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| (Reverse(a.1), a.0).cmp(&(Reverse(b.1), b.0)));
        if self.max_features > 0 {
            ranked.truncate(self.max_features);
        }

        let mut terms: Vec<String> = ranked.iter().map(|(term, _)| term.to_string()).collect();
        terms.sort();

        let n = corpus.len() as f32;
        let idf: Vec<f32> = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f32;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        let model = TfIdfModel {
            tokenizer: self.tokenizer,
            vocabulary,
            terms,
            idf,
        };

        let vectors = documents
            .iter()
            .map(|tokens| model.weigh(tokens))
            .collect();

        tracing::debug!(
            "Fitted TF-IDF space: {} documents, {} dimensions",
            corpus.len(),
            model.dimensions()
        );

        (model, vectors)
    }
}

/// A fitted vector space: fixed vocabulary and IDF weights.
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f32>,
}

impl TfIdfModel {
    /// Number of vector dimensions (vocabulary size).
    pub fn dimensions(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms in dimension order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Embed text in this vector space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        self.weigh(&self.tokenizer.tokenize(text))
    }

    fn weigh(&self, tokens: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions()];
        for token in tokens {
            if let Some(&i) = self.vocabulary.get(token) {
                vector[i] += 1.0;
            }
        }

        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}
