//! Collect documents from files and directories.

use crate::parser::{self, ContentType};
use coach_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A document extracted from disk, ready to ingest as one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub content_type: ContentType,
    pub text: String,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Walk `paths` and extract every readable document.
///
/// Directories are walked recursively in file-name order, skipping hidden
/// entries. A path that does not exist is an error; files that fail
/// extraction or yield no text are skipped with a warning.
pub fn collect_sources(paths: &[PathBuf]) -> AppResult<Vec<SourceDocument>> {
    let mut documents = Vec::new();

    for root in paths {
        if !root.exists() {
            return Err(AppError::Knowledge(format!(
                "Source path does not exist: {}",
                root.display()
            )));
        }

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if entry.file_type().is_file() {
                if let Some(document) = load_document(entry.path()) {
                    documents.push(document);
                }
            }
        }
    }

    tracing::debug!(
        "Collected {} documents from {} paths",
        documents.len(),
        paths.len()
    );

    Ok(documents)
}

fn load_document(path: &Path) -> Option<SourceDocument> {
    match parser::parse_file(path) {
        Ok(text) if text.trim().is_empty() => {
            tracing::warn!("Skipping {:?}: no text extracted", path);
            None
        }
        Ok(text) => Some(SourceDocument {
            path: path.to_path_buf(),
            content_type: ContentType::from_path(path),
            text,
        }),
        Err(e) => {
            tracing::warn!("Skipping {:?}: {}", path, e);
            None
        }
    }
}
