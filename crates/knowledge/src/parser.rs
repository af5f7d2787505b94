//! Document text extraction.
//!
//! Turns an uploaded file into a single plain-text chunk. Files that are
//! not valid UTF-8 or that look binary fail with an extraction error and
//! never reach the index.

use coach_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    Html,
    PlainText,
    Tabular,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("html") | Some("htm") => Self::Html,
            Some("txt") | Some("text") => Self::PlainText,
            Some("csv") | Some("tsv") => Self::Tabular,
            _ => Self::Unknown,
        }
    }
}

/// Read a file and extract its text.
pub fn parse_file(path: &Path) -> AppResult<String> {
    let bytes = fs::read(path)?;
    let raw = String::from_utf8(bytes)
        .map_err(|_| AppError::Extraction(format!("{} is not valid UTF-8 text", path.display())))?;

    extract_text(ContentType::from_path(path), &raw)
        .map_err(|e| AppError::Extraction(format!("{}: {}", path.display(), e)))
}

/// Extract plain text from already-decoded content.
pub fn extract_text(content_type: ContentType, raw: &str) -> Result<String, &'static str> {
    let text = match content_type {
        ContentType::Markdown => clean_markdown(raw),
        ContentType::Html => clean_html(raw),
        ContentType::Tabular => clean_tabular(raw),
        ContentType::PlainText => raw.trim().to_string(),
        ContentType::Unknown => {
            if raw.contains('\0') {
                return Err("binary content not supported");
            }
            raw.trim().to_string()
        }
    };

    Ok(text)
}

/// Strip heading markers, fences and rules from markdown.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim_start_matches('#').trim();

        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        if !trimmed.is_empty() {
            result.push_str(trimmed);
            result.push('\n');
        }
    }

    result.trim().to_string()
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Strip tags, scripts and styles from HTML and collapse whitespace.
fn clean_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    for (i, ch) in text.char_indices() {
        if ch == '<' {
            in_tag = true;
            let rest = &text[i..];

            if starts_with_ignore_case(rest, "<script") {
                in_script = true;
            } else if starts_with_ignore_case(rest, "</script") {
                in_script = false;
            } else if starts_with_ignore_case(rest, "<style") {
                in_style = true;
            } else if starts_with_ignore_case(rest, "</style") {
                in_style = false;
            }
        } else if ch == '>' {
            in_tag = false;
            // Keep words from adjacent elements apart
            result.push(' ');
        } else if !in_tag && !in_script && !in_style {
            result.push(ch);
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flatten CSV/TSV rows into space-separated cells, one row per line.
fn clean_tabular(text: &str) -> String {
    text.lines()
        .map(|row| {
            row.split([',', '\t'])
                .map(|cell| cell.trim().trim_matches('"').trim())
                .filter(|cell| !cell.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|row| !row.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_type_detection() {
        assert_eq!(
            ContentType::from_path(Path::new("file.md")),
            ContentType::Markdown
        );
        assert_eq!(
            ContentType::from_path(Path::new("page.HTM")),
            ContentType::Html
        );
        assert_eq!(
            ContentType::from_path(Path::new("file.txt")),
            ContentType::PlainText
        );
        assert_eq!(
            ContentType::from_path(Path::new("tasks.tsv")),
            ContentType::Tabular
        );
        assert_eq!(
            ContentType::from_path(Path::new("Makefile")),
            ContentType::Unknown
        );
    }

    #[test]
    fn test_clean_markdown() {
        let input = "# Header\n\nSome text\n\n```rust\ncode\n```\n\nMore text";
        let output = clean_markdown(input);
        assert!(output.contains("Header"));
        assert!(output.contains("Some text"));
        assert!(output.contains("More text"));
        assert!(!output.contains("```"));
    }

    #[test]
    fn test_clean_html() {
        let input = "<html><body><p>Hello <b>world</b></p></body></html>";
        assert_eq!(clean_html(input), "Hello world");
    }

    #[test]
    fn test_clean_html_drops_scripts_and_handles_multibyte() {
        let input = "<p>Café</p><SCRIPT>var x = 1;</SCRIPT><style>p{}</style><p>Ünïcode</p>";
        assert_eq!(clean_html(input), "Café Ünïcode");
    }

    #[test]
    fn test_clean_tabular() {
        let input = "task,due\n\"write report\",friday\n\nreview\t monday\n";
        assert_eq!(
            clean_tabular(input),
            "task due\nwrite report friday\nreview monday"
        );
    }

    #[test]
    fn test_unknown_binary_is_rejected() {
        assert!(extract_text(ContentType::Unknown, "abc\0def").is_err());
        assert_eq!(
            extract_text(ContentType::Unknown, "  plain  ").unwrap(),
            "plain"
        );
    }

    #[test]
    fn test_parse_file_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_parse_file_markdown() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "## Focus\n\nWork in 25 minute blocks.\n").unwrap();

        assert_eq!(
            parse_file(&path).unwrap(),
            "Focus\nWork in 25 minute blocks."
        );
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let err = parse_file(Path::new("/nonexistent/coach/file.txt")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
