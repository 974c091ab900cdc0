//! Parser for item batch files.
//!
//! Three layouts are understood:
//! - `.json`: a single JSON array of item records
//! - `.jsonl` / `.ndjson`: one item record per line
//! - anything else: plain text, one item per non-empty line (`word` = line)

use crate::error::{ItemLoadError, Result};
use crate::types::Item;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Layout of an item batch file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    Json,
    JsonLines,
    Text,
}

impl ItemFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ItemFormat::Json,
            Some("jsonl") | Some("ndjson") => ItemFormat::JsonLines,
            _ => ItemFormat::Text,
        }
    }
}

/// Load an item batch from disk, choosing the format from the extension.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    if !path.exists() {
        return Err(ItemLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_items(&content, ItemFormat::from_path(path), &label)
}

/// Parse an in-memory batch.
///
/// `file` is only used to label errors.
pub fn parse_items(content: &str, format: ItemFormat, file: &str) -> Result<Vec<Item>> {
    match format {
        ItemFormat::Json => {
            serde_json::from_str(content).map_err(|source| ItemLoadError::InvalidBatch {
                file: file.to_string(),
                source,
            })
        }
        ItemFormat::JsonLines => parse_json_lines(content, file),
        ItemFormat::Text => Ok(parse_text_lines(content)),
    }
}

fn parse_json_lines(content: &str, file: &str) -> Result<Vec<Item>> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    // Parse in parallel; collect() keeps input order and stops at the first error
    lines
        .par_iter()
        .map(|&(line_no, line)| {
            serde_json::from_str::<Item>(line).map_err(|e| ItemLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn parse_text_lines(content: &str) -> Vec<Item> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(Item::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ItemFormat::from_path(Path::new("a.json")), ItemFormat::Json);
        assert_eq!(ItemFormat::from_path(Path::new("a.jsonl")), ItemFormat::JsonLines);
        assert_eq!(ItemFormat::from_path(Path::new("a.ndjson")), ItemFormat::JsonLines);
        assert_eq!(ItemFormat::from_path(Path::new("a.txt")), ItemFormat::Text);
        assert_eq!(ItemFormat::from_path(Path::new("README")), ItemFormat::Text);
    }

    #[test]
    fn test_parse_json_array() {
        let content = r#"[{"word": "alpha"}, {"word": "beta", "kind": "file"}]"#;
        let items = parse_items(content, ItemFormat::Json, "batch.json").unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].kind.as_deref(), Some("file"));
    }

    #[test]
    fn test_parse_json_lines_preserves_order_and_skips_blanks() {
        let content = "{\"word\": \"one\"}\n\n{\"word\": \"two\"}\n{\"word\": \"three\"}\n";
        let items = parse_items(content, ItemFormat::JsonLines, "batch.jsonl").unwrap();

        let words: Vec<_> = items.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_parse_json_lines_reports_line_number() {
        let content = "{\"word\": \"one\"}\n{not json}\n";
        let err = parse_items(content, ItemFormat::JsonLines, "batch.jsonl").unwrap_err();

        match err {
            ItemLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "batch.jsonl");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_text_lines() {
        let items = parse_items("foo\n\n  \nbar baz\n", ItemFormat::Text, "lines.txt").unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].word, "bar baz");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_items(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ItemLoadError::FileNotFound { .. }));
    }
}
