//! The input data model: one movie-script record per JSONL line.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One movie-script entry from the newline-delimited JSON source.
///
/// `title` and `script` are mandatory; the remaining fields feed e-book
/// metadata when present. Records are immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
    /// Display title; also the basis for every output filename.
    pub title: String,

    /// The raw script HTML, exactly as scraped.
    pub script: String,

    /// Writer credits, mapped to EPUB authors.
    #[serde(default)]
    pub writers: Option<Vec<String>>,

    /// Free-form date string, mapped to the EPUB publish date.
    #[serde(default)]
    pub script_date: Option<String>,

    /// Genre labels, mapped to EPUB tags.
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

impl ScriptRecord {
    /// Title with every whitespace run collapsed to a single space.
    ///
    /// Scraped titles carry stray newlines and doubled spaces; output
    /// filenames and cover lookups both key off this normalized form.
    pub fn normalized_title(&self) -> String {
        self.title.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Read every record from a newline-delimited JSON file.
///
/// Blank lines are skipped. A line that is not valid JSON (or is missing
/// a mandatory field) fails the whole read with the 1-based line number —
/// a corrupt source file is a fatal input error, not a per-record one.
///
/// Records are returned sorted by title so batch output order is stable
/// across runs.
pub fn read_records(path: &Path) -> Result<Vec<ScriptRecord>, ConversionError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConversionError::io(path, e))?;

    let mut records: Vec<ScriptRecord> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|e| ConversionError::InvalidRecord {
            line: idx + 1,
            source: e,
        })?;
        records.push(record);
    }

    records.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(records)
}
