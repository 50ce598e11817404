//! Error types for the script2epub library.
//!
//! A single [`ConversionError`] enum covers every failure mode. The batch
//! driver treats all of them as per-record failures except reading the
//! input file and creating the output directories, which are fatal for
//! the whole run. See [`crate::batch`] for how failures are collected
//! without aborting the batch.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the script2epub library.
#[derive(Debug, Error)]
pub enum ConversionError {
    // ── External-tool errors ─────────────────────────────────────────────
    /// A converter subprocess exited nonzero. The payload is its captured
    /// standard-error text, which is the only diagnostic these tools give.
    #[error("'{tool}' exited with an error:\n{stderr}")]
    ToolFailed { tool: String, stderr: String },

    /// A converter subprocess could not be started at all.
    #[error("failed to launch '{tool}': {source}\nCheck the tool is installed and on PATH.")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    // ── I/O errors ───────────────────────────────────────────────────────
    /// Could not read or write a file involved in the conversion.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A staging temp file could not be created or read back.
    #[error("temp file error: {0}")]
    TempFile(#[source] std::io::Error),

    // ── Input errors ─────────────────────────────────────────────────────
    /// A line of the JSONL source did not parse as a script record.
    #[error("invalid record on line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    // ── Config errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConversionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConversionError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failed_display_carries_stderr() {
        let e = ConversionError::ToolFailed {
            tool: "md-to-html".into(),
            stderr: "parse error at line 3".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("md-to-html"), "got: {msg}");
        assert!(msg.contains("parse error at line 3"), "got: {msg}");
    }

    #[test]
    fn invalid_record_display_names_line() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = ConversionError::InvalidRecord { line: 7, source };
        assert!(e.to_string().contains("line 7"));
    }
}
