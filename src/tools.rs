//! External converter tools behind narrow trait seams.
//!
//! The pipeline shells out to two collaborator tools: a Markdown→HTML
//! renderer and an e-book packager. Each gets a one-method trait so tests
//! can inject fakes (an echoing renderer, a marker-file packager) and the
//! real tools stay swappable. The subprocess implementations stage input
//! and output through [`tempfile::NamedTempFile`] handles, so the files
//! are removed on every exit path including subprocess failure.

use crate::error::ConversionError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Renders Markdown text to an HTML string.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, ConversionError>;
}

/// Packages an HTML source file into an e-book at the destination path.
///
/// `metadata_args` is a flat sequence of `--flag value` pairs appended
/// after the two positional paths.
pub trait EpubPackager: Send + Sync {
    fn package(
        &self,
        source_html: &Path,
        destination: &Path,
        metadata_args: &[String],
    ) -> Result<(), ConversionError>;
}

/// Default renderer command name.
pub const DEFAULT_RENDERER: &str = "md-to-html";

/// Default packager command name (the calibre CLI).
pub const DEFAULT_PACKAGER: &str = "ebook-convert";

// ── Subprocess-backed implementations ────────────────────────────────────

/// Markdown renderer invoking an external command as
/// `<program> --input <in.md> --output <out.html>`.
///
/// The tool must exit zero and write rendered HTML to the output path.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: PathBuf,
}

impl CommandRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

impl MarkdownRenderer for CommandRenderer {
    fn render(&self, markdown: &str) -> Result<String, ConversionError> {
        let mut in_file = tempfile::Builder::new()
            .suffix(".md")
            .tempfile()
            .map_err(ConversionError::TempFile)?;
        in_file
            .write_all(markdown.as_bytes())
            .and_then(|()| in_file.flush())
            .map_err(ConversionError::TempFile)?;

        let out_file = tempfile::Builder::new()
            .suffix(".html")
            .tempfile()
            .map_err(ConversionError::TempFile)?;

        let tool = self.program.display().to_string();
        debug!(tool = %tool, "rendering markdown");
        let output = Command::new(&self.program)
            .arg("--input")
            .arg(in_file.path())
            .arg("--output")
            .arg(out_file.path())
            .output()
            .map_err(|e| ConversionError::ToolLaunch {
                tool: tool.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ConversionError::ToolFailed {
                tool,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        std::fs::read_to_string(out_file.path())
            .map_err(|e| ConversionError::io(out_file.path(), e))
    }
}

/// E-book packager invoking an external command as
/// `<program> <source.html> <destination.epub> [metadata flags…]`.
#[derive(Debug, Clone)]
pub struct CommandPackager {
    program: PathBuf,
}

impl CommandPackager {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandPackager {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGER)
    }
}

impl EpubPackager for CommandPackager {
    fn package(
        &self,
        source_html: &Path,
        destination: &Path,
        metadata_args: &[String],
    ) -> Result<(), ConversionError> {
        let tool = self.program.display().to_string();
        debug!(tool = %tool, destination = %destination.display(), "packaging epub");
        let output = Command::new(&self.program)
            .arg(source_html)
            .arg(destination)
            .args(metadata_args)
            .output()
            .map_err(|e| ConversionError::ToolLaunch {
                tool: tool.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ConversionError::ToolFailed {
                tool,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}
