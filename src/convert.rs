//! Per-record conversion entry points.
//!
//! [`preprocess`] runs the three string stages (sanitize → paragraphs →
//! markdown bridge) and [`convert_script`] carries the result through
//! packaging. The batch driver in [`crate::batch`] calls these once per
//! record; they are equally usable for one-off conversions.

use crate::error::ConversionError;
use crate::metadata::EpubMetadata;
use crate::pipeline::{markdown, package, paragraphs, sanitize};
use crate::tools::{EpubPackager, MarkdownRenderer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Normalize raw script HTML into renderer-clean HTML.
///
/// Runs the sanitizer, the paragraph splitter, and the Markdown bridge in
/// order. The only fallible step is the external renderer; everything
/// else is best-effort string transformation that cannot fail.
pub fn preprocess(
    html: &str,
    renderer: &dyn MarkdownRenderer,
) -> Result<String, ConversionError> {
    let sanitized = sanitize::sanitize_html(html);
    debug!(bytes = sanitized.len(), "sanitized");
    let split = paragraphs::split_paragraphs(&sanitized);
    debug!(bytes = split.len(), "paragraph-wrapped");
    markdown::bridge(renderer, &split)
}

/// Convert one raw script HTML document to an EPUB at `destination`.
///
/// Returns the final artifact path, which may differ from `destination`
/// when the extension had to be corrected to `.epub`.
pub fn convert_script(
    html: &str,
    destination: &Path,
    metadata: Option<&EpubMetadata>,
    renderer: &dyn MarkdownRenderer,
    packager: &dyn EpubPackager,
) -> Result<PathBuf, ConversionError> {
    let processed = preprocess(html, renderer)?;
    package::package(&processed, destination, metadata, packager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct EchoRenderer;

    impl MarkdownRenderer for EchoRenderer {
        fn render(&self, markdown: &str) -> Result<String, ConversionError> {
            Ok(markdown.to_string())
        }
    }

    #[derive(Default)]
    struct CapturingPackager {
        shells: Mutex<Vec<String>>,
    }

    impl EpubPackager for CapturingPackager {
        fn package(
            &self,
            source_html: &Path,
            _destination: &Path,
            _metadata_args: &[String],
        ) -> Result<(), ConversionError> {
            let shell = std::fs::read_to_string(source_html)
                .map_err(|e| ConversionError::io(source_html, e))?;
            self.shells.lock().unwrap().push(shell);
            Ok(())
        }
    }

    #[test]
    fn preprocess_scrubs_scripts_end_to_end() {
        let html = "<html><body><p>Hello world.</p><script>alert(1)</script></body></html>";
        let out = preprocess(html, &EchoRenderer).expect("preprocess");
        assert!(out.contains("Hello world."));
        assert!(!out.contains("alert"));
    }

    #[test]
    fn convert_script_hands_shell_html_to_packager() {
        let packager = CapturingPackager::default();
        let out = convert_script(
            "<html><body><p>Scene.</p></body></html>",
            Path::new("movie.epub"),
            None,
            &EchoRenderer,
            &packager,
        )
        .expect("convert");
        assert_eq!(out, PathBuf::from("movie.epub"));

        let shells = packager.shells.lock().unwrap();
        assert_eq!(shells.len(), 1);
        assert!(shells[0].starts_with("<!DOCTYPE html>"));
        assert!(shells[0].contains("Scene."));
    }
}
