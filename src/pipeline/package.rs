//! Packager: wrap rendered HTML in the output shell and emit the EPUB.

use crate::error::ConversionError;
use crate::metadata::EpubMetadata;
use crate::tools::EpubPackager;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scaffolding tokens stripped from the rendered fragment before it is
/// re-wrapped. An explicit allow-list, not generic tag surgery: the
/// external renderer wraps its output in its own document skeleton, and
/// these exact tokens are the ones that would nest illegally inside ours.
/// `/head>` (sic) also catches the renderer's occasional self-closing
/// head form.
const STRIPPED_TOKENS: &[&str] = &[
    "<pre>", "</pre>", "<html>", "</html>", "<head>", "/head>", "<body>", "</body>",
];

/// Stylesheet of the output shell: preformatted whitespace and a
/// monospace font keep the script's visual layout, zero paragraph margin
/// keeps dialogue blocks tight.
const SHELL_STYLE: &str = "\
body {
  white-space: pre-wrap;
  font-family: monospace;
}
p {
  margin: 0;
}";

/// Clean a rendered fragment and wrap it in the fixed HTML shell.
///
/// Embedded newlines become explicit `<br>` tags first — the renderer
/// collapses visual line breaks that a screenplay needs — then the
/// scaffolding tokens are stripped and the result is injected into the
/// shell body.
pub fn wrap_fragment(fragment: &str) -> String {
    let mut cleaned = fragment.replace('\n', "<br>\n");
    for token in STRIPPED_TOKENS {
        cleaned = cleaned.replace(token, "");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{SHELL_STYLE}\n</style>\n</head>\n<body>\n{cleaned}\n</body>\n</html>\n"
    )
}

/// Package rendered HTML into an EPUB at `destination`.
///
/// A destination without the `.epub` extension is renamed to use it
/// before invocation. The shell HTML is staged through a temp file whose
/// lifetime covers the subprocess call, so it is removed on every exit
/// path. Returns the final destination path.
pub fn package(
    rendered_html: &str,
    destination: &Path,
    metadata: Option<&EpubMetadata>,
    packager: &dyn EpubPackager,
) -> Result<PathBuf, ConversionError> {
    let destination = ensure_epub_extension(destination);

    let shell = wrap_fragment(rendered_html);
    let mut src_file = tempfile::Builder::new()
        .suffix(".html")
        .tempfile()
        .map_err(ConversionError::TempFile)?;
    src_file
        .write_all(shell.as_bytes())
        .and_then(|()| src_file.flush())
        .map_err(ConversionError::TempFile)?;

    let args = metadata.map(EpubMetadata::to_args).unwrap_or_default();
    debug!(destination = %destination.display(), "invoking packager");
    packager.package(src_file.path(), &destination, &args)?;

    Ok(destination)
}

fn ensure_epub_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some("epub") => path.to_path_buf(),
        _ => path.with_extension("epub"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the invocation instead of shelling out.
    #[derive(Default)]
    struct RecordingPackager {
        calls: Mutex<Vec<(PathBuf, PathBuf, Vec<String>)>>,
    }

    impl EpubPackager for RecordingPackager {
        fn package(
            &self,
            source_html: &Path,
            destination: &Path,
            metadata_args: &[String],
        ) -> Result<(), ConversionError> {
            self.calls.lock().unwrap().push((
                source_html.to_path_buf(),
                destination.to_path_buf(),
                metadata_args.to_vec(),
            ));
            Ok(())
        }
    }

    #[test]
    fn newlines_become_break_tags() {
        let shell = wrap_fragment("line one\nline two");
        assert!(shell.contains("line one<br>\nline two"));
    }

    #[test]
    fn scaffolding_tokens_are_stripped() {
        let shell = wrap_fragment("<html><head></head><body><pre>text</pre></body></html>");
        let body_start = shell.find("<body>").expect("shell body");
        let inner = &shell[body_start + "<body>".len()..shell.rfind("</body>").unwrap()];
        assert!(!inner.contains("<pre>"));
        assert!(!inner.contains("<html>"));
        assert!(!inner.contains("<head>"));
        assert!(inner.contains("text"));
    }

    #[test]
    fn unrelated_text_is_not_mangled() {
        // The allow-list must not eat tokens that merely resemble
        // scaffolding, e.g. a <pre class="x"> survives (only the bare
        // tokens are stripped).
        let shell = wrap_fragment("<pre class=\"scene\">kept</pre>");
        assert!(shell.contains("<pre class=\"scene\">kept"));
    }

    #[test]
    fn shell_preserves_script_layout_styles() {
        let shell = wrap_fragment("x");
        assert!(shell.contains("white-space: pre-wrap"));
        assert!(shell.contains("font-family: monospace"));
        assert!(shell.contains("margin: 0"));
    }

    #[test]
    fn txt_destination_is_renamed_to_epub() {
        let packager = RecordingPackager::default();
        let out = package("body", Path::new("out/movie.txt"), None, &packager).expect("package");
        assert_eq!(out, PathBuf::from("out/movie.epub"));
        let calls = packager.calls.lock().unwrap();
        assert_eq!(calls[0].1, PathBuf::from("out/movie.epub"));
    }

    #[test]
    fn epub_destination_is_left_alone() {
        let packager = RecordingPackager::default();
        let out = package("body", Path::new("out/movie.epub"), None, &packager).expect("package");
        assert_eq!(out, PathBuf::from("out/movie.epub"));
    }

    #[test]
    fn metadata_args_are_forwarded() {
        let packager = RecordingPackager::default();
        let mut meta = EpubMetadata::new("Movie");
        meta.tags = Some(vec!["noir".into()]);
        package("body", Path::new("m.epub"), Some(&meta), &packager).expect("package");
        let calls = packager.calls.lock().unwrap();
        let args = &calls[0].2;
        assert!(args.contains(&"--title".to_string()));
        assert!(args.contains(&"movie-script, noir".to_string()));
    }

    #[test]
    fn no_metadata_means_no_flags() {
        let packager = RecordingPackager::default();
        package("body", Path::new("m.epub"), None, &packager).expect("package");
        let calls = packager.calls.lock().unwrap();
        assert!(calls[0].2.is_empty());
    }
}
