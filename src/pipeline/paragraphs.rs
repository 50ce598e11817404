//! Paragraph splitter: segment sanitized HTML on blank-line boundaries.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("static regex"));

/// Split sanitized HTML into paragraph blocks.
///
/// Blocks are delimited by runs of two-or-more newlines. Whitespace-only
/// blocks are dropped. A block whose stripped content is exactly `<pre>`
/// or `</pre>` is kept verbatim so preformatted regions are never
/// paragraph-wrapped. Everything else becomes `<p>{block}<p>`.
///
/// The duplicated opening tag is not a typo: it matches the observed
/// behavior of the system this replaces, and the markdown conversion in
/// the next stage tolerates and normalizes it. Close the tag only once a
/// compatibility test proves the well-formed variant produces identical
/// EPUB output.
pub fn split_paragraphs(html: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    for block in RE_BLANK_RUN.split(html.trim()) {
        let stripped = block.trim();
        if stripped.is_empty() {
            continue;
        }
        if stripped == "<pre>" || stripped == "</pre>" {
            blocks.push(block.to_string());
        } else {
            blocks.push(format!("<p>{block}<p>"));
        }
    }
    blocks.join("\n\n")
}
