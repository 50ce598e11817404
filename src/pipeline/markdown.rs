//! Markdown bridge: HTML→Markdown→HTML round trip.
//!
//! The round trip is what normalizes the scraped markup — headings,
//! emphasis, links and preformatted blocks map to their Markdown
//! equivalents and unrecognized tags degrade to inline text, so whatever
//! inconsistencies survive the earlier stages come back out as the
//! renderer's uniform HTML. The HTML→Markdown half is deterministic and
//! in-process; the Markdown→HTML half is the injected external renderer.

use crate::error::ConversionError;
use crate::tools::MarkdownRenderer;

/// Convert HTML to Markdown text.
pub fn to_markdown(html: &str) -> String {
    html2md::parse_html(html)
}

/// Run the full bridge: paragraph HTML to renderer-normalized HTML.
///
/// A nonzero exit from the renderer is fatal for the record; the error
/// carries the tool's stderr.
pub fn bridge(
    renderer: &dyn MarkdownRenderer,
    paragraph_html: &str,
) -> Result<String, ConversionError> {
    let markdown = to_markdown(paragraph_html);
    renderer.render(&markdown)
}
