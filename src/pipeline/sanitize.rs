//! Sanitizer: scrub scraped HTML into a stable, parseable form.
//!
//! Scraped script pages arrive with carriage returns, inline `<script>`
//! blocks, and piles of empty elements that would collapse the blank-line
//! paragraph boundaries the next stage depends on. This stage removes the
//! scripts with regex (non-greedy then greedy pass; a single pass can miss
//! nested or malformed blocks), parses whatever is left with a lenient
//! HTML5 parser, and re-serializes with stable formatting. Malformed input
//! never errors — the parser recovers silently.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

static RE_SCRIPT_LAZY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<script>.+?</script>").expect("static regex"));

static RE_SCRIPT_GREEDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<script>.+</script>").expect("static regex"));

/// Sanitize raw script HTML.
///
/// Output rules:
/// - tags sit on their own lines, indented one space per depth
/// - text is emitted verbatim line by line; interior blank lines survive
///   (they carry the paragraph boundaries)
/// - whitespace-only text nodes, comments and the doctype are dropped
/// - an element with no visible text anywhere beneath it is replaced by
///   the literal marker `<br>` so it cannot swallow a paragraph boundary
pub fn sanitize_html(html: &str) -> String {
    let html = html.trim().replace('\r', "");
    let html = RE_SCRIPT_LAZY.replace_all(&html, "");
    let html = RE_SCRIPT_GREEDY.replace_all(&html, "");

    let doc = Html::parse_document(&html);
    let mut out = String::with_capacity(html.len());
    for child in doc.tree.root().children() {
        write_node(child, 0, &mut out);
    }
    out
}

fn write_node(node: ego_tree::NodeRef<'_, Node>, depth: usize, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            let content: &str = text;
            if content.trim().is_empty() {
                return;
            }
            for line in content.lines() {
                if line.trim().is_empty() {
                    out.push('\n');
                } else {
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
            }
        }
        Node::Element(_) => {
            if let Some(el) = ElementRef::wrap(node) {
                write_element(el, depth, out);
            }
        }
        // Doctype, comments and processing instructions carry no script
        // text and are not wanted downstream.
        _ => {}
    }
}

fn write_element(el: ElementRef<'_>, depth: usize, out: &mut String) {
    let indent = " ".repeat(depth);

    let has_visible_text = el.text().any(|t| !t.trim().is_empty());
    if !has_visible_text {
        out.push_str(&indent);
        out.push_str("<br>\n");
        return;
    }

    let name = el.value().name();
    out.push_str(&indent);
    out.push('<');
    out.push_str(name);
    for (attr, value) in el.value().attrs() {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        // Ampersand first so the other entities are not double-escaped.
        out.push_str(
            &value
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('"', "&quot;"),
        );
        out.push('"');
    }
    out.push_str(">\n");

    for child in el.children() {
        write_node(child, depth + 1, out);
    }

    out.push_str(&indent);
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}
