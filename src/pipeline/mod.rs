//! Pipeline stages for HTML-script-to-EPUB conversion.
//!
//! Each submodule implements exactly one text transformation. Keeping
//! stages separate makes each independently testable and keeps the two
//! external tools (markdown renderer, e-book packager) swappable without
//! touching the pure-string stages.
//!
//! ## Data Flow
//!
//! ```text
//! raw HTML ──▶ sanitize ──▶ paragraphs ──▶ markdown ──▶ package
//! (scraped)    (scrub +     (blank-line    (HTML→MD→    (shell wrap +
//!               pretty)      wrapping)      HTML)        ebook tool)
//! ```
//!
//! 1. [`sanitize`]   — strip `<script>` blocks and carriage returns, parse
//!    leniently, replace empty elements with `<br>`, re-serialize
//! 2. [`paragraphs`] — split on blank-line runs and wrap blocks in
//!    paragraph tags, preserving `<pre>` boundaries
//! 3. [`markdown`]   — HTML→Markdown→HTML round trip; the render half is
//!    the only subprocess in this stage
//! 4. [`package`]    — strip renderer scaffolding, wrap in the fixed HTML
//!    shell, invoke the e-book packager with metadata flags

pub mod markdown;
pub mod package;
pub mod paragraphs;
pub mod sanitize;
