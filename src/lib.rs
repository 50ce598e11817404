//! # script2epub
//!
//! Batch-convert HTML movie-script documents into EPUB e-books.
//!
//! Scraped script pages are messy: inline `<script>` blocks, empty
//! elements that swallow paragraph boundaries, carriage returns, and
//! `<pre>` regions that must keep their layout. This crate normalizes
//! that markup into clean paragraph HTML, round-trips it through Markdown
//! to iron out formatting quirks, and hands the result to an external
//! e-book packaging tool together with per-title metadata (title,
//! authors, publish date, cover image, tags).
//!
//! ## Pipeline Overview
//!
//! ```text
//! raw HTML
//!  │
//!  ├─ 1. Sanitize    strip scripts/CRs, empty elements → <br>, pretty-print
//!  ├─ 2. Paragraphs  split on blank-line runs, keep <pre> boundaries
//!  ├─ 3. Markdown    HTML→Markdown, then external renderer back to HTML
//!  ├─ 4. Package     fixed HTML shell + metadata flags → ebook tool
//!  └─ 5. Output      epub/{title}.epub (+ html/ inspection artifacts)
//! ```
//!
//! Stages 1–2 are pure string transforms; stages 3–4 each call one
//! external tool through a narrow trait ([`MarkdownRenderer`],
//! [`EpubPackager`]) so tests can inject fakes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use script2epub::{run_batch, CommandPackager, CommandRenderer, ConversionConfig, NoopProgress};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .input("data_html.jsonl")
//!         .covers_dir("covers")
//!         .build()?;
//!     let report = run_batch(
//!         &config,
//!         &CommandRenderer::default(),
//!         &CommandPackager::default(),
//!         &NoopProgress,
//!     )?;
//!     eprintln!("{} converted, {} failed", report.succeeded(), report.failed());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `script2epub` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! script2epub = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod tools;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, BatchFailure, BatchReport};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert_script, preprocess};
pub use error::ConversionError;
pub use metadata::{EpubMetadata, TAG_CATEGORY};
pub use progress::{BatchProgress, NoopProgress};
pub use record::{read_records, ScriptRecord};
pub use tools::{CommandPackager, CommandRenderer, EpubPackager, MarkdownRenderer};
