//! Batch driver: convert every record of a JSONL source, one at a time.
//!
//! Strictly sequential — one record is carried all the way to its EPUB
//! before the next begins, and no state crosses records. A per-record
//! failure is logged, recorded in the returned [`BatchReport`], and the
//! batch moves on; partial success is the expected steady state. The only
//! batch-fatal errors are an unreadable input file and uncreatable output
//! directories.

use crate::config::ConversionConfig;
use crate::convert;
use crate::error::ConversionError;
use crate::metadata::EpubMetadata;
use crate::progress::BatchProgress;
use crate::record::{read_records, ScriptRecord};
use crate::tools::{EpubPackager, MarkdownRenderer};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One failed record: which title, and why.
#[derive(Debug)]
pub struct BatchFailure {
    pub title: String,
    pub error: ConversionError,
}

/// Outcome of a batch run.
///
/// Collecting results here, rather than logging into a global and
/// forgetting, lets callers inspect exactly which titles failed and why
/// after the run completes.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Normalized titles converted successfully, in processing order.
    pub converted: Vec<String>,
    /// Records that failed, with their errors.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.converted.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every record converted.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Convert every record in `config.input`.
///
/// Records are processed in title order. For each record the driver
/// writes the raw input to `html/BEFORE_{title}.html`, the preprocessed
/// HTML to `html/{title}.html`, and the EPUB to `epub/{title}.epub`.
pub fn run_batch(
    config: &ConversionConfig,
    renderer: &dyn MarkdownRenderer,
    packager: &dyn EpubPackager,
    progress: &dyn BatchProgress,
) -> Result<BatchReport, ConversionError> {
    std::fs::create_dir_all(&config.html_dir)
        .map_err(|e| ConversionError::io(&config.html_dir, e))?;
    std::fs::create_dir_all(&config.epub_dir)
        .map_err(|e| ConversionError::io(&config.epub_dir, e))?;

    let records = read_records(&config.input)?;
    let total = records.len();
    info!(total, input = %config.input.display(), "starting batch");
    progress.on_batch_start(total);

    let mut report = BatchReport::default();
    for (i, record) in records.iter().enumerate() {
        let index = i + 1;
        let title = record.normalized_title();
        progress.on_record_start(index, total, &title);

        match convert_record(record, &title, config, renderer, packager) {
            Ok(path) => {
                info!(title = %title, path = %path.display(), "converted");
                progress.on_record_done(index, total, &title);
                report.converted.push(title);
            }
            Err(e) => {
                error!(title = %title, error = %e, "conversion failed");
                progress.on_record_error(index, total, &title, &e.to_string());
                report.failures.push(BatchFailure { title, error: e });
            }
        }
    }

    info!(
        converted = report.succeeded(),
        failed = report.failed(),
        "batch complete"
    );
    progress.on_batch_complete(report.succeeded(), report.failed());
    Ok(report)
}

fn convert_record(
    record: &ScriptRecord,
    title: &str,
    config: &ConversionConfig,
    renderer: &dyn MarkdownRenderer,
    packager: &dyn EpubPackager,
) -> Result<PathBuf, ConversionError> {
    // Raw input first, byte-identical, so a bad conversion can always be
    // diffed against what actually came in.
    let before_path = config.html_dir.join(format!("BEFORE_{title}.html"));
    std::fs::write(&before_path, &record.script)
        .map_err(|e| ConversionError::io(&before_path, e))?;

    let processed = convert::preprocess(&record.script, renderer)?;

    let after_path = config.html_dir.join(format!("{title}.html"));
    std::fs::write(&after_path, &processed)
        .map_err(|e| ConversionError::io(&after_path, e))?;

    let cover = config
        .covers_dir
        .as_deref()
        .and_then(|dir| find_cover(dir, title));
    let metadata = EpubMetadata::from_record(record, cover);

    let destination = config.epub_dir.join(format!("{title}.epub"));
    crate::pipeline::package::package(&processed, &destination, Some(&metadata), packager)
}

/// Locate a cover image for `title`.
///
/// The match key is the title with every whitespace character replaced by
/// an underscore; any file in `dir` whose stem equals the key matches, no
/// matter the image format. When several formats share the stem the
/// lexicographically smallest path wins, so repeated runs embed the same
/// cover regardless of directory iteration order. Absence (including a
/// missing directory) is not an error — metadata simply omits the cover.
pub fn find_cover(dir: &Path, title: &str) -> Option<PathBuf> {
    let stem: String = title
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str()))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_cover_matches_underscore_stem() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Test_Movie.jpg"), b"jpg").unwrap();
        std::fs::write(dir.path().join("Other.png"), b"png").unwrap();

        let found = find_cover(dir.path(), "Test Movie").expect("cover");
        assert_eq!(found, dir.path().join("Test_Movie.jpg"));
    }

    #[test]
    fn find_cover_prefers_smallest_path_on_stem_collision() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Test_Movie.png"), b"png").unwrap();
        std::fs::write(dir.path().join("Test_Movie.jpg"), b"jpg").unwrap();

        // Stable pick independent of read_dir iteration order.
        let found = find_cover(dir.path(), "Test Movie").expect("cover");
        assert_eq!(found, dir.path().join("Test_Movie.jpg"));
    }

    #[test]
    fn find_cover_misses_quietly() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(find_cover(dir.path(), "No Such Film").is_none());
        assert!(find_cover(Path::new("/no/such/dir"), "Anything").is_none());
    }

    #[test]
    fn report_counts() {
        let mut report = BatchReport::default();
        assert!(report.is_clean());
        report.converted.push("A".into());
        report.failures.push(BatchFailure {
            title: "B".into(),
            error: ConversionError::ToolFailed {
                tool: "md-to-html".into(),
                stderr: "x".into(),
            },
        });
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_clean());
    }
}
