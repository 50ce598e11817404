//! CLI binary for script2epub.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, wires the real subprocess tools, and renders batch
//! progress.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use script2epub::{
    run_batch, BatchProgress, CommandPackager, CommandRenderer, ConversionConfig, NoopProgress,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one bar anchored at the bottom, one log line per
/// converted or failed title above it.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Reading records…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl BatchProgress for CliProgress {
    fn on_batch_start(&self, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} scripts  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total} scripts…"))
        ));
    }

    fn on_record_start(&self, _index: usize, _total: usize, title: &str) {
        self.bar.set_message(title.to_string());
    }

    fn on_record_done(&self, index: usize, total: usize, title: &str) {
        self.bar
            .println(format!("  {} {index:>3}/{total:<3}  {title}", green("✓")));
        self.bar.inc(1);
    }

    fn on_record_error(&self, index: usize, total: usize, title: &str, error: &str) {
        // Keep only the first line of multi-line tool stderr in the log;
        // the full text is in the tracing output.
        let first_line = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} {index:>3}/{total:<3}  {title}  {}",
            red("✗"),
            red(first_line)
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, converted: usize, failed: usize) {
        self.bar.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} {} scripts converted successfully",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} scripts converted  ({} failed)",
                if converted == 0 { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                converted + failed,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the default batch (data_html.jsonl → html/ + epub/)
  script2epub

  # Explicit source and cover art directory
  script2epub scripts.jsonl --covers covers/

  # Point at specific converter binaries
  script2epub --renderer-cmd /opt/bin/md-to-html --packager-cmd /opt/calibre/ebook-convert

EXTERNAL TOOLS:
  md-to-html       Markdown→HTML renderer, called as:
                     md-to-html --input in.md --output out.html
  ebook-convert    E-book packager (calibre), called as:
                     ebook-convert src.html dest.epub [--title … --authors …]

  Both must be installed and on PATH (or named via flags). Each record's
  metadata is passed to the packager as --title/--authors/--pubdate/
  --cover/--language/--tags flags.

INPUT FORMAT:
  Newline-delimited JSON, one record per line:
    {"title": "...", "script": "<html>…", "writers": ["…"],
     "script_date": "…", "genres": ["…"]}
  Only title and script are required.

A record that fails conversion is logged and skipped; the rest of the
batch continues.
"#;

/// Convert HTML movie scripts to EPUB e-books.
#[derive(Parser, Debug)]
#[command(
    name = "script2epub",
    version,
    about = "Batch-convert HTML movie scripts to EPUB e-books",
    long_about = "Batch-convert HTML movie-script documents to EPUB. Normalizes scraped \
markup into paragraph HTML, round-trips through Markdown to clean up formatting, and \
packages each script with its metadata via an external e-book conversion tool.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Newline-delimited JSON file of script records.
    #[arg(default_value = "data_html.jsonl")]
    input: PathBuf,

    /// Directory for HTML inspection artifacts (BEFORE_/after files).
    #[arg(long, env = "SCRIPT2EPUB_HTML_DIR", default_value = "html")]
    html_dir: PathBuf,

    /// Directory for the final EPUB files.
    #[arg(long, env = "SCRIPT2EPUB_EPUB_DIR", default_value = "epub")]
    epub_dir: PathBuf,

    /// Directory of cover images (matched by underscore-joined title).
    #[arg(long, env = "SCRIPT2EPUB_COVERS")]
    covers: Option<PathBuf>,

    /// Markdown→HTML renderer command.
    #[arg(long, env = "SCRIPT2EPUB_RENDERER", default_value = "md-to-html")]
    renderer_cmd: PathBuf,

    /// E-book packager command.
    #[arg(long, env = "SCRIPT2EPUB_PACKAGER", default_value = "ebook-convert")]
    packager_cmd: PathBuf,

    /// Disable the progress bar.
    #[arg(long, env = "SCRIPT2EPUB_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCRIPT2EPUB_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCRIPT2EPUB_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    run(cli)
}

/// Suppress INFO-level library logs while the progress bar is active;
/// the bar and its per-title log lines carry the same information.
fn init_logging(cli: &Cli) {
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let show_progress = !cli.quiet && !cli.no_progress;

    // ── Build config and tools ───────────────────────────────────────────
    let mut builder = ConversionConfig::builder()
        .input(&cli.input)
        .html_dir(&cli.html_dir)
        .epub_dir(&cli.epub_dir)
        .renderer_cmd(&cli.renderer_cmd)
        .packager_cmd(&cli.packager_cmd);
    if let Some(ref covers) = cli.covers {
        builder = builder.covers_dir(covers);
    }
    let config = builder.build().context("Invalid configuration")?;

    let renderer = CommandRenderer::new(&config.renderer_cmd);
    let packager = CommandPackager::new(&config.packager_cmd);

    // ── Run batch ────────────────────────────────────────────────────────
    let report = if show_progress {
        let progress = CliProgress::new();
        run_batch(&config, &renderer, &packager, &progress)
    } else {
        run_batch(&config, &renderer, &packager, &NoopProgress)
    }
    .with_context(|| format!("Batch failed for '{}'", cli.input.display()))?;

    // Per-title failure detail after the bar has been cleared.
    if !cli.quiet && !report.is_clean() {
        eprintln!();
        for failure in &report.failures {
            eprintln!("{} {}", red("✗"), bold(&failure.title));
            for line in failure.error.to_string().lines() {
                eprintln!("    {}", dim(line));
            }
        }
    }

    if !cli.quiet && !show_progress {
        eprintln!(
            "Converted {}/{} scripts",
            report.succeeded(),
            report.succeeded() + report.failed()
        );
    }

    // Per-record failures never change the exit code: a readable batch
    // exits 0 no matter how many records failed. Nonzero is reserved for
    // operational errors (unreadable input, uncreatable output dirs).
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(dir: &std::path::Path, input: PathBuf, renderer: &str) -> Cli {
        Cli {
            input,
            html_dir: dir.join("html"),
            epub_dir: dir.join("epub"),
            covers: None,
            renderer_cmd: PathBuf::from(renderer),
            packager_cmd: PathBuf::from("/bin/true"),
            no_progress: true,
            verbose: false,
            quiet: true,
        }
    }

    #[cfg(unix)]
    #[test]
    fn all_failed_batch_still_exits_cleanly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("scripts.jsonl");
        std::fs::write(&input, "{\"title\": \"A\", \"script\": \"<p>x</p>\"}\n")
            .expect("write jsonl");

        // /bin/false exits nonzero, so every record fails to render; the
        // process itself must still succeed.
        let cli = cli_for(dir.path(), input, "/bin/false");
        assert!(run(cli).is_ok());
    }

    #[test]
    fn unreadable_input_is_an_operational_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cli = cli_for(dir.path(), dir.path().join("nope.jsonl"), "/bin/true");
        assert!(run(cli).is_err());
    }
}
