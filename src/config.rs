//! Configuration for a batch conversion run.
//!
//! Everything lives in one [`ConversionConfig`] built via its builder, so
//! a run can be logged or diffed as a unit and tests can point the whole
//! pipeline at a temp directory with a couple of setters.

use crate::error::ConversionError;
use crate::tools::{DEFAULT_PACKAGER, DEFAULT_RENDERER};
use std::path::PathBuf;

/// Configuration for one batch run.
///
/// # Example
/// ```rust
/// use script2epub::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .input("data_html.jsonl")
///     .covers_dir("covers")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Newline-delimited JSON source of script records.
    pub input: PathBuf,

    /// Directory receiving `BEFORE_{title}.html` and `{title}.html`
    /// inspection artifacts. Created if missing.
    pub html_dir: PathBuf,

    /// Directory receiving the final `{title}.epub` artifacts. Created if
    /// missing.
    pub epub_dir: PathBuf,

    /// Directory of cover images, matched by underscore-joined title
    /// stem. `None` disables cover lookup; a missing cover is never an
    /// error either way.
    pub covers_dir: Option<PathBuf>,

    /// Markdown→HTML renderer command.
    pub renderer_cmd: PathBuf,

    /// E-book packager command.
    pub packager_cmd: PathBuf,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data_html.jsonl"),
            html_dir: PathBuf::from("html"),
            epub_dir: PathBuf::from("epub"),
            covers_dir: None,
            renderer_cmd: PathBuf::from(DEFAULT_RENDERER),
            packager_cmd: PathBuf::from(DEFAULT_PACKAGER),
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = path.into();
        self
    }

    pub fn html_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.html_dir = dir.into();
        self
    }

    pub fn epub_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.epub_dir = dir.into();
        self
    }

    pub fn covers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.covers_dir = Some(dir.into());
        self
    }

    pub fn renderer_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.renderer_cmd = cmd.into();
        self
    }

    pub fn packager_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.packager_cmd = cmd.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConversionError> {
        let c = &self.config;
        if c.html_dir == c.epub_dir {
            return Err(ConversionError::InvalidConfig(format!(
                "html and epub output directories must differ, both are '{}'",
                c.html_dir.display()
            )));
        }
        if c.input.as_os_str().is_empty() {
            return Err(ConversionError::InvalidConfig(
                "input path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
