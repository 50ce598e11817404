//! EPUB metadata and its mapping to packager command-line flags.

use crate::record::ScriptRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed category label prepended to every tag list.
pub const TAG_CATEGORY: &str = "movie-script";

/// Metadata attached to a packaged EPUB.
///
/// Serializes to a flat sequence of `--flag value` pairs for the packaging
/// tool. `None` fields are omitted entirely; `language` is always present
/// and defaults to English.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpubMetadata {
    pub title: String,
    pub authors: Option<Vec<String>>,
    pub pubdate: Option<String>,
    pub cover: Option<PathBuf>,
    pub language: String,
    pub tags: Option<Vec<String>>,
}

impl EpubMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: None,
            pubdate: None,
            cover: None,
            language: "en".to_string(),
            tags: None,
        }
    }

    /// Derive metadata from a script record plus an optional cover image.
    ///
    /// The normalized title is used (filenames and metadata must agree),
    /// writers become authors, the script date becomes the publish date,
    /// and genres become tags.
    pub fn from_record(record: &ScriptRecord, cover: Option<PathBuf>) -> Self {
        Self {
            title: record.normalized_title(),
            authors: record.writers.clone(),
            pubdate: record.script_date.clone(),
            cover,
            language: "en".to_string(),
            tags: record.genres.clone(),
        }
    }

    /// Serialize to packager command-line arguments.
    ///
    /// List-valued fields join with the delimiter the packaging tool
    /// expects: `&` for authors, `, ` for tags. The tag list is prefixed
    /// with [`TAG_CATEGORY`].
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--title".to_string(), self.title.clone()];

        if let Some(ref authors) = self.authors {
            args.push("--authors".to_string());
            args.push(authors.join("&"));
        }
        if let Some(ref pubdate) = self.pubdate {
            args.push("--pubdate".to_string());
            args.push(pubdate.clone());
        }
        if let Some(ref cover) = self.cover {
            args.push("--cover".to_string());
            args.push(cover.display().to_string());
        }

        args.push("--language".to_string());
        args.push(self.language.clone());

        if let Some(ref tags) = self.tags {
            let mut labelled = Vec::with_capacity(tags.len() + 1);
            labelled.push(TAG_CATEGORY.to_string());
            labelled.extend(tags.iter().cloned());
            args.push("--tags".to_string());
            args.push(labelled.join(", "));
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_metadata_has_title_and_language_only() {
        let args = EpubMetadata::new("Blade Runner").to_args();
        assert_eq!(
            args,
            vec!["--title", "Blade Runner", "--language", "en"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn authors_join_with_ampersand() {
        let mut meta = EpubMetadata::new("T");
        meta.authors = Some(vec!["A".into(), "B".into()]);
        let args = meta.to_args();
        let idx = args.iter().position(|a| a == "--authors").expect("flag");
        assert_eq!(args[idx + 1], "A&B");
    }

    #[test]
    fn tags_are_prefixed_with_category() {
        let mut meta = EpubMetadata::new("T");
        meta.tags = Some(vec!["drama".into()]);
        let args = meta.to_args();
        let idx = args.iter().position(|a| a == "--tags").expect("flag");
        assert_eq!(args[idx + 1], "movie-script, drama");
    }

    #[test]
    fn unset_fields_never_appear() {
        let args = EpubMetadata::new("T").to_args();
        for flag in ["--authors", "--pubdate", "--cover", "--tags"] {
            assert!(!args.contains(&flag.to_string()), "{flag} should be absent");
        }
    }

    #[test]
    fn from_record_maps_all_fields() {
        let record = ScriptRecord {
            title: "The  Matrix".into(),
            script: String::new(),
            writers: Some(vec!["Lana W".into(), "Lilly W".into()]),
            script_date: Some("1998".into()),
            genres: Some(vec!["Sci-Fi".into(), "Action".into()]),
        };
        let meta = EpubMetadata::from_record(&record, Some(PathBuf::from("covers/The_Matrix.jpg")));
        assert_eq!(meta.title, "The Matrix");
        assert_eq!(meta.language, "en");

        let args = meta.to_args();
        let tags = args
            .iter()
            .position(|a| a == "--tags")
            .map(|i| args[i + 1].clone())
            .expect("tags flag");
        assert_eq!(tags, "movie-script, Sci-Fi, Action");
        assert!(args.contains(&"covers/The_Matrix.jpg".to_string()));
    }
}
