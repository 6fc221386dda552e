#![deny(unsafe_code)]

//! Configuration loading and validation for the maxtag tagger.
//!
//! Loads TOML configuration files and validates them against expected schemas.
//! Provides the [`TaggerConfig`] type as the central configuration structure:
//! the tag-class section (language preset, explicit open/closed lists, the
//! closed-tag learning threshold) and the declarative extractor templates the
//! feature registry is built from.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Language names accepted by the `tags.language` field.
///
/// The empty string selects the neutral (no-preset) language.
pub const VALID_LANGUAGES: &[&str] = &[
    "", "english", "polish", "chinese", "arabic", "german", "french", "medpost",
];

/// Extractor template kinds accepted by the `[[extractors.templates]]` entries.
pub const VALID_TEMPLATE_KINDS: &[&str] =
    &["word", "tag", "word-pair", "tag-word", "prefix", "suffix"];

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level tagger configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// Tag vocabulary configuration.
    #[serde(default)]
    pub tags: TagsConfig,

    /// Feature extractor templates.
    #[serde(default)]
    pub extractors: ExtractorsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tag vocabulary configuration.
///
/// The language preset seeds the closed-class set; the explicit lists
/// override or extend it. Supplying both an open and a closed list is a
/// validation error since the two modes are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Language preset name (see [`VALID_LANGUAGES`]). Empty = no preset.
    #[serde(default)]
    pub language: String,

    /// Tags to mark closed-class, in addition to the language preset.
    #[serde(default)]
    pub closed_class_tags: Vec<String>,

    /// Exhaustive list of open-class tags. When non-empty, every tag not in
    /// this list is treated as closed and `closed_class_tags` must be empty.
    #[serde(default)]
    pub open_class_tags: Vec<String>,

    /// Whether to mark tags closed based on training-data frequencies.
    #[serde(default)]
    pub learn_closed_tags: bool,

    /// A tag observed with fewer distinct token types than this threshold is
    /// considered closed when `learn_closed_tags` is enabled.
    #[serde(default = "default_closed_tag_threshold")]
    pub closed_tag_threshold: usize,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            language: String::new(),
            closed_class_tags: Vec::new(),
            open_class_tags: Vec::new(),
            learn_closed_tags: false,
            closed_tag_threshold: default_closed_tag_threshold(),
        }
    }
}

fn default_closed_tag_threshold() -> usize {
    40
}

/// Feature extractor templates.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExtractorsConfig {
    /// Templates, in registry order.
    #[serde(default)]
    pub templates: Vec<ExtractorTemplate>,
}

impl ExtractorsConfig {
    /// The standard trigram-window template set: the current word and its
    /// immediate neighbours, the two preceding tags, a tag-word conjunction,
    /// and 3-character affixes.
    pub fn standard() -> Self {
        Self {
            templates: vec![
                ExtractorTemplate::word(0),
                ExtractorTemplate::word(-1),
                ExtractorTemplate::word(1),
                ExtractorTemplate::tag(-1),
                ExtractorTemplate::tag(-2),
                ExtractorTemplate::tag_word(-1, 0),
                ExtractorTemplate::word_pair(-1, 0),
                ExtractorTemplate::prefix(3),
                ExtractorTemplate::suffix(3),
            ],
        }
    }
}

/// A single extractor template as expressed in TOML.
///
/// The `kind` field selects the extractor; the remaining fields are
/// kind-specific and validated accordingly:
///
/// | kind       | required fields             |
/// |------------|-----------------------------|
/// | `word`     | `offset`                    |
/// | `tag`      | `offset` (strictly negative)|
/// | `word-pair`| `offsets` (exactly two)     |
/// | `tag-word` | `tag_offset` (negative), `word_offset` |
/// | `prefix`   | `len` (nonzero)             |
/// | `suffix`   | `len` (nonzero)             |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorTemplate {
    /// Extractor kind (see [`VALID_TEMPLATE_KINDS`]).
    pub kind: String,

    /// Relative word/tag position for `word` and `tag` kinds.
    #[serde(default)]
    pub offset: Option<i32>,

    /// Word positions for the `word-pair` kind.
    #[serde(default)]
    pub offsets: Option<Vec<i32>>,

    /// Tag position for the `tag-word` kind.
    #[serde(default)]
    pub tag_offset: Option<i32>,

    /// Word position for the `tag-word` kind.
    #[serde(default)]
    pub word_offset: Option<i32>,

    /// Affix length for the `prefix` and `suffix` kinds.
    #[serde(default)]
    pub len: Option<usize>,
}

impl ExtractorTemplate {
    /// Word at `offset` relative to the current position.
    pub fn word(offset: i32) -> Self {
        Self {
            kind: "word".to_string(),
            offset: Some(offset),
            ..Self::empty()
        }
    }

    /// Previously assigned tag at a strictly negative `offset`.
    pub fn tag(offset: i32) -> Self {
        Self {
            kind: "tag".to_string(),
            offset: Some(offset),
            ..Self::empty()
        }
    }

    /// Conjunction of the words at two positions.
    pub fn word_pair(a: i32, b: i32) -> Self {
        Self {
            kind: "word-pair".to_string(),
            offsets: Some(vec![a, b]),
            ..Self::empty()
        }
    }

    /// Conjunction of an assigned tag and a word.
    pub fn tag_word(tag_offset: i32, word_offset: i32) -> Self {
        Self {
            kind: "tag-word".to_string(),
            tag_offset: Some(tag_offset),
            word_offset: Some(word_offset),
            ..Self::empty()
        }
    }

    /// First `len` characters of the current word.
    pub fn prefix(len: usize) -> Self {
        Self {
            kind: "prefix".to_string(),
            len: Some(len),
            ..Self::empty()
        }
    }

    /// Last `len` characters of the current word.
    pub fn suffix(len: usize) -> Self {
        Self {
            kind: "suffix".to_string(),
            len: Some(len),
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        Self {
            kind: String::new(),
            offset: None,
            offsets: None,
            tag_offset: None,
            word_offset: None,
            len: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TaggerConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: TaggerConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded tagger configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: TaggerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let language = self.tags.language.to_lowercase();
        if !VALID_LANGUAGES.contains(&language.as_str()) {
            return Err(ConfigError::Validation(format!(
                "tags.language must be one of {VALID_LANGUAGES:?}, got {:?}",
                self.tags.language
            )));
        }
        if !self.tags.open_class_tags.is_empty() && !self.tags.closed_class_tags.is_empty() {
            return Err(ConfigError::Validation(
                "tags.open_class_tags and tags.closed_class_tags are mutually exclusive"
                    .to_string(),
            ));
        }
        if self.tags.closed_tag_threshold == 0 {
            return Err(ConfigError::Validation(
                "tags.closed_tag_threshold must be non-zero".to_string(),
            ));
        }

        for (i, template) in self.extractors.templates.iter().enumerate() {
            validate_template(i, template)?;
        }

        Ok(())
    }
}

fn validate_template(i: usize, template: &ExtractorTemplate) -> Result<(), ConfigError> {
    if !VALID_TEMPLATE_KINDS.contains(&template.kind.as_str()) {
        return Err(ConfigError::Validation(format!(
            "extractors.templates[{i}].kind must be one of {VALID_TEMPLATE_KINDS:?}, got {:?}",
            template.kind
        )));
    }
    match template.kind.as_str() {
        "word" => {
            if template.offset.is_none() {
                return Err(ConfigError::Validation(format!(
                    "extractors.templates[{i}] (word) requires an offset"
                )));
            }
        }
        "tag" => match template.offset {
            None => {
                return Err(ConfigError::Validation(format!(
                    "extractors.templates[{i}] (tag) requires an offset"
                )));
            }
            Some(offset) if offset >= 0 => {
                return Err(ConfigError::Validation(format!(
                    "extractors.templates[{i}] (tag) offset must be strictly negative, got {offset}"
                )));
            }
            Some(_) => {}
        },
        "word-pair" => match &template.offsets {
            Some(offsets) if offsets.len() == 2 => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "extractors.templates[{i}] (word-pair) requires exactly two offsets"
                )));
            }
        },
        "tag-word" => {
            match template.tag_offset {
                None => {
                    return Err(ConfigError::Validation(format!(
                        "extractors.templates[{i}] (tag-word) requires a tag_offset"
                    )));
                }
                Some(offset) if offset >= 0 => {
                    return Err(ConfigError::Validation(format!(
                        "extractors.templates[{i}] (tag-word) tag_offset must be strictly \
                         negative, got {offset}"
                    )));
                }
                Some(_) => {}
            }
            if template.word_offset.is_none() {
                return Err(ConfigError::Validation(format!(
                    "extractors.templates[{i}] (tag-word) requires a word_offset"
                )));
            }
        }
        "prefix" | "suffix" => match template.len {
            None | Some(0) => {
                return Err(ConfigError::Validation(format!(
                    "extractors.templates[{i}] ({}) requires a non-zero len",
                    template.kind
                )));
            }
            Some(_) => {}
        },
        _ => unreachable!("kind already validated"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TaggerConfig::default();
        assert_eq!(config.tags.language, "");
        assert!(config.tags.closed_class_tags.is_empty());
        assert!(config.tags.open_class_tags.is_empty());
        assert!(!config.tags.learn_closed_tags);
        assert_eq!(config.tags.closed_tag_threshold, 40);
        assert!(config.extractors.templates.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = "";
        let config = TaggerConfig::parse(toml).unwrap();
        assert_eq!(config.tags.closed_tag_threshold, 40);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [tags]
            language = "english"
            learn_closed_tags = true
            closed_tag_threshold = 20

            [logging]
            level = "debug"

            [[extractors.templates]]
            kind = "word"
            offset = 0

            [[extractors.templates]]
            kind = "tag"
            offset = -1
        "#;
        let config = TaggerConfig::parse(toml).unwrap();
        assert_eq!(config.tags.language, "english");
        assert!(config.tags.learn_closed_tags);
        assert_eq!(config.tags.closed_tag_threshold, 20);
        assert_eq!(config.extractors.templates.len(), 2);
        assert_eq!(config.extractors.templates[1].kind, "tag");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_unknown_language() {
        let toml = r#"
            [tags]
            language = "klingon"
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_language_is_case_insensitive() {
        let toml = r#"
            [tags]
            language = "English"
        "#;
        assert!(TaggerConfig::parse(toml).is_ok());
    }

    #[test]
    fn test_validation_rejects_both_class_lists() {
        let toml = r#"
            [tags]
            closed_class_tags = ["DT"]
            open_class_tags = ["NN", "VB"]
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_threshold() {
        let toml = r#"
            [tags]
            closed_tag_threshold = 0
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    // ── Extractor templates ───────────────────────────────────────────

    #[test]
    fn test_template_validation_rejects_unknown_kind() {
        let toml = r#"
            [[extractors.templates]]
            kind = "bigram"
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_validation_requires_word_offset() {
        let toml = r#"
            [[extractors.templates]]
            kind = "word"
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_validation_rejects_non_negative_tag_offset() {
        let toml = r#"
            [[extractors.templates]]
            kind = "tag"
            offset = 0
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_validation_rejects_single_pair_offset() {
        let toml = r#"
            [[extractors.templates]]
            kind = "word-pair"
            offsets = [-1]
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_validation_requires_tag_word_fields() {
        let toml = r#"
            [[extractors.templates]]
            kind = "tag-word"
            tag_offset = -1
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_validation_rejects_zero_affix_len() {
        let toml = r#"
            [[extractors.templates]]
            kind = "suffix"
            len = 0
        "#;
        let result = TaggerConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_standard_templates_validate() {
        let config = TaggerConfig {
            extractors: ExtractorsConfig::standard(),
            ..TaggerConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(config.extractors.templates.len(), 9);
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[test_log::test(tokio::test)]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("maxtag.toml");
        tokio::fs::write(&path, b"[tags]\nlanguage = \"german\"\n")
            .await
            .unwrap();

        let config = TaggerConfig::load(&path).await.unwrap();
        assert_eq!(config.tags.language, "german");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = TaggerConfig::load(Path::new("/nonexistent/file.toml")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = TaggerConfig::load(&path).await;
        assert!(result.is_err());
    }

    // ── Error display ─────────────────────────────────────────────────

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
