//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`TaggerConfig`] values
//! without repeating boilerplate across crate boundaries.

use maxtag_config::{ExtractorsConfig, TaggerConfig};

/// Fluent builder for [`TaggerConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .language("english")
///     .standard_extractors()
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: TaggerConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TaggerConfig::default(),
        }
    }

    pub fn language(mut self, language: &str) -> Self {
        self.config.tags.language = language.to_string();
        self
    }

    pub fn closed_class_tags(mut self, tags: &[&str]) -> Self {
        self.config.tags.closed_class_tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub fn open_class_tags(mut self, tags: &[&str]) -> Self {
        self.config.tags.open_class_tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub fn learn_closed_tags(mut self, learn: bool) -> Self {
        self.config.tags.learn_closed_tags = learn;
        self
    }

    pub fn closed_tag_threshold(mut self, threshold: usize) -> Self {
        self.config.tags.closed_tag_threshold = threshold;
        self
    }

    pub fn standard_extractors(mut self) -> Self {
        self.config.extractors = ExtractorsConfig::standard();
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> TaggerConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
