//! Standard context-window extractors.
//!
//! Concrete [`Extractor`] implementations over word and tag positions in the
//! tagging window, instantiated from the declarative
//! [`ExtractorTemplate`](maxtag_config::ExtractorTemplate) entries in
//! configuration. Conjunction extractors join their parts with `'!'`.

use std::sync::Arc;

use maxtag_config::{ExtractorTemplate, ExtractorsConfig};

use crate::extract::{Context, Extractor, RegistryError};

fn radius_left(offset: i32) -> usize {
    usize::try_from(-i64::from(offset)).unwrap_or(0)
}

fn radius_right(offset: i32) -> usize {
    usize::try_from(offset).unwrap_or(0)
}

/// The word at a relative position. Local iff the offset is zero.
pub struct WordExtractor {
    offset: i32,
}

impl WordExtractor {
    pub fn new(offset: i32) -> Self {
        Self { offset }
    }
}

impl Extractor for WordExtractor {
    fn name(&self) -> String {
        format!("word({})", self.offset)
    }

    fn extract(&self, context: &dyn Context) -> String {
        context.word(self.offset).to_string()
    }

    fn is_local(&self) -> bool {
        self.offset == 0
    }

    fn left_context(&self) -> usize {
        radius_left(self.offset)
    }

    fn right_context(&self) -> usize {
        radius_right(self.offset)
    }
}

/// The tag assigned at a strictly negative relative position.
pub struct TagExtractor {
    offset: i32,
}

impl TagExtractor {
    /// `offset` must be strictly negative; the decoder has assigned no tags
    /// at or after the current position.
    pub fn new(offset: i32) -> Self {
        debug_assert!(offset < 0);
        Self { offset }
    }
}

impl Extractor for TagExtractor {
    fn name(&self) -> String {
        format!("tag({})", self.offset)
    }

    fn extract(&self, context: &dyn Context) -> String {
        context.tag(self.offset).to_string()
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn left_context(&self) -> usize {
        radius_left(self.offset)
    }
}

/// Conjunction of the words at two relative positions.
pub struct WordPairExtractor {
    a: i32,
    b: i32,
}

impl WordPairExtractor {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }
}

impl Extractor for WordPairExtractor {
    fn name(&self) -> String {
        format!("word-pair({},{})", self.a, self.b)
    }

    fn extract(&self, context: &dyn Context) -> String {
        format!("{}!{}", context.word(self.a), context.word(self.b))
    }

    fn left_context(&self) -> usize {
        radius_left(self.a).max(radius_left(self.b))
    }

    fn right_context(&self) -> usize {
        radius_right(self.a).max(radius_right(self.b))
    }
}

/// Conjunction of an assigned tag and a word.
pub struct TagWordExtractor {
    tag_offset: i32,
    word_offset: i32,
}

impl TagWordExtractor {
    /// `tag_offset` must be strictly negative.
    pub fn new(tag_offset: i32, word_offset: i32) -> Self {
        debug_assert!(tag_offset < 0);
        Self {
            tag_offset,
            word_offset,
        }
    }
}

impl Extractor for TagWordExtractor {
    fn name(&self) -> String {
        format!("tag-word({},{})", self.tag_offset, self.word_offset)
    }

    fn extract(&self, context: &dyn Context) -> String {
        format!(
            "{}!{}",
            context.tag(self.tag_offset),
            context.word(self.word_offset)
        )
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn left_context(&self) -> usize {
        radius_left(self.tag_offset).max(radius_left(self.word_offset))
    }

    fn right_context(&self) -> usize {
        radius_right(self.word_offset)
    }
}

/// The first `len` characters of the current word. Words shorter than `len`
/// yield the whole word.
pub struct PrefixExtractor {
    len: usize,
}

impl PrefixExtractor {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Extractor for PrefixExtractor {
    fn name(&self) -> String {
        format!("prefix({})", self.len)
    }

    fn extract(&self, context: &dyn Context) -> String {
        context.word(0).chars().take(self.len).collect()
    }

    fn is_local(&self) -> bool {
        true
    }
}

/// The last `len` characters of the current word. Words shorter than `len`
/// yield the whole word.
pub struct SuffixExtractor {
    len: usize,
}

impl SuffixExtractor {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Extractor for SuffixExtractor {
    fn name(&self) -> String {
        format!("suffix({})", self.len)
    }

    fn extract(&self, context: &dyn Context) -> String {
        let word = context.word(0);
        let count = word.chars().count();
        word.chars().skip(count.saturating_sub(self.len)).collect()
    }

    fn is_local(&self) -> bool {
        true
    }
}

/// Instantiate the configured templates as concrete extractors, in template
/// order.
pub fn build_extractors(
    cfg: &ExtractorsConfig,
) -> Result<Vec<Arc<dyn Extractor>>, RegistryError> {
    cfg.templates
        .iter()
        .enumerate()
        .map(|(index, template)| build_one(index, template))
        .collect()
}

fn build_one(index: usize, template: &ExtractorTemplate) -> Result<Arc<dyn Extractor>, RegistryError> {
    let missing = |field: &str| RegistryError::InvalidTemplate {
        index,
        reason: format!("missing {field}"),
    };

    match template.kind.as_str() {
        "word" => {
            let offset = template.offset.ok_or_else(|| missing("offset"))?;
            Ok(Arc::new(WordExtractor::new(offset)))
        }
        "tag" => {
            let offset = template.offset.ok_or_else(|| missing("offset"))?;
            if offset >= 0 {
                return Err(RegistryError::InvalidTemplate {
                    index,
                    reason: format!("tag offset must be strictly negative, got {offset}"),
                });
            }
            Ok(Arc::new(TagExtractor::new(offset)))
        }
        "word-pair" => {
            let offsets = template.offsets.as_ref().ok_or_else(|| missing("offsets"))?;
            if offsets.len() != 2 {
                return Err(RegistryError::InvalidTemplate {
                    index,
                    reason: format!("word-pair requires exactly two offsets, got {}", offsets.len()),
                });
            }
            Ok(Arc::new(WordPairExtractor::new(offsets[0], offsets[1])))
        }
        "tag-word" => {
            let tag_offset = template.tag_offset.ok_or_else(|| missing("tag_offset"))?;
            if tag_offset >= 0 {
                return Err(RegistryError::InvalidTemplate {
                    index,
                    reason: format!("tag offset must be strictly negative, got {tag_offset}"),
                });
            }
            let word_offset = template.word_offset.ok_or_else(|| missing("word_offset"))?;
            Ok(Arc::new(TagWordExtractor::new(tag_offset, word_offset)))
        }
        "prefix" => {
            let len = template.len.ok_or_else(|| missing("len"))?;
            Ok(Arc::new(PrefixExtractor::new(len)))
        }
        "suffix" => {
            let len = template.len.ok_or_else(|| missing("len"))?;
            Ok(Arc::new(SuffixExtractor::new(len)))
        }
        other => Err(RegistryError::UnknownTemplateKind(other.to_string())),
    }
}
