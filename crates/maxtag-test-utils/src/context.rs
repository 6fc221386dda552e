//! A simple sentence-backed tagging context for tests.
//!
//! Production decoders maintain their own context representation; tests use
//! [`SentenceContext`], a plain sentence plus the tags assigned so far and a
//! current position.

use maxtag_core::{Context, EOS_TAG, EOS_WORD};

/// A tagging context over a fixed sentence.
///
/// Reads outside the sentence (or of tags not yet assigned) yield the
/// boundary values, mirroring what a decoder's window does at sentence
/// edges.
pub struct SentenceContext {
    words: Vec<String>,
    tags: Vec<String>,
    position: usize,
}

impl SentenceContext {
    /// Create a context over `words`, with `tags` assigned to the first
    /// `tags.len()` positions, focused on `position`.
    pub fn new(words: &[&str], tags: &[&str], position: usize) -> Self {
        Self {
            words: words.iter().map(|w| (*w).to_string()).collect(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            position,
        }
    }

    /// Move the focus to a new position.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Append an assigned tag, as a decoder does after scoring a position.
    pub fn assign_tag(&mut self, tag: &str) {
        self.tags.push(tag.to_string());
    }

    fn resolve(&self, offset: i32) -> Option<usize> {
        let position = i64::from(offset) + self.position as i64;
        usize::try_from(position).ok()
    }
}

impl Context for SentenceContext {
    fn word(&self, offset: i32) -> &str {
        self.resolve(offset)
            .and_then(|i| self.words.get(i))
            .map_or(EOS_WORD, String::as_str)
    }

    fn tag(&self, offset: i32) -> &str {
        self.resolve(offset)
            .and_then(|i| self.tags.get(i))
            .map_or(EOS_TAG, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_window_reads() {
        let context = SentenceContext::new(&["a", "b", "c"], &["X"], 1);
        assert_eq!(context.word(0), "b");
        assert_eq!(context.word(-1), "a");
        assert_eq!(context.word(1), "c");
        assert_eq!(context.tag(-1), "X");
    }

    #[test]
    fn test_boundary_reads() {
        let context = SentenceContext::new(&["a", "b"], &[], 0);
        assert_eq!(context.word(-1), EOS_WORD);
        assert_eq!(context.word(2), EOS_WORD);
        assert_eq!(context.tag(-1), EOS_TAG);
        // Position 0 has no assigned tag yet either
        assert_eq!(context.tag(0), EOS_TAG);
    }

    #[test]
    fn test_assign_and_advance() {
        let mut context = SentenceContext::new(&["a", "b"], &[], 0);
        context.assign_tag("DT");
        context.set_position(1);
        assert_eq!(context.tag(-1), "DT");
        assert_eq!(context.word(0), "b");
    }
}
