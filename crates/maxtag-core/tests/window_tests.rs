//! Standard context-window extractor tests.
//!
//! These live as integration tests (rather than in-crate unit tests) because
//! they use `maxtag_test_utils::context::SentenceContext`, and
//! `maxtag-test-utils` depends on `maxtag-core`; exercising that fixture from
//! inside `maxtag-core`'s own `#[cfg(test)]` module would pull two distinct
//! copies of `maxtag-core` into the graph. Integration tests link against the
//! single built library, so the fixture's `Context` impl matches.

use maxtag_config::{ExtractorsConfig, ExtractorTemplate};
use maxtag_core::window::{
    PrefixExtractor, SuffixExtractor, TagExtractor, TagWordExtractor, WordExtractor,
    WordPairExtractor, build_extractors,
};
use maxtag_core::{EOS_TAG, EOS_WORD, Extractor, ExtractorRegistry, RegistryError};
use maxtag_test_utils::context::SentenceContext;
use pretty_assertions::assert_eq;

fn sample_context() -> SentenceContext {
    // "the striped cat slept", tagging position 2 ("cat"),
    // with DT and JJ already assigned
    SentenceContext::new(&["the", "striped", "cat", "slept"], &["DT", "JJ"], 2)
}

#[test]
fn test_word_extractor_offsets() {
    let context = sample_context();
    assert_eq!(WordExtractor::new(0).extract(&context), "cat");
    assert_eq!(WordExtractor::new(-2).extract(&context), "the");
    assert_eq!(WordExtractor::new(1).extract(&context), "slept");
}

#[test]
fn test_word_extractor_locality_and_radii() {
    assert!(WordExtractor::new(0).is_local());
    assert!(!WordExtractor::new(-1).is_local());

    let back_two = WordExtractor::new(-2);
    assert_eq!(back_two.left_context(), 2);
    assert_eq!(back_two.right_context(), 0);

    let ahead_one = WordExtractor::new(1);
    assert_eq!(ahead_one.left_context(), 0);
    assert_eq!(ahead_one.right_context(), 1);
}

#[test]
fn test_out_of_window_reads_yield_boundary_values() {
    let context = sample_context();
    assert_eq!(WordExtractor::new(5).extract(&context), EOS_WORD);
    assert_eq!(WordExtractor::new(-7).extract(&context), EOS_WORD);
    assert_eq!(TagExtractor::new(-3).extract(&context), EOS_TAG);
}

#[test]
fn test_tag_extractor_is_dynamic() {
    let context = sample_context();
    let previous = TagExtractor::new(-1);
    assert!(previous.is_dynamic());
    assert!(!previous.is_local());
    assert_eq!(previous.left_context(), 1);
    assert_eq!(previous.extract(&context), "JJ");
    assert_eq!(TagExtractor::new(-2).extract(&context), "DT");
}

#[test]
fn test_word_pair_joins_with_bang() {
    let context = sample_context();
    let pair = WordPairExtractor::new(-1, 0);
    assert_eq!(pair.extract(&context), "striped!cat");
    assert_eq!(pair.left_context(), 1);
    assert_eq!(pair.right_context(), 0);
    assert!(!pair.is_local());
    assert!(!pair.is_dynamic());
}

#[test]
fn test_tag_word_conjunction() {
    let context = sample_context();
    let conj = TagWordExtractor::new(-1, 0);
    assert!(conj.is_dynamic());
    assert_eq!(conj.extract(&context), "JJ!cat");
    assert_eq!(conj.left_context(), 1);
}

#[test]
fn test_affix_extractors() {
    let context = sample_context();
    assert_eq!(PrefixExtractor::new(2).extract(&context), "ca");
    assert_eq!(SuffixExtractor::new(2).extract(&context), "at");
    // Shorter words yield the whole word
    assert_eq!(PrefixExtractor::new(8).extract(&context), "cat");
    assert_eq!(SuffixExtractor::new(8).extract(&context), "cat");
    assert!(PrefixExtractor::new(2).is_local());
    assert!(SuffixExtractor::new(2).is_local());
}

#[test]
fn test_build_standard_templates() {
    let registry = ExtractorRegistry::from_config(&ExtractorsConfig::standard()).unwrap();
    assert_eq!(registry.size(), 9);
    assert_eq!(registry.left_context(), 2);
    assert_eq!(registry.right_context(), 1);
    assert_eq!(registry.local().len(), 3);
    assert_eq!(registry.dynamic().len(), 3);
    assert_eq!(registry.local_context().len(), 3);
}

#[test]
fn test_build_rejects_unknown_kind() {
    let cfg = ExtractorsConfig {
        templates: vec![ExtractorTemplate {
            kind: "bigram".to_string(),
            ..ExtractorTemplate::word(0)
        }],
    };
    let err = build_extractors(&cfg).err().unwrap();
    assert!(matches!(err, RegistryError::UnknownTemplateKind(_)));
}

#[test]
fn test_build_rejects_non_negative_tag_offset() {
    let cfg = ExtractorsConfig {
        templates: vec![ExtractorTemplate {
            offset: Some(1),
            ..ExtractorTemplate::tag(-1)
        }],
    };
    let err = build_extractors(&cfg).err().unwrap();
    assert!(matches!(err, RegistryError::InvalidTemplate { .. }));
}

#[test]
fn test_build_rejects_missing_field() {
    let cfg = ExtractorsConfig {
        templates: vec![ExtractorTemplate {
            offset: None,
            ..ExtractorTemplate::word(0)
        }],
    };
    let err = build_extractors(&cfg).err().unwrap();
    assert!(matches!(err, RegistryError::InvalidTemplate { .. }));
}
