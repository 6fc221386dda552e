//! Vocabulary fixtures for tests.

use maxtag_core::{Language, TagVocabulary};

/// A representative subset of the Penn Treebank tag set, in a fixed order.
pub const PENN_TAGS: &[&str] = &[
    "NN", "NNS", "NNP", "VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "JJ", "RB", "DT", "IN", "PRP",
    "CC", "MD", "TO", ".", ",",
];

/// An English vocabulary populated with [`PENN_TAGS`].
pub fn english_vocabulary() -> TagVocabulary {
    let mut vocabulary = TagVocabulary::new(Language::English);
    for tag in PENN_TAGS {
        vocabulary.add(tag);
    }
    vocabulary
}

/// A small neutral-language vocabulary with no preset closed classes.
pub fn tiny_vocabulary() -> TagVocabulary {
    let mut vocabulary = TagVocabulary::new(Language::Neutral);
    for tag in ["A", "B", "C"] {
        vocabulary.add(tag);
    }
    vocabulary
}
