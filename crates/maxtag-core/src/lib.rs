#![deny(unsafe_code)]

//! Feature-space management core of the maxtag part-of-speech tagger.
//!
//! Glue between the declarative feature set and the numeric log-linear
//! model:
//!
//! - [`ExtractorRegistry`] partitions feature extractors by the kind of
//!   context they read and derives the decoder's dynamic-programming window.
//! - [`FeatureKey`] identifies one trainable parameter — which extractor
//!   produced it, the value it extracted, and the tag it scores.
//! - [`TagVocabulary`] maps tags to dense ids and tracks which word classes
//!   are open or closed per language.
//!
//! All structures are populated on a single thread (from configuration,
//! training, or a persisted model) and then read concurrently by the
//! decoder; every derived view is either computed at construction or
//! memoized behind a once-cell, so shared reads are race-free.

/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Binary codec primitives shared by the persisted formats.
pub mod codec;
/// Extractor capability trait and the partitioned registry.
pub mod extract;
/// Feature identity: immutable keys and the reusable scratch accumulator.
pub mod feature;
/// Tag vocabulary, open/closed classes, and tag expansion.
pub mod tags;
/// Standard context-window extractors built from config templates.
pub mod window;

pub use codec::CodecError;
pub use extract::{Context, Extractor, ExtractorKind, ExtractorRegistry, RegistryError};
pub use feature::{FeatureKey, ScratchKey};
pub use tags::{
    EOS_TAG, EOS_WORD, Language, TagVocabulary, UnknownLanguage, VocabularyError,
};
