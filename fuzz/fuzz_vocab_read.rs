//! Fuzz target for the tag vocabulary binary decoder.
//!
//! Run with: cargo +nightly fuzz run fuzz_vocab_read
//!
//! This exercises `TagVocabulary::read_from()` with arbitrary byte sequences
//! to find panics, hangs, or memory issues in the persisted-state decoder.

#![no_main]

use libfuzzer_sys::fuzz_target;
use maxtag_core::{Language, TagVocabulary};

fuzz_target!(|data: &[u8]| {
    // We don't care about the result — just that it doesn't panic
    let mut cursor = data;
    let _ = TagVocabulary::read_from(&mut cursor, Language::English);
});
