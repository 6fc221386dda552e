//! Fuzz target for the feature-key binary decoder.
//!
//! Run with: cargo +nightly fuzz run fuzz_feature_key_read
//!
//! Decodes a stream of feature-key records from arbitrary bytes; every
//! record must either decode cleanly or fail with a structured error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use maxtag_core::FeatureKey;

fuzz_target!(|data: &[u8]| {
    let mut cursor = data;
    while !cursor.is_empty() {
        if FeatureKey::read_from(&mut cursor).is_err() {
            break;
        }
    }
});
