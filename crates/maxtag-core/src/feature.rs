//! Feature identity for the log-linear model.
//!
//! A trained parameter is identified by a triple: which extractor produced
//! it, the string value it extracted, and the tag it is paired with.
//! [`FeatureKey`] is the immutable identity used as a map key and as the
//! persisted record; [`ScratchKey`] is a reusable accumulator for tight
//! counting loops, converted to a [`FeatureKey`] before it enters any shared
//! structure.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};

use crate::codec::{self, CodecError};

/// Deterministic 31-multiplier string hash.
///
/// Stable across processes and platforms, unlike the randomized std hasher,
/// so the mixed key hash is reproducible if hash layout is ever persisted
/// alongside a trained model.
fn string_hash(s: &str) -> i32 {
    let mut h: i32 = 0;
    for c in s.chars() {
        h = h.wrapping_mul(31).wrapping_add(c as i32);
    }
    h
}

/// The identity of one trainable feature: `(extractor index, extracted
/// value, tag)`.
///
/// Structural equality on all three fields. The hash mixes bit-rotations of
/// the fields so that keys differing in a single field land far apart:
/// `rotate_left(num, 16) ^ rotate_left(hash(val), 5) ^ hash(tag)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureKey {
    num: i32,
    val: String,
    tag: String,
}

impl FeatureKey {
    /// Create a key from its three components.
    pub fn new(num: i32, val: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            num,
            val: val.into(),
            tag: tag.into(),
        }
    }

    /// Index of the extractor that produced the value.
    pub fn num(&self) -> i32 {
        self.num
    }

    /// The extracted feature value.
    pub fn val(&self) -> &str {
        &self.val
    }

    /// The tag this feature is paired with.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The mixed 32-bit hash of this key.
    ///
    /// The rotation constants must not change: the mixing is part of the
    /// model-compatibility surface should hash layout ever be serialized.
    pub fn mixed_hash(&self) -> i32 {
        self.num.rotate_left(16) ^ string_hash(&self.val).rotate_left(5) ^ string_hash(&self.tag)
    }

    /// Encode as `i32 num | utf8 val | utf8 tag`, big-endian, no padding.
    pub fn write_to(&self, w: &mut impl Write) -> Result<(), CodecError> {
        codec::write_i32(w, self.num)?;
        codec::write_utf(w, &self.val)?;
        codec::write_utf(w, &self.tag)
    }

    /// Decode a key previously written by [`FeatureKey::write_to`].
    pub fn read_from(r: &mut impl Read) -> Result<Self, CodecError> {
        let num = codec::read_i32(r)?;
        let val = codec::read_utf(r)?;
        let tag = codec::read_utf(r)?;
        Ok(Self { num, val, tag })
    }
}

impl Hash for FeatureKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.mixed_hash());
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.num, self.val, self.tag)
    }
}

/// Reusable feature-key accumulator for a single counting thread.
///
/// `set` rewrites the fields in place, reusing the string allocations, so a
/// tight loop over `(extractor, value, tag)` triples allocates only when a
/// key is actually interned via [`ScratchKey::to_key`]. Not thread-safe by
/// design: each counting worker owns its own scratch key and publishes only
/// immutable [`FeatureKey`]s into shared structures.
#[derive(Debug)]
pub struct ScratchKey {
    key: FeatureKey,
}

impl ScratchKey {
    /// Create an empty scratch key.
    pub fn new() -> Self {
        Self {
            key: FeatureKey::new(0, "", ""),
        }
    }

    /// Overwrite all three fields in place.
    pub fn set(&mut self, num: i32, val: &str, tag: &str) {
        self.key.num = num;
        self.key.val.clear();
        self.key.val.push_str(val);
        self.key.tag.clear();
        self.key.tag.push_str(tag);
    }

    /// Overwrite only the tag, keeping extractor index and value.
    ///
    /// Counting loops iterate the candidate tags for a fixed extracted
    /// value, so this is the hot path.
    pub fn set_tag(&mut self, tag: &str) {
        self.key.tag.clear();
        self.key.tag.push_str(tag);
    }

    /// Borrow the current triple as an immutable key, e.g. for map lookups.
    pub fn as_key(&self) -> &FeatureKey {
        &self.key
    }

    /// Clone the current triple into an owned key for insertion into a
    /// shared structure.
    pub fn to_key(&self) -> FeatureKey {
        self.key.clone()
    }
}

impl Default for ScratchKey {
    fn default() -> Self {
        Self::new()
    }
}
