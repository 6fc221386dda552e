//! Tag vocabulary: dense tag ids, open/closed word classes, and the
//! deterministic tag-expansion heuristic.
//!
//! Tags are assigned dense ids in insertion order; ids are never reused and
//! the vocabulary only grows. A closed-class tag is one whose full word
//! vocabulary is assumed fixed (determiners, pronouns, punctuation), in
//! contrast to open classes (nouns, most verbs) where unseen words are
//! expected. The closed set is seeded from a per-language preset table and
//! refined either by explicit configuration or by frequency-threshold
//! learning from training data.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use crate::codec::{self, CodecError};

/// Sentence-boundary word, yielded by out-of-window word reads.
pub const EOS_WORD: &str = ".$.";

/// Sentence-boundary tag, yielded by out-of-window tag reads and carried in
/// every non-empty closed-class preset.
pub const EOS_TAG: &str = ".$$.";

/// Default number of distinct token types below which a tag is considered
/// closed when learning closed classes from training data. Purposely
/// conservative.
pub const DEFAULT_CLOSED_TAG_THRESHOLD: usize = 40;

const ENGLISH_CLOSED: &[&str] = &[
    ".", ",", "``", "''", ":", "$", "EX", "(", ")", "#", "MD", "CC", "DT", "LS", "PDT", "POS",
    "PRP", "PRP$", "RP", "TO", EOS_TAG, "UH", "WDT", "WP", "WP$", "WRB", "-LRB-", "-RRB-",
];

const POLISH_CLOSED: &[&str] = &[
    ".", ",", "``", "''", ":", "$", "(", ")", "#", "POS", EOS_TAG, "ppron12", "ppron3", "siebie",
    "qub", "conj",
];

// Chinese Treebank 5 tag set
const CHINESE_CLOSED: &[&str] = &[
    "AS", "BA", "CC", "CS", "DEC", "DEG", "DER", "DEV", "DT", "ETC", "IJ", "LB", "LC", "P", "PN",
    "PU", "SB", "SP", "VC", "VE",
];

// Kulick tag set; only tags that are complete sets in the training data
const ARABIC_CLOSED: &[&str] = &["PUNC", "CC", "CPRP$", EOS_TAG];

// STTS tag set. Restricted to closed German tags whose full word lists
// actually occur in the negra-tigra training data.
const GERMAN_CLOSED: &[&str] = &[
    "$,", "$.", "$(", "--", EOS_TAG, "KOKOM", "PPOSS", "PTKA", "PTKNEG", "PWAT", "VAINF", "VAPP",
    "VMINF", "VMPP",
];

// French treebank: only the punctuation tags are reliably closed.
const FRENCH_CLOSED: &[&str] = &[
    "!", "\"", "*", ",", "-", "-LRB-", "-RRB-", ".", "...", "/", ":", ";", "=", "?", "[", "]",
];

const MEDPOST_CLOSED: &[&str] = &[
    ".", ",", "``", "''", ":", "$", "EX", "(", ")", "VM", "CC", "DD", "DB", "GE", "PND", "PNG",
    "TO", EOS_TAG, "-LRB-", "-RRB-",
];

const NEUTRAL_CLOSED: &[&str] = &[];

/// A language with a built-in closed-class tag preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Polish,
    Chinese,
    Arabic,
    German,
    French,
    Medpost,
    /// No preset; all classes start open.
    Neutral,
}

/// Error for a language name with no preset table entry.
#[derive(Debug, thiserror::Error)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" => Ok(Self::English),
            "polish" => Ok(Self::Polish),
            "chinese" => Ok(Self::Chinese),
            "arabic" => Ok(Self::Arabic),
            "german" => Ok(Self::German),
            "french" => Ok(Self::French),
            "medpost" => Ok(Self::Medpost),
            "" => Ok(Self::Neutral),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

impl Language {
    /// All supported languages, preset order.
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Polish,
        Language::Chinese,
        Language::Arabic,
        Language::German,
        Language::French,
        Language::Medpost,
        Language::Neutral,
    ];

    /// The canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Polish => "polish",
            Self::Chinese => "chinese",
            Self::Arabic => "arabic",
            Self::German => "german",
            Self::French => "french",
            Self::Medpost => "medpost",
            Self::Neutral => "",
        }
    }

    /// The built-in closed-class tag preset for this language.
    ///
    /// Pure data: adding a language is a table change, not a code change.
    pub fn closed_class_preset(self) -> &'static [&'static str] {
        match self {
            Self::English => ENGLISH_CLOSED,
            Self::Polish => POLISH_CLOSED,
            Self::Chinese => CHINESE_CLOSED,
            Self::Arabic => ARABIC_CLOSED,
            Self::German => GERMAN_CLOSED,
            Self::French => FRENCH_CLOSED,
            Self::Medpost => MEDPOST_CLOSED,
            Self::Neutral => NEUTRAL_CLOSED,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from building a vocabulary out of configuration.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error(transparent)]
    UnknownLanguage(#[from] UnknownLanguage),

    #[error("open_class_tags and closed_class_tags are mutually exclusive")]
    ConflictingClassLists,
}

/// The tag vocabulary: a bijective tag ↔ id index plus open/closed class
/// bookkeeping.
///
/// Population (training, config, or load from disk) happens through `&mut`
/// methods before decoding begins; afterwards the vocabulary is read through
/// shared references only. The derived open-tag set is memoized in a
/// [`OnceLock`] that is re-armed by every mutation, so first access from
/// concurrent readers is race-free and never stale.
#[derive(Debug)]
pub struct TagVocabulary {
    index: Vec<String>,
    ids: HashMap<String, usize>,
    closed: HashSet<String>,
    /// Exhaustive open set. `Some` switches classification to "closed =
    /// not open"; the stored closed set is then ignored.
    fixed_open: Option<HashSet<String>>,
    open_cache: OnceLock<HashSet<String>>,
    language: Language,
    closed_tag_threshold: usize,
}

impl TagVocabulary {
    /// Create an empty vocabulary with the given language's closed-class
    /// preset.
    ///
    /// Preset tags seed only the closed set; they get ids when first seen
    /// via [`TagVocabulary::add`].
    pub fn new(language: Language) -> Self {
        Self {
            index: Vec::new(),
            ids: HashMap::new(),
            closed: language
                .closed_class_preset()
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            fixed_open: None,
            open_cache: OnceLock::new(),
            language,
            closed_tag_threshold: DEFAULT_CLOSED_TAG_THRESHOLD,
        }
    }

    /// Build a vocabulary from the `[tags]` configuration section: language
    /// preset first, then explicit open or closed class lists.
    pub fn from_config(cfg: &maxtag_config::TagsConfig) -> Result<Self, VocabularyError> {
        let language: Language = cfg.language.parse()?;
        if !cfg.open_class_tags.is_empty() && !cfg.closed_class_tags.is_empty() {
            return Err(VocabularyError::ConflictingClassLists);
        }

        let mut vocabulary = Self::new(language);
        vocabulary.closed_tag_threshold = cfg.closed_tag_threshold;
        if !cfg.open_class_tags.is_empty() {
            vocabulary.set_open_class_tags(cfg.open_class_tags.iter().map(String::as_str));
        } else {
            vocabulary.set_closed_class_tags(cfg.closed_class_tags.iter().map(String::as_str));
        }
        Ok(vocabulary)
    }

    /// The language this vocabulary was built for.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no tags are registered yet.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Register a tag, returning its id.
    ///
    /// Idempotent: an already-registered tag keeps its existing id.
    pub fn add(&mut self, tag: &str) -> usize {
        if let Some(&id) = self.ids.get(tag) {
            return id;
        }
        let id = self.index.len();
        self.index.push(tag.to_string());
        self.ids.insert(tag.to_string(), id);
        self.invalidate_open_cache();
        id
    }

    /// The tag with the given id, if any.
    pub fn tag(&self, id: usize) -> Option<&str> {
        self.index.get(id).map(String::as_str)
    }

    /// The id of the given tag, or `None` if it is not registered.
    ///
    /// Candidate-tag generation routinely probes for tags that may not
    /// exist, so an unknown tag is not an error.
    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.ids.get(tag).copied()
    }

    /// Registered tags in id order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.index.iter().map(String::as_str)
    }

    /// Whether the given tag is closed-class.
    pub fn is_closed(&self, tag: &str) -> bool {
        match &self.fixed_open {
            Some(open) => !open.contains(tag),
            None => self.closed.contains(tag),
        }
    }

    /// Register a tag and mark it closed-class.
    pub fn mark_closed(&mut self, tag: &str) {
        self.add(tag);
        self.closed.insert(tag.to_string());
        self.invalidate_open_cache();
    }

    /// Mark each given tag closed (additive).
    pub fn set_closed_class_tags<'a, I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for tag in tags {
            self.mark_closed(tag);
        }
    }

    /// Fix the open-class set to exactly the given tags.
    ///
    /// The tags are registered, and the vocabulary switches to treating
    /// every other tag as closed.
    pub fn set_open_class_tags<'a, I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut open = HashSet::new();
        for tag in tags {
            self.add(tag);
            open.insert(tag.to_string());
        }
        self.fixed_open = Some(open);
        self.invalidate_open_cache();
    }

    /// The set of open-class tags.
    ///
    /// In fixed-open mode this is the configured set; otherwise it is the
    /// registered vocabulary minus the closed set, memoized until the next
    /// mutation.
    pub fn open_tags(&self) -> &HashSet<String> {
        if let Some(open) = &self.fixed_open {
            return open;
        }
        self.open_cache.get_or_init(|| {
            self.index
                .iter()
                .filter(|tag| !self.closed.contains(*tag))
                .cloned()
                .collect()
        })
    }

    /// The threshold used by [`TagVocabulary::learn_closed_tags`].
    pub fn closed_tag_threshold(&self) -> usize {
        self.closed_tag_threshold
    }

    /// Set the closed-tag learning threshold.
    pub fn set_closed_tag_threshold(&mut self, threshold: usize) {
        self.closed_tag_threshold = threshold;
    }

    /// Mark closed every registered tag observed with fewer distinct token
    /// types than the threshold.
    ///
    /// `tag_tokens` maps each tag to the set of distinct tokens it was seen
    /// with during training; a tag absent from the table counts as zero.
    /// Applied once after training-time population, before the vocabulary is
    /// persisted.
    pub fn learn_closed_tags(&mut self, tag_tokens: &HashMap<String, HashSet<String>>) {
        let threshold = self.closed_tag_threshold;
        let rare: Vec<String> = self
            .index
            .iter()
            .filter(|tag| tag_tokens.get(*tag).map_or(0, HashSet::len) < threshold)
            .cloned()
            .collect();
        for tag in &rare {
            self.mark_closed(tag);
        }
        debug!(
            learned = rare.len(),
            threshold, "learned closed tags from token-type counts"
        );
    }

    /// Deterministically complete unbalanced verb-form pairs in a candidate
    /// tag set. English only; the identity function for other languages.
    ///
    /// If exactly one of {VBD, VBN} is present the missing one is appended,
    /// and independently for {VB, VBP}. Candidate-tag generation for
    /// unknown or rare words is imprecise for these inflections, and the
    /// symmetric completion improves decoding recall without per-word
    /// training data.
    pub fn deterministically_expand_tags<'a>(&self, tags: &'a [String]) -> Cow<'a, [String]> {
        if self.language != Language::English {
            return Cow::Borrowed(tags);
        }

        let mut seen_vbd = false;
        let mut seen_vbn = false;
        let mut seen_vb = false;
        let mut seen_vbp = false;
        for tag in tags {
            match tag.as_str() {
                "VBD" => seen_vbd = true,
                "VBN" => seen_vbn = true,
                "VB" => seen_vb = true,
                "VBP" => seen_vbp = true,
                _ => {}
            }
        }

        let complete_past = seen_vbd ^ seen_vbn;
        let complete_base = seen_vb ^ seen_vbp;
        if !complete_past && !complete_base {
            return Cow::Borrowed(tags);
        }

        let mut expanded = tags.to_vec();
        if complete_past {
            expanded.push(if seen_vbd { "VBN" } else { "VBD" }.to_string());
        }
        if complete_base {
            expanded.push(if seen_vb { "VBP" } else { "VB" }.to_string());
        }
        Cow::Owned(expanded)
    }

    /// Encode as `i32 count` followed by `count` records of
    /// `utf8 tag | bool closed`, in id order.
    pub fn write_to(&self, w: &mut impl Write) -> Result<(), CodecError> {
        codec::write_i32(w, self.index.len() as i32)?;
        for tag in &self.index {
            codec::write_utf(w, tag)?;
            codec::write_bool(w, self.is_closed(tag))?;
        }
        Ok(())
    }

    /// Decode a vocabulary previously written by [`TagVocabulary::write_to`].
    ///
    /// Records are replayed in order, so ids are stable across save/load
    /// round-trips. A truncated or invalid stream fails without producing a
    /// partially populated vocabulary.
    pub fn read_from(r: &mut impl Read, language: Language) -> Result<Self, CodecError> {
        let count = codec::read_i32(r)?;
        if count < 0 {
            return Err(CodecError::Corrupt(format!("negative tag count {count}")));
        }

        let mut vocabulary = Self::new(language);
        for _ in 0..count {
            let tag = codec::read_utf(r)?;
            let closed = codec::read_bool(r)?;
            if closed {
                vocabulary.mark_closed(&tag);
            } else {
                vocabulary.add(&tag);
            }
        }
        debug!(tags = vocabulary.len(), %language, "loaded tag vocabulary");
        Ok(vocabulary)
    }

    /// A serializable summary for inspection tooling.
    pub fn summary(&self) -> VocabularySummary {
        VocabularySummary {
            language: self.language,
            size: self.len(),
            tags: self
                .index
                .iter()
                .enumerate()
                .map(|(id, tag)| TagSummary {
                    id,
                    tag: tag.clone(),
                    closed: self.is_closed(tag),
                })
                .collect(),
        }
    }

    fn invalidate_open_cache(&mut self) {
        self.open_cache = OnceLock::new();
    }
}

/// Snapshot of a vocabulary for display or JSON output.
#[derive(Debug, Serialize)]
pub struct VocabularySummary {
    pub language: Language,
    pub size: usize,
    pub tags: Vec<TagSummary>,
}

/// One tag row in a [`VocabularySummary`].
#[derive(Debug, Serialize)]
pub struct TagSummary {
    pub id: usize,
    pub tag: String,
    pub closed: bool,
}
