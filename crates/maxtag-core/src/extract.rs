//! Extractor capability trait and the partitioned registry.
//!
//! The registry owns an ordered set of feature extractors and groups them by
//! the kind of context each one reads: *local* (the current position only),
//! *local-context* (surrounding raw words), or *dynamic* (tags assigned
//! earlier in the decode). The partitions and the aggregate window radii are
//! computed once at construction, so a shared registry is read-only and safe
//! for concurrent decoding threads.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::window;

/// The tagging context a feature extractor reads from.
///
/// Offsets are relative to the current position. Reads outside the sentence
/// yield the boundary values [`crate::EOS_WORD`] and [`crate::EOS_TAG`].
pub trait Context {
    /// Word at `offset` relative to the current position.
    fn word(&self, offset: i32) -> &str;

    /// Tag previously assigned at strictly negative `offset`.
    fn tag(&self, offset: i32) -> &str;
}

/// One feature-extraction function together with its declared context needs.
///
/// `is_local` and `is_dynamic` are mutually exclusive: an extractor that
/// reads only the current word cannot also depend on assigned tags.
pub trait Extractor: Send + Sync {
    /// Short name used in logs and display output.
    fn name(&self) -> String;

    /// The feature string for the given context.
    fn extract(&self, context: &dyn Context) -> String;

    /// Whether this extractor reads only the current position.
    fn is_local(&self) -> bool {
        false
    }

    /// Whether this extractor reads previously assigned tags.
    fn is_dynamic(&self) -> bool {
        false
    }

    /// How many positions to the left of the current one this extractor
    /// needs.
    fn left_context(&self) -> usize {
        0
    }

    /// How many positions to the right of the current one this extractor
    /// needs.
    fn right_context(&self) -> usize {
        0
    }
}

/// Which partition an extractor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Reads only the current position.
    Local,
    /// Reads surrounding raw context but no assigned tags.
    LocalContext,
    /// Reads tags assigned earlier in the decode.
    Dynamic,
}

/// Errors from assembling an extractor registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A local extractor reads no assigned tags and a dynamic one must;
    /// an extractor claiming both has no unambiguous evaluation strategy.
    #[error("extractor {index} ({name}) cannot be both local and dynamic")]
    LocalAndDynamic { index: usize, name: String },

    #[error("unknown extractor template kind: {0:?}")]
    UnknownTemplateKind(String),

    #[error("extractor template {index}: {reason}")]
    InvalidTemplate { index: usize, reason: String },
}

/// An ordered, immutable set of feature extractors, partitioned by the kind
/// of context they read.
///
/// The partition entries carry each extractor's original index, since that
/// index is part of every [`crate::FeatureKey`] the extractor produces.
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
    local: Vec<(usize, Arc<dyn Extractor>)>,
    local_context: Vec<(usize, Arc<dyn Extractor>)>,
    dynamic: Vec<(usize, Arc<dyn Extractor>)>,
    left_context: usize,
    right_context: usize,
}

impl ExtractorRegistry {
    /// Build a registry from an ordered extractor sequence.
    ///
    /// Partitions and window radii are computed here, eagerly, so the
    /// registry is read-only afterwards. Fails if any extractor declares
    /// itself both local and dynamic.
    pub fn new(extractors: Vec<Arc<dyn Extractor>>) -> Result<Self, RegistryError> {
        let mut local = Vec::new();
        let mut local_context = Vec::new();
        let mut dynamic = Vec::new();

        for (index, extractor) in extractors.iter().enumerate() {
            if extractor.is_local() && extractor.is_dynamic() {
                return Err(RegistryError::LocalAndDynamic {
                    index,
                    name: extractor.name(),
                });
            }
            let entry = (index, Arc::clone(extractor));
            if extractor.is_local() {
                local.push(entry);
            } else if extractor.is_dynamic() {
                dynamic.push(entry);
            } else {
                local_context.push(entry);
            }
        }

        let left_context = extractors.iter().map(|e| e.left_context()).max().unwrap_or(0);
        let right_context = extractors
            .iter()
            .map(|e| e.right_context())
            .max()
            .unwrap_or(0);

        debug!(
            total = extractors.len(),
            local = local.len(),
            local_context = local_context.len(),
            dynamic = dynamic.len(),
            left_context,
            right_context,
            "built extractor registry"
        );

        Ok(Self {
            extractors,
            local,
            local_context,
            dynamic,
            left_context,
            right_context,
        })
    }

    /// Build a registry from the `[extractors]` configuration section.
    pub fn from_config(cfg: &maxtag_config::ExtractorsConfig) -> Result<Self, RegistryError> {
        Self::new(window::build_extractors(cfg)?)
    }

    /// Number of extractors.
    pub fn size(&self) -> usize {
        self.extractors.len()
    }

    /// Whether the registry holds no extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// The extractor at `index`, 0-indexed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `[0, size)`.
    pub fn get(&self, index: usize) -> &dyn Extractor {
        self.extractors[index].as_ref()
    }

    /// Run extractor `index` on the given context.
    pub fn extract(&self, index: usize, context: &dyn Context) -> String {
        self.extractors[index].extract(context)
    }

    /// Whether every extractor produces identical strings on both contexts.
    ///
    /// Used to detect feature-equivalent decoding states that can share
    /// cached scores; short-circuits on the first mismatch.
    pub fn contexts_equal(&self, a: &dyn Context, b: &dyn Context) -> bool {
        self.extractors
            .iter()
            .all(|extractor| extractor.extract(a) == extractor.extract(b))
    }

    /// Maximum left radius over all extractors; 0 for an empty registry.
    ///
    /// The decoder must keep this many previous positions live when scoring
    /// a transition.
    pub fn left_context(&self) -> usize {
        self.left_context
    }

    /// Maximum right radius over all extractors; 0 for an empty registry.
    pub fn right_context(&self) -> usize {
        self.right_context
    }

    /// Extractors reading only the current position, as
    /// `(original index, extractor)` pairs in registry order.
    pub fn local(&self) -> &[(usize, Arc<dyn Extractor>)] {
        &self.local
    }

    /// Extractors reading surrounding raw context, in registry order.
    pub fn local_context(&self) -> &[(usize, Arc<dyn Extractor>)] {
        &self.local_context
    }

    /// Extractors reading previously assigned tags, in registry order.
    pub fn dynamic(&self) -> &[(usize, Arc<dyn Extractor>)] {
        &self.dynamic
    }

    /// The partition the extractor at `index` belongs to.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `[0, size)`.
    pub fn kind_of(&self, index: usize) -> ExtractorKind {
        let extractor = self.get(index);
        if extractor.is_local() {
            ExtractorKind::Local
        } else if extractor.is_dynamic() {
            ExtractorKind::Dynamic
        } else {
            ExtractorKind::LocalContext
        }
    }
}

impl fmt::Display for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, extractor) in self.extractors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", extractor.name())?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("size", &self.size())
            .field("local", &self.local.len())
            .field("local_context", &self.local_context.len())
            .field("dynamic", &self.dynamic.len())
            .field("left_context", &self.left_context)
            .field("right_context", &self.right_context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Test extractor with fully configurable declared behaviour.
    struct Probe {
        name: &'static str,
        local: bool,
        dynamic: bool,
        left: usize,
        right: usize,
    }

    impl Probe {
        fn local(name: &'static str) -> Arc<dyn Extractor> {
            Arc::new(Self {
                name,
                local: true,
                dynamic: false,
                left: 0,
                right: 0,
            })
        }

        fn context(name: &'static str, left: usize, right: usize) -> Arc<dyn Extractor> {
            Arc::new(Self {
                name,
                local: false,
                dynamic: false,
                left,
                right,
            })
        }

        fn dynamic(name: &'static str, left: usize) -> Arc<dyn Extractor> {
            Arc::new(Self {
                name,
                local: false,
                dynamic: true,
                left,
                right: 0,
            })
        }
    }

    impl Extractor for Probe {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn extract(&self, context: &dyn Context) -> String {
            format!("{}={}", self.name, context.word(0))
        }

        fn is_local(&self) -> bool {
            self.local
        }

        fn is_dynamic(&self) -> bool {
            self.dynamic
        }

        fn left_context(&self) -> usize {
            self.left
        }

        fn right_context(&self) -> usize {
            self.right
        }
    }

    /// Context that answers every read with a fixed word.
    struct FixedContext(&'static str);

    impl Context for FixedContext {
        fn word(&self, _offset: i32) -> &str {
            self.0
        }

        fn tag(&self, _offset: i32) -> &str {
            self.0
        }
    }

    fn sample_registry() -> ExtractorRegistry {
        ExtractorRegistry::new(vec![
            Probe::local("w0"),
            Probe::context("w-1", 1, 0),
            Probe::dynamic("t-2", 2),
            Probe::local("suffix"),
            Probe::context("w+1", 0, 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_partitions_cover_and_are_disjoint() {
        let registry = sample_registry();

        let mut seen: Vec<usize> = registry
            .local()
            .iter()
            .chain(registry.local_context())
            .chain(registry.dynamic())
            .map(|(index, _)| *index)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);

        assert_eq!(
            registry.local().len() + registry.local_context().len() + registry.dynamic().len(),
            registry.size()
        );
    }

    #[test]
    fn test_partition_order_is_insertion_order() {
        let registry = sample_registry();

        let locals: Vec<usize> = registry.local().iter().map(|(i, _)| *i).collect();
        assert_eq!(locals, vec![0, 3]);

        let contexts: Vec<usize> = registry.local_context().iter().map(|(i, _)| *i).collect();
        assert_eq!(contexts, vec![1, 4]);
    }

    #[test]
    fn test_kind_of() {
        let registry = sample_registry();
        assert_eq!(registry.kind_of(0), ExtractorKind::Local);
        assert_eq!(registry.kind_of(1), ExtractorKind::LocalContext);
        assert_eq!(registry.kind_of(2), ExtractorKind::Dynamic);
    }

    #[test]
    fn test_local_and_dynamic_is_rejected() {
        let bad: Arc<dyn Extractor> = Arc::new(Probe {
            name: "bad",
            local: true,
            dynamic: true,
            left: 0,
            right: 0,
        });

        let err = ExtractorRegistry::new(vec![Probe::local("ok"), bad]).unwrap_err();
        match err {
            RegistryError::LocalAndDynamic { index, name } => {
                assert_eq!(index, 1);
                assert_eq!(name, "bad");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_window_radii_are_maxima() {
        let registry = sample_registry();
        assert_eq!(registry.left_context(), 2);
        assert_eq!(registry.right_context(), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ExtractorRegistry::new(Vec::new()).unwrap();
        assert_eq!(registry.size(), 0);
        assert!(registry.is_empty());
        assert_eq!(registry.left_context(), 0);
        assert_eq!(registry.right_context(), 0);
        assert_eq!(registry.to_string(), "[]");
    }

    #[test]
    fn test_extract_dispatches_by_index() {
        let registry = sample_registry();
        let context = FixedContext("cat");
        assert_eq!(registry.extract(0, &context), "w0=cat");
        assert_eq!(registry.extract(4, &context), "w+1=cat");
        assert_eq!(registry.get(2).name(), "t-2");
    }

    #[test]
    fn test_contexts_equal_is_reflexive() {
        let registry = sample_registry();
        let context = FixedContext("cat");
        assert!(registry.contexts_equal(&context, &context));
    }

    #[test]
    fn test_contexts_equal_detects_mismatch() {
        let registry = sample_registry();
        assert!(!registry.contexts_equal(&FixedContext("cat"), &FixedContext("dog")));
    }

    #[test]
    fn test_contexts_equal_on_empty_registry() {
        let registry = ExtractorRegistry::new(Vec::new()).unwrap();
        assert!(registry.contexts_equal(&FixedContext("a"), &FixedContext("b")));
    }

    #[test]
    fn test_display_lists_names() {
        let registry = sample_registry();
        assert_eq!(registry.to_string(), "[w0, w-1, t-2, suffix, w+1]");
    }
}
