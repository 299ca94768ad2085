//! Selector to signature resolution.
//!
//! A [`SelectorCache`] answers "which signatures hash to these 4 bytes" from
//! three tiers: a built-in table that is never overwritten, entries learned at
//! runtime, and a [`SelectorResolver`] consulted once per unknown selector.
//! Every outcome of a remote lookup is cached, including failures, which are
//! cached as an empty candidate list.

pub mod builtin;
pub mod directory;

pub use self::directory::{ConfigError, ResolverConfig, SignatureDirectory};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Errors raised by a remote resolver. The cache absorbs these.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// The request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The directory answered with a non-success status
    #[error("Directory returned status {0}")]
    Status(u16),

    /// The response body could not be decoded
    #[error("Invalid response body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Source of signatures for selectors missing from the cache.
pub trait SelectorResolver: Send + Sync {
    /// Look up every signature whose selector is `selector`.
    fn lookup(&self, selector: [u8; 4]) -> Result<Vec<String>, ResolverError>;
}

/// Resolver that knows nothing; the cache then only serves built-in entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineResolver;

impl SelectorResolver for OfflineResolver {
    fn lookup(&self, _selector: [u8; 4]) -> Result<Vec<String>, ResolverError> {
        Ok(Vec::new())
    }
}

/// Shared selector to candidate-signature store.
pub struct SelectorCache {
    builtin: HashMap<&'static str, Arc<[String]>>,
    runtime: RwLock<HashMap<String, Arc<[String]>>>,
    resolver: Box<dyn SelectorResolver>,
    remote_lookups: AtomicUsize,
}

impl SelectorCache {
    /// Cache backed by `resolver` for selectors it does not know yet.
    pub fn with_resolver(resolver: Box<dyn SelectorResolver>) -> Self {
        let builtin = builtin::SELECTORS
            .iter()
            .map(|(selector, sigs)| {
                let sigs: Arc<[String]> = sigs.iter().map(|s| s.to_string()).collect();
                (*selector, sigs)
            })
            .collect();

        Self {
            builtin,
            runtime: RwLock::new(HashMap::new()),
            resolver,
            remote_lookups: AtomicUsize::new(0),
        }
    }

    /// Cache that never leaves the process.
    pub fn offline() -> Self {
        Self::with_resolver(Box::new(OfflineResolver))
    }

    /// Cache resolving misses through the public signature directory.
    pub fn online(config: ResolverConfig) -> Self {
        Self::with_resolver(Box::new(SignatureDirectory::new(config)))
    }

    /// Candidate signatures for `selector`, possibly empty.
    ///
    /// A miss triggers one resolver call whose outcome is stored permanently.
    /// Two threads missing on the same selector may both call the resolver;
    /// the first stored answer wins.
    pub fn resolve(&self, selector: [u8; 4]) -> Arc<[String]> {
        let key = hex::encode(selector);
        if let Some(sigs) = self.lookup_cached(&key) {
            return sigs;
        }

        self.remote_lookups.fetch_add(1, Ordering::Relaxed);
        let sigs: Arc<[String]> = match self.resolver.lookup(selector) {
            Ok(sigs) => {
                log::debug!("Resolved selector {} to {} signatures", key, sigs.len());
                sigs.into()
            }
            Err(err) => {
                log::warn!("Failed to resolve selector {}: {}", key, err);
                Arc::from(Vec::new())
            }
        };

        let mut runtime = self.runtime.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(runtime.entry(key).or_insert(sigs))
    }

    /// Candidates already known for `selector`, without consulting the resolver.
    pub fn cached(&self, selector: [u8; 4]) -> Option<Arc<[String]>> {
        self.lookup_cached(&hex::encode(selector))
    }

    fn lookup_cached(&self, key: &str) -> Option<Arc<[String]>> {
        if let Some(sigs) = self.builtin.get(key) {
            return Some(Arc::clone(sigs));
        }
        let runtime = self.runtime.read().unwrap_or_else(PoisonError::into_inner);
        runtime.get(key).map(Arc::clone)
    }

    /// Number of selectors known, built-in and learned
    pub fn len(&self) -> usize {
        let runtime = self.runtime.read().unwrap_or_else(PoisonError::into_inner);
        self.builtin.len() + runtime.len()
    }

    /// Returns true if no selector is known
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of resolver calls made so far
    pub fn remote_lookups(&self) -> usize {
        self.remote_lookups.load(Ordering::Relaxed)
    }
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::online(ResolverConfig::default())
    }
}

impl std::fmt::Debug for SelectorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorCache")
            .field("known", &self.len())
            .field("remote_lookups", &self.remote_lookups())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    /// Resolver answering from a fixed table and recording every call.
    #[derive(Default)]
    pub(crate) struct MockResolver {
        pub answers: HashMap<[u8; 4], Vec<String>>,
        pub calls: Arc<Mutex<Vec<[u8; 4]>>>,
    }

    impl MockResolver {
        pub(crate) fn with(selector: [u8; 4], sigs: &[&str]) -> Self {
            let mut resolver = Self::default();
            resolver
                .answers
                .insert(selector, sigs.iter().map(|s| s.to_string()).collect());
            resolver
        }
    }

    impl SelectorResolver for MockResolver {
        fn lookup(&self, selector: [u8; 4]) -> Result<Vec<String>, ResolverError> {
            self.calls.lock().unwrap().push(selector);
            Ok(self.answers.get(&selector).cloned().unwrap_or_default())
        }
    }

    struct FailingResolver;

    impl SelectorResolver for FailingResolver {
        fn lookup(&self, _selector: [u8; 4]) -> Result<Vec<String>, ResolverError> {
            Err(ResolverError::Status(503))
        }
    }

    #[test]
    fn test_builtin_entries_skip_resolver() {
        let cache = SelectorCache::with_resolver(Box::new(FailingResolver));
        let sigs = cache.resolve([0x18, 0x16, 0x0d, 0xdd]);
        assert_eq!(sigs.last().map(String::as_str), Some("totalSupply()"));
        assert_eq!(sigs.len(), 3);
        assert_eq!(cache.remote_lookups(), 0);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = MockResolver::with([0xde, 0xad, 0xbe, 0xef], &["frobnicate(uint256)"]);
        let calls = Arc::clone(&resolver.calls);
        let cache = SelectorCache::with_resolver(Box::new(resolver));

        let first = cache.resolve([0xde, 0xad, 0xbe, 0xef]);
        let second = cache.resolve([0xde, 0xad, 0xbe, 0xef]);

        assert_eq!(first, second);
        assert_eq!(&*first, &["frobnicate(uint256)".to_string()]);
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(cache.remote_lookups(), 1);
    }

    #[test]
    fn test_failures_are_cached_empty() {
        let cache = SelectorCache::with_resolver(Box::new(FailingResolver));
        assert!(cache.cached([1, 2, 3, 4]).is_none());

        assert!(cache.resolve([1, 2, 3, 4]).is_empty());
        assert!(cache.resolve([1, 2, 3, 4]).is_empty());

        assert_eq!(cache.remote_lookups(), 1);
        assert_eq!(cache.cached([1, 2, 3, 4]).map(|s| s.len()), Some(0));
    }

    #[test]
    fn test_len_grows_with_runtime_entries() {
        let cache = SelectorCache::offline();
        let before = cache.len();
        assert_eq!(before, builtin::SELECTORS.len());

        cache.resolve([9, 9, 9, 9]);
        cache.resolve([9, 9, 9, 9]);
        assert_eq!(cache.len(), before + 1);
    }

    #[test]
    fn test_concurrent_resolution() {
        let resolver = MockResolver::with([0xca, 0xfe, 0xba, 0xbe], &["a()", "b()"]);
        let cache = Arc::new(SelectorCache::with_resolver(Box::new(resolver)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.resolve([0xca, 0xfe, 0xba, 0xbe]))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for sigs in &results {
            assert_eq!(&**sigs, &["a()".to_string(), "b()".to_string()]);
        }
        // racing misses may each reach the resolver, but only one entry is stored
        assert!(cache.remote_lookups() >= 1);
        assert_eq!(cache.len(), builtin::SELECTORS.len() + 1);
    }
}
