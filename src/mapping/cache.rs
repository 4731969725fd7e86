use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::metadata::ClassMetadata;
use crate::entity::ClassId;
use crate::error::Error;

/// Identity of the provider and rule kinds a factory builds metadata from.
///
/// Each factory gets a fresh scope at construction; clones keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FactoryScope(u64);

impl FactoryScope {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Thread-safe store of built class metadata.
///
/// The cache is an explicit object rather than global state: create it once,
/// share it through an `Arc` between factories, and drop it to discard
/// everything it holds.
///
/// Entries are keyed by class and by the factory that built them. Factories
/// sharing a cache never see each other's metadata, since their providers
/// and rule kinds may differ; clones of one factory share entries.
///
/// Metadata is built outside the lock. Concurrent first requests for the
/// same class may each build, but only the first stored instance is kept
/// and every caller receives it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rulefilter::{ClassMetadataFactory, MetadataCache};
///
/// let cache = Arc::new(MetadataCache::new());
/// let factory = ClassMetadataFactory::builtin().with_cache(Arc::clone(&cache));
/// assert!(cache.is_empty());
/// # let _ = factory;
/// ```
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<(FactoryScope, ClassId), Arc<ClassMetadata>>>,
}

impl MetadataCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, scope: FactoryScope, class: &ClassId) -> Option<Arc<ClassMetadata>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(scope, *class))
            .cloned()
    }

    /// Returns the metadata of `class` for `scope`, building and storing it
    /// with `build` on a miss. A failed build stores nothing.
    pub(crate) fn get_or_try_insert<F>(
        &self,
        scope: FactoryScope,
        class: &ClassId,
        build: F,
    ) -> Result<Arc<ClassMetadata>, Error>
    where
        F: FnOnce() -> Result<ClassMetadata, Error>,
    {
        if let Some(metadata) = self.get(scope, class) {
            tracing::trace!(class = %class, "class metadata cache hit");
            return Ok(metadata);
        }

        let built = Arc::new(build()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent build may have stored first; keep that one.
        let stored = entries.entry((scope, *class)).or_insert(built);
        Ok(Arc::clone(stored))
    }

    /// Returns `true` if any factory has cached metadata for `class`.
    pub fn contains(&self, class: &ClassId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .any(|(_, cached)| cached == class)
    }

    /// Drops the cached metadata of `class` for every factory. Returns `true`
    /// if anything was cached.
    pub fn invalidate(&self, class: &ClassId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(_, cached), _| cached != class);
        entries.len() != before
    }

    /// Drops all cached metadata.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Article, Plain};
    use crate::ErrorKind;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn cache_starts_empty() {
        let cache = MetadataCache::new();

        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert!(cache.get(FactoryScope::next(), &ClassId::of::<Article>()).is_none());
    }

    #[test]
    fn build_runs_once_per_class() {
        let cache = MetadataCache::new();
        let scope = FactoryScope::next();
        let class = ClassId::of::<Article>();
        let builds = AtomicUsize::new(0);
        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(ClassMetadata::new("Article"))
        };

        let first = cache.get_or_try_insert(scope, &class, build).unwrap();
        let second = cache.get_or_try_insert(scope, &class, build).unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains(&class));
    }

    #[test]
    fn scopes_do_not_share_entries() {
        let cache = MetadataCache::new();
        let class = ClassId::of::<Article>();
        let (first, second) = (FactoryScope::next(), FactoryScope::next());

        let a = cache
            .get_or_try_insert(first, &class, || Ok(ClassMetadata::new("first")))
            .unwrap();
        let b = cache
            .get_or_try_insert(second, &class, || Ok(ClassMetadata::new("second")))
            .unwrap();

        assert_eq!(a.class_name(), "first");
        assert_eq!(b.class_name(), "second");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let cache = MetadataCache::new();
        let class = ClassId::of::<Plain>();

        let error = cache
            .get_or_try_insert(FactoryScope::next(), &class, || {
                Err(Error::reflection("boom"))
            })
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ReflectionFailure);
        assert!(!cache.contains(&class));
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = MetadataCache::new();
        let article = ClassId::of::<Article>();
        let plain = ClassId::of::<Plain>();
        for scope in [FactoryScope::next(), FactoryScope::next()] {
            cache
                .get_or_try_insert(scope, &article, || Ok(ClassMetadata::new("Article")))
                .unwrap();
        }
        cache
            .get_or_try_insert(FactoryScope::next(), &plain, || {
                Ok(ClassMetadata::new("Plain"))
            })
            .unwrap();

        assert!(cache.invalidate(&article));
        assert!(!cache.invalidate(&article));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn nested_build_does_not_block() {
        let cache = MetadataCache::new();
        let scope = FactoryScope::next();

        let outer = cache
            .get_or_try_insert(scope, &ClassId::of::<Article>(), || {
                let inner = cache.get_or_try_insert(scope, &ClassId::of::<Plain>(), || {
                    Ok(ClassMetadata::new("Plain"))
                })?;
                assert_eq!(inner.class_name(), "Plain");
                Ok(ClassMetadata::new("Article"))
            })
            .unwrap();

        assert_eq!(outer.class_name(), "Article");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_first_requests_share_one_instance() {
        let cache = Arc::new(MetadataCache::new());
        let builds = Arc::new(AtomicUsize::new(0));
        let scope = FactoryScope::next();
        let class = ClassId::of::<Article>();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let builds = Arc::clone(&builds);
                thread::spawn(move || {
                    cache
                        .get_or_try_insert(scope, &class, || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            Ok(ClassMetadata::new("Article"))
                        })
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<Arc<ClassMetadata>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(builds.load(Ordering::SeqCst) >= 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }
}
