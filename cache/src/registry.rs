use std::any::{Any, TypeId};

use dashmap::DashMap;

use crate::{Cache, Invalidation, cache_any::CacheAny};

#[derive(thiserror::Error, Debug)]
#[error("cache namespace `{namespace}` type conflict: existing={existing:?}, new={new:?}")]
pub struct CacheTypeConflictError {
    pub namespace: &'static str,
    pub existing: TypeId,
    pub new: TypeId,
}

/// One cache per namespace (= one per memoized read function).
///
/// Owned by whoever builds the application state and passed by reference;
/// invalidations fan out to every namespace because a write does not know
/// which read functions declared its tags.
pub struct CacheRegistry {
    caches: DashMap<&'static str, (TypeId, Box<dyn CacheAny + Send + Sync>)>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self {
            caches: DashMap::new(),
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(%namespace), skip_all)
    )]
    pub fn ensure_cache<C>(
        &self,
        namespace: &'static str,
        cache_init: impl FnOnce() -> C,
    ) -> Result<(), CacheTypeConflictError>
    where
        C: Cache + Send + Sync + 'static,
    {
        let new_id = TypeId::of::<C>();

        match self.caches.entry(namespace) {
            dashmap::Entry::Occupied(entry) => {
                let (existing_id, _) = entry.get();

                match *existing_id == new_id {
                    true => Ok(()),
                    false => Err(CacheTypeConflictError {
                        namespace,
                        existing: *existing_id,
                        new: new_id,
                    }),
                }
            }
            dashmap::Entry::Vacant(entry) => {
                entry.insert((new_id, Box::new(cache_init())));

                #[cfg(feature = "tracing")]
                tracing::debug!("new cache initialized");

                Ok(())
            }
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(%namespace), skip_all)
    )]
    pub fn get<K, V>(&self, namespace: &'static str, key: &K) -> Option<V>
    where
        K: 'static,
        V: 'static,
    {
        self.caches
            .get(namespace)
            .or_else(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!("namespace not found");

                None
            })?
            .1
            .get_any(key as &dyn Any)?
            .downcast::<V>()
            .inspect_err(|_| {
                #[cfg(feature = "tracing")]
                tracing::debug!("failed to downcast value to {}", std::any::type_name::<V>());
            })
            .ok()
            .map(|v| *v)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(%namespace), skip_all)
    )]
    pub fn put<K, V>(&self, namespace: &str, key: K, value: V, tags: Vec<crate::Tag>) -> bool
    where
        K: 'static,
        V: 'static,
    {
        match self.caches.get_mut(namespace) {
            Some(mut cache) => {
                cache.1.put_any(Box::new(key), Box::new(value), tags);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!("namespace not found");

                false
            }
        }
    }

    /// Applies `matching` to every namespace. Unknown tags are a no-op.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(?matching), skip_all)
    )]
    pub fn invalidate(&self, matching: &Invalidation) {
        for mut ref_ in self.caches.iter_mut() {
            ref_.value_mut().1.invalidate_any(matching);
        }
    }

    /// Drops every entry in every namespace. Shutdown / test hook.
    pub fn clear(&self) {
        for mut ref_ in self.caches.iter_mut() {
            ref_.value_mut().1.clear_any();
        }
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}
