use std::sync::Arc;

use cache::{Cache, CacheRegistry, CacheTypeConflictError, Invalidation, Tag};
use sqlx::SqlitePool;

/// The seam between handlers and the relational store: reads go through the
/// tag-scoped cache, writes run first and then evict whatever their
/// invalidation requests match.
pub struct DataAccess {
    pool: SqlitePool,
    cache_registry: Arc<CacheRegistry>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Cache(#[from] CacheTypeConflictError),

    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DataAccess {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cache_registry: Arc::new(CacheRegistry::new()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Memoize `query` under `namespace`/`key`. A hit returns the stored
    /// value without touching the pool; a miss runs the query and stores the
    /// result together with its declared tags. Query errors propagate and
    /// nothing is stored for them.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", fields(%namespace), skip_all)
    )]
    pub async fn read<'conn, K, V, Fut, C>(
        &'conn self,
        query: impl FnOnce(&'conn SqlitePool) -> Fut,
        namespace: &'static str,
        key: K,
        tags: impl FnOnce(&V) -> Vec<Tag>,
        cache_init: impl FnOnce() -> C,
    ) -> Result<V, Error>
    where
        K: 'static,
        V: Clone + 'static,
        Fut: Future<Output = Result<V, sqlx::Error>>,
        C: Cache<Key = K, Value = V> + Send + Sync + 'static,
    {
        self.cache_registry.ensure_cache(namespace, cache_init)?;

        match self.cache_registry.get::<K, V>(namespace, &key) {
            Some(value) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("cache hit");

                Ok(value)
            }
            None => {
                let value = query(&self.pool).await?;
                self.cache_registry
                    .put(namespace, key, value.clone(), tags(&value));
                Ok(value)
            }
        }
    }

    /// Run a write statement, then apply its invalidation requests. The
    /// requests see the statement's result, so ids produced by inserts can
    /// qualify the eviction scope.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn write<'conn, V, Fut>(
        &'conn self,
        query: impl FnOnce(&'conn SqlitePool) -> Fut,
        invalidations: impl FnOnce(&V) -> Vec<Invalidation>,
    ) -> Result<V, Error>
    where
        Fut: Future<Output = Result<V, sqlx::Error>>,
        V: 'static,
    {
        let value = query(&self.pool).await?;
        for invalidation in invalidations(&value) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?invalidation, "invalidating");

            self.cache_registry.invalidate(&invalidation);
        }
        Ok(value)
    }

    /// Drop every cached entry. Called on shutdown.
    pub fn clear_cache(&self) {
        self.cache_registry.clear();
    }
}

impl Clone for DataAccess {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            cache_registry: Arc::clone(&self.cache_registry),
        }
    }
}
