use std::hash::Hash;

use cache::{Cache, Invalidation, Tag};
use dashmap::DashMap;

/// Entry map plus a tag index. A key may appear under several tags; the
/// index may keep keys that were already evicted through another tag, which
/// only makes their later removal a no-op.
pub struct DashCache<K, V> {
    entries: DashMap<K, V>,
    tagged_keys: DashMap<Tag, Vec<K>>,
}

impl<K, V> Cache for DashCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn get(&self, key: &Self::Key) -> Option<Self::Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&mut self, key: Self::Key, value: Self::Value, tags: Vec<Tag>) {
        self.entries.insert(key.clone(), value);
        for tag in tags {
            #[cfg(feature = "tracing")]
            tracing::trace!("indexing under tag `{:?}`", tag);

            self.tagged_keys.entry(tag).or_default().push(key.clone());
        }
    }

    fn invalidate(&mut self, matching: &Invalidation) {
        let matched: Vec<Tag> = self
            .tagged_keys
            .iter()
            .filter(|ref_| matching.matches(ref_.key()))
            .map(|ref_| ref_.key().clone())
            .collect();

        for tag in matched {
            #[cfg(feature = "tracing")]
            tracing::trace!("evicting tag `{:?}`", tag);

            if let Some((_, keys)) = self.tagged_keys.remove(&tag) {
                for key in keys {
                    self.entries.remove(&key);
                }
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.tagged_keys.clear();
    }
}

impl<K, V> DashCache<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            tagged_keys: DashMap::new(),
        }
    }
}

impl<K, V> Default for DashCache<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_product_entries() -> DashCache<i64, String> {
        let mut cache = DashCache::new();
        cache.put(
            1,
            "p1".into(),
            vec![Tag::entity(1, "products"), Tag::user("u1", "products")],
        );
        cache.put(
            2,
            "p2".into(),
            vec![Tag::entity(2, "products"), Tag::user("u2", "products")],
        );
        cache
    }

    #[test]
    fn put_then_get() {
        let mut cache = DashCache::new();
        assert_eq!(cache.get(&1), None);

        cache.put(1, "p1".to_string(), vec![Tag::entity(1, "products")]);
        assert_eq!(cache.get(&1), Some("p1".to_string()));
    }

    #[test]
    fn entity_invalidation_is_scoped() {
        let mut cache = cache_with_product_entries();

        cache.invalidate(&Invalidation::of("products").for_entity(1));

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("p2".to_string()));
    }

    #[test]
    fn user_invalidation_is_scoped() {
        let mut cache = cache_with_product_entries();

        cache.invalidate(&Invalidation::of("products").for_user("u2"));

        assert_eq!(cache.get(&1), Some("p1".to_string()));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn global_tag_evicted_by_any_qualifier() {
        let mut cache = DashCache::new();
        cache.put(1, "all-groups".to_string(), vec![Tag::global("country_groups")]);

        cache.invalidate(&Invalidation::of("country_groups").for_user("whoever"));
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn unknown_tag_is_a_noop() {
        let mut cache = cache_with_product_entries();

        cache.invalidate(&Invalidation::of("subscriptions"));
        cache.invalidate(&Invalidation::of("products").for_entity(99));

        assert_eq!(cache.get(&1), Some("p1".to_string()));
        assert_eq!(cache.get(&2), Some("p2".to_string()));
    }

    #[test]
    fn overwrite_replaces_value() {
        let mut cache = DashCache::new();
        cache.put(1, "old".to_string(), vec![Tag::entity(1, "products")]);
        cache.put(1, "new".to_string(), vec![Tag::entity(1, "products")]);

        assert_eq!(cache.get(&1), Some("new".to_string()));
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = cache_with_product_entries();
        cache.clear();

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), None);
    }
}
