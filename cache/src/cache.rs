use crate::{Invalidation, Tag};

pub trait Cache {
    type Key;
    type Value;

    fn get(&self, key: &Self::Key) -> Option<Self::Value>;
    fn put(&mut self, key: Self::Key, value: Self::Value, tags: Vec<Tag>);

    /// Remove every entry whose tag set intersects `matching`.
    /// Must be a no-op when nothing matches.
    fn invalidate(&mut self, matching: &Invalidation);

    fn clear(&mut self);
}
