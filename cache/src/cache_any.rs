use std::any::Any;

use crate::{Cache, Invalidation};

/// Object-safe adapter so caches with different key/value types can live in
/// one registry. Tags stay concrete; only keys and values are erased.
pub trait CacheAny {
    fn get_any(&self, key: &dyn Any) -> Option<Box<dyn Any>>;
    fn put_any(&mut self, key: Box<dyn Any>, value: Box<dyn Any>, tags: Vec<crate::Tag>);
    fn invalidate_any(&mut self, matching: &Invalidation);
    fn clear_any(&mut self);
}

impl<C> CacheAny for C
where
    C: Cache,
    C::Key: 'static,
    C::Value: 'static,
{
    fn get_any(&self, key: &dyn Any) -> Option<Box<dyn Any>> {
        key.downcast_ref::<C::Key>()
            .or_else(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "failed to downcast_ref key to {}",
                    std::any::type_name::<C::Key>()
                );

                None
            })
            .and_then(|k| self.get(k))
            .map(|v| Box::new(v) as Box<dyn Any>)
    }

    fn put_any(&mut self, key: Box<dyn Any>, value: Box<dyn Any>, tags: Vec<crate::Tag>) {
        let key = key.downcast::<C::Key>().map(|b| *b).inspect_err(|_| {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "failed to downcast key to {}",
                std::any::type_name::<C::Key>()
            );
        });

        let value = value.downcast::<C::Value>().map(|b| *b).inspect_err(|_| {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "failed to downcast value to {}",
                std::any::type_name::<C::Value>()
            );
        });

        if let (Ok(key), Ok(value)) = (key, value) {
            self.put(key, value, tags);
        }
    }

    fn invalidate_any(&mut self, matching: &Invalidation) {
        self.invalidate(matching);
    }

    fn clear_any(&mut self) {
        self.clear();
    }
}
