mod cache;
mod cache_any;
mod registry;
mod tag;

pub use cache::Cache;
pub use registry::{CacheRegistry, CacheTypeConflictError};
pub use tag::{Invalidation, Tag, TagName};
