//! Cache domain - Prediction cache keys, records and the store abstraction

mod key;
mod record;
mod repository;

pub use key::{
    canonical_form, CacheKey, CacheKeyGenerator, HmacKeyGenerator, DEFAULT_KEY_NAMESPACE,
};
pub use record::CacheRecord;
pub use repository::{escape_glob, pattern_to_regex, Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
