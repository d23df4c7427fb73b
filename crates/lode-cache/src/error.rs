use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("payload of {size} bytes exceeds the {limit}-byte cache ceiling")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("cache backend error: {0}")]
    Backend(String),
}
