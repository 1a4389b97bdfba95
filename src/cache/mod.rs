/// Two-slot TTL cache for ranking lists
///
/// Every scope owns two entries in the backing store: a primary slot that
/// expires after the operator-configured duration and a long-lived fallback
/// slot that keeps the last successful ranking for a year. Reads treat an
/// expired entry as absent; a refresh replaces both slots together.
///
/// The `CacheStore` trait is the byte-level seam. `FjallCache` persists
/// entries in an embedded LSM keyspace; `MemoryCache` offers the same
/// contract in-process for tests and embedding without a data directory.
pub mod keys;
pub mod slots;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache entry for key: {0}")]
    InvalidEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

pub use keys::{fallback_key, primary_key};
pub use slots::RankingSlots;
pub use store::{CacheStore, FjallCache, MemoryCache};
