use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use tracing::{debug, info};

use super::{CacheError, Result};

/// Byte-oriented TTL cache consumed by the ranking slots
///
/// Implementations treat an entry whose lifetime has passed as absent.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

const EXPIRY_LEN: usize = 8;

/// Frame a value as an eight-byte big-endian unix expiry followed by the payload
fn encode_entry(value: &[u8], expires_at: i64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(EXPIRY_LEN + value.len());
    buf.extend_from_slice(&expires_at.to_be_bytes());
    buf.extend_from_slice(value);
    buf
}

fn decode_entry(raw: &[u8]) -> Option<(i64, Vec<u8>)> {
    if raw.len() < EXPIRY_LEN {
        return None;
    }
    let mut stamp = [0u8; EXPIRY_LEN];
    stamp.copy_from_slice(&raw[..EXPIRY_LEN]);
    Some((i64::from_be_bytes(stamp), raw[EXPIRY_LEN..].to_vec()))
}

fn expiry_for(ttl: Duration) -> i64 {
    let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Utc::now().timestamp().saturating_add(ttl_secs)
}

/// Fjall-backed persistent cache with entry-level expiry
///
/// Expired entries are removed when read and by `prune_expired`.
#[derive(Clone)]
pub struct FjallCache {
    keyspace: Keyspace,
    entries: PartitionHandle,
}

impl FjallCache {
    /// Open or create a cache at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening ranking cache at: {}", path.display());

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;
        let entries = keyspace.open_partition("entries", PartitionCreateOptions::default())?;

        Ok(Self { keyspace, entries })
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }

    /// Remove every entry whose expiry has passed, returning the count
    pub fn prune_expired(&self) -> Result<usize> {
        let now = Utc::now().timestamp();
        let mut stale = Vec::new();

        for item in self.entries.iter() {
            let (key, value) = item?;
            match decode_entry(&value) {
                Some((expires_at, _)) if expires_at > now => {}
                _ => stale.push(key),
            }
        }

        let pruned = stale.len();
        for key in stale {
            self.entries.remove(key)?;
        }

        if pruned > 0 {
            debug!(pruned, "Removed expired cache entries");
        }
        Ok(pruned)
    }
}

impl CacheStore for FjallCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.entries.get(key)? {
            Some(raw) => match decode_entry(&raw) {
                Some((expires_at, value)) if expires_at > Utc::now().timestamp() => {
                    Ok(Some(value))
                }
                Some(_) => {
                    // Expired entries are dropped on read
                    self.entries.remove(key)?;
                    Ok(None)
                }
                None => Err(CacheError::InvalidEntry(key.to_string())),
            },
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let entry = encode_entry(value, expiry_for(ttl));
        self.entries.insert(key, entry)?;
        debug!(key, "Stored cache entry");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key)?;
        Ok(())
    }
}

/// In-process cache for tests and embedding without a data directory
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (i64, Vec<u8>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, (i64, Vec<u8>)>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Utc::now().timestamp();
        let mut entries = self.write_entries();
        match entries.get(key) {
            Some((expires_at, value)) if *expires_at > now => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.write_entries()
            .insert(key.to_string(), (expiry_for(ttl), value.to_vec()));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.write_entries().remove(key);
        Ok(())
    }
}
