//! Primary/fallback slot pair per scope

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::store::CacheStore;
use super::{fallback_key, primary_key, Result};
use crate::period::{Scope, YEAR_SECS};
use crate::ranking::RankingEntry;

/// Lifetime of the fallback (last-known-good) slot
const FALLBACK_TTL: Duration = Duration::from_secs(YEAR_SECS);

/// Typed access to the two cache slots backing each scope
pub struct RankingSlots {
    store: Arc<dyn CacheStore>,
    namespace: String,
}

impl RankingSlots {
    pub fn new(store: Arc<dyn CacheStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Read the primary slot; expired or missing entries read as `None`
    pub fn load(&self, scope: Scope) -> Result<Option<Vec<RankingEntry>>> {
        let key = primary_key(&self.namespace, scope);
        self.read_slot(&key)
    }

    /// Read the fallback slot, treating every failure as empty
    ///
    /// A cache error never escalates past this point; the worst case is an
    /// empty ranking.
    pub fn load_fallback(&self, scope: Scope) -> Vec<RankingEntry> {
        let key = fallback_key(&self.namespace, scope);
        match self.read_slot(&key) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read fallback slot");
                Vec::new()
            }
        }
    }

    /// Replace both slots with a fresh ranking
    ///
    /// Both slots are deleted before the new values are written, each with
    /// its own lifetime.
    pub fn replace(
        &self,
        scope: Scope,
        entries: &[RankingEntry],
        primary_ttl: Duration,
    ) -> Result<()> {
        let primary = primary_key(&self.namespace, scope);
        let fallback = fallback_key(&self.namespace, scope);
        let payload = serde_json::to_vec(entries)?;

        self.store.delete(&primary)?;
        self.store.delete(&fallback)?;
        self.store.set(&primary, &payload, primary_ttl)?;
        self.store.set(&fallback, &payload, FALLBACK_TTL)?;

        debug!(scope = %scope, entries = entries.len(), "Replaced ranking slots");
        Ok(())
    }

    fn read_slot(&self, key: &str) -> Result<Option<Vec<RankingEntry>>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }
}
