//! Ranking orchestration
//!
//! `RankingService` owns the refresh cycle: fetch a report for the scope's
//! window, map its rows to content ids, and swap both cache slots. Reads
//! never fail; every degraded path lands on the fallback slot, and the worst
//! case is an empty list.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::cache::RankingSlots;
use crate::config::Config;
use crate::observability::Metrics;
use crate::period::Scope;
use crate::report::ReportSource;
use crate::resolve::{ContentId, PathResolver};

use super::mapper::map_rows;
use super::types::RankingEntry;

/// Cached ranked lists per scope, refreshed from the report source
pub struct RankingService {
    config: Config,
    source: Arc<dyn ReportSource>,
    slots: RankingSlots,
    resolver: PathResolver,
    metrics: Arc<Metrics>,
}

impl RankingService {
    pub fn new(
        config: Config,
        source: Arc<dyn ReportSource>,
        slots: RankingSlots,
        resolver: PathResolver,
    ) -> Self {
        Self {
            config,
            source,
            slots,
            resolver,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// The ranked list for a scope: cached while fresh, refreshed otherwise
    pub async fn get_ranking(&self, scope: Scope) -> Vec<RankingEntry> {
        match self.slots.load(scope) {
            Ok(Some(entries)) => {
                self.metrics.cache_hit();
                debug!(scope = %scope, entries = entries.len(), "Serving cached ranking");
                entries
            }
            Ok(None) => {
                self.metrics.cache_miss();
                self.refresh_ranking(scope).await
            }
            Err(e) => {
                warn!(scope = %scope, error = %e, "Failed to read ranking slot, refreshing");
                self.metrics.cache_miss();
                self.refresh_ranking(scope).await
            }
        }
    }

    /// Content ids only, best ranked first
    pub async fn ranking_ids(&self, scope: Scope) -> Vec<ContentId> {
        self.get_ranking(scope)
            .await
            .into_iter()
            .map(|entry| entry.content_id)
            .collect()
    }

    /// Fetch, map and store a fresh ranking for a scope
    ///
    /// Degraded outcomes serve the fallback slot: missing configuration (for
    /// the custom scope), a failed fetch, or a response without a report. An
    /// empty ranking also serves the fallback but leaves both slots as they
    /// were, so the last good list keeps its remaining lifetime.
    pub async fn refresh_ranking(&self, scope: Scope) -> Vec<RankingEntry> {
        if scope == Scope::Custom && !self.config.analytics.is_configured() {
            error!(scope = %scope, "Analytics is not configured, serving fallback");
            self.metrics.refresh_failed();
            return self.slots.load_fallback(scope);
        }

        let window = scope.window(self.config.ranking.period);
        let end = Utc::now();
        // Windows too large for the calendar saturate to the earliest
        // representable start.
        let start = i64::try_from(window.as_secs())
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|span| end.checked_sub_signed(span))
            .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);

        let reports = match self
            .source
            .fetch_report(start.date_naive(), end.date_naive())
            .await
        {
            Ok(reports) => reports,
            Err(e) => {
                error!(scope = %scope, error = %e, "Report fetch failed, serving fallback");
                self.metrics.refresh_failed();
                return self.slots.load_fallback(scope);
            }
        };

        // Only the first report carries the ranking; the request asks for
        // exactly one.
        let Some(report) = reports.into_iter().next() else {
            error!(scope = %scope, "Report response carried no reports, serving fallback");
            self.metrics.refresh_failed();
            return self.slots.load_fallback(scope);
        };

        let row_count = report.rows.len();
        let entries = map_rows(&report.rows, &self.resolver);
        if entries.len() < row_count {
            self.metrics.rows_dropped((row_count - entries.len()) as u64);
        }

        if entries.is_empty() {
            debug!(scope = %scope, "Ranking is empty, keeping slots and serving fallback");
            self.metrics.empty_result();
            return self.slots.load_fallback(scope);
        }

        if let Err(e) = self
            .slots
            .replace(scope, &entries, self.config.ranking.expiration.duration())
        {
            error!(scope = %scope, error = %e, "Failed to store refreshed ranking");
        }

        self.metrics.refresh_completed();
        info!(scope = %scope, entries = entries.len(), "Ranking refreshed");
        entries
    }
}
