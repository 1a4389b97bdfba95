//! Periodic ranking refresh

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::period::Scope;
use crate::ranking::RankingService;

/// Background job that periodically refreshes the custom-scope ranking
pub struct RefreshJob {
    service: Arc<RankingService>,
    interval_secs: u64,
}

impl RefreshJob {
    pub fn new(service: Arc<RankingService>) -> Self {
        Self {
            service,
            interval_secs: 43_200, // Twice per day
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Spawn the refresh loop; the first refresh runs immediately
    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting ranking refresh job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                interval.tick().await;
                let entries = self.service.refresh_ranking(Scope::Custom).await;
                info!(entries = entries.len(), "Ranking refresh completed");
            }
        });
    }
}
