//! Report rows to ranking entries

use tracing::trace;

use crate::report::ReportRow;
use crate::resolve::PathResolver;

use super::types::RankingEntry;

/// Map report rows to ranking entries, preserving report order
///
/// Rows whose path does not resolve to a content id are dropped. Two paths
/// resolving to the same id both stay in the list.
pub fn map_rows(rows: &[ReportRow], resolver: &PathResolver) -> Vec<RankingEntry> {
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let content_id = resolver.resolve(&row.path);
        if content_id == 0 {
            trace!(path = %row.path, "Dropping unresolvable report row");
            continue;
        }
        entries.push(RankingEntry::new(content_id, parse_views(&row.views)));
    }
    entries
}

/// View counts arrive as decimal strings; tolerate float renderings
fn parse_views(raw: &str) -> u64 {
    if let Ok(views) = raw.parse::<u64>() {
        return views;
    }
    raw.parse::<f64>()
        .map(|views| views.max(0.0) as u64)
        .unwrap_or(0)
}
