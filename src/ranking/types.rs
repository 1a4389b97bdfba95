use crate::resolve::ContentId;
use serde::{Deserialize, Serialize};

/// One ranked item: a content id and its view count for the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub content_id: ContentId,
    pub views: u64,
}

impl RankingEntry {
    pub fn new(content_id: ContentId, views: u64) -> Self {
        Self { content_id, views }
    }
}
