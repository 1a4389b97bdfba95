//! Ranked page-view lists
//!
//! The ranking pipeline: fetch a report for a scope's window, map each row's
//! path to a content id, and keep the ranked list in a primary/fallback cache
//! slot pair. Public reads never error; they degrade to the fallback slot
//! and, at worst, an empty list.

pub mod mapper;
pub mod service;
pub mod types;

pub use mapper::map_rows;
pub use service::RankingService;
pub use types::RankingEntry;
