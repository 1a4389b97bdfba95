pub mod cache;
pub mod config;
pub mod observability;
pub mod period;
pub mod ranking;
pub mod report;
pub mod resolve;
pub mod scheduler;
