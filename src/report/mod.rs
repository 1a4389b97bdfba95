//! Page-view report retrieval
//!
//! Talks to the Reporting API v4 `batchGet` endpoint: one request per
//! refresh, authorized with a service account JWT traded for a bearer token.
//! Response decoding is lenient; a shape the API did not promise yields an
//! empty report, not a decode failure.

pub mod auth;
pub mod client;
pub mod types;

use thiserror::Error;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use client::{AnalyticsClient, DEFAULT_ENDPOINT, HttpOptions, ReportSource};
pub use types::{Report, ReportRow};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No service account credentials configured")]
    MissingCredentials,

    #[error("Service account key is invalid: {0}")]
    InvalidKey(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Report request failed: {0}")]
    RequestFailed(String),

    #[error("Report request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode report response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
