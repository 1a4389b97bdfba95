//! Best-effort resolution of report paths to content identifiers
//!
//! Resolution runs as an ordered chain of strategies: the host platform's
//! standard lookup first, then a fallback that replays the platform's
//! URL-rewrite rules. The first strategy to produce an identifier wins;
//! a path no strategy resolves maps to `0` and its row is dropped by the
//! mapper.

pub mod rewrite;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use rewrite::RewriteResolver;

/// Identifier of a content item; zero means "unresolved"
pub type ContentId = u64;

/// One rewrite rule: a pattern over normalized paths and the query template
/// it expands to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub query: String,
}

/// Structured query the rewrite fallback hands to the content store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentQuery {
    pub vars: BTreeMap<String, String>,
}

impl ContentQuery {
    pub fn get(&self, var: &str) -> Option<&str> {
        self.vars.get(var).map(String::as_str)
    }
}

/// Host content platform the resolver queries
///
/// `url_to_content_id` is the platform's standard lookup; `find_singular`
/// executes a structured query and yields an id only when the result is a
/// single item of a singular kind.
pub trait ContentStore: Send + Sync {
    fn url_to_content_id(&self, path: &str) -> ContentId;
    fn find_singular(&self, query: &ContentQuery) -> Option<ContentId>;
}

/// One tier of the resolution chain
pub trait ResolveStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolve a report path to a content id, `None` when this tier cannot
    fn resolve(&self, path: &str) -> Option<ContentId>;
}

/// First tier: the platform's standard lookup
pub struct StandardLookup {
    store: Arc<dyn ContentStore>,
}

impl StandardLookup {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

impl ResolveStrategy for StandardLookup {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn resolve(&self, path: &str) -> Option<ContentId> {
        match self.store.url_to_content_id(path) {
            0 => None,
            id => Some(id),
        }
    }
}

/// Ordered resolver chain; the first tier to produce an id wins
pub struct PathResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl PathResolver {
    pub fn new(strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { strategies }
    }

    /// Standard lookup first, rewrite-rule fallback second
    pub fn with_defaults(site: &crate::config::SiteConfig, store: Arc<dyn ContentStore>) -> Self {
        Self::new(vec![
            Box::new(StandardLookup::new(store.clone())),
            Box::new(RewriteResolver::from_site(site, store)),
        ])
    }

    /// Resolve a path, returning 0 when no tier succeeds
    pub fn resolve(&self, path: &str) -> ContentId {
        for strategy in &self.strategies {
            if let Some(id) = strategy.resolve(path) {
                trace!(path, strategy = strategy.name(), id, "Resolved path");
                return id;
            }
        }
        trace!(path, "Path did not resolve");
        0
    }
}
