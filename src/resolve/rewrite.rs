//! Rewrite-rule fallback for paths the standard lookup misses
//!
//! Mirrors the host platform's own URL routing: normalize the raw path,
//! walk the configured rewrite rules in order, expand the first matching
//! rule's query template, filter it down to public query variables, and ask
//! the content store for a singular item. The first matching rule decides
//! the outcome even when its query resolves nothing.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use tracing::{trace, warn};
use url::Url;

use crate::config::SiteConfig;

use super::{ContentId, ContentQuery, ContentStore, ResolveStrategy};

/// Explicit id parameters short-circuit resolution before any rule runs
static ID_PARAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&](p|page_id|attachment_id)=(\d+)").unwrap());

struct CompiledRule {
    source: String,
    regex: Regex,
    query: String,
}

/// Second tier of the resolution chain
pub struct RewriteResolver {
    home_url: String,
    home_path: String,
    using_index_permalinks: bool,
    rules: Vec<CompiledRule>,
    public_query_vars: Vec<String>,
    kind_query_vars: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
    store: Arc<dyn ContentStore>,
}

impl RewriteResolver {
    /// Build the resolver from site configuration; rules with patterns the
    /// regex engine rejects are skipped with a warning
    pub fn from_site(site: &SiteConfig, store: Arc<dyn ContentStore>) -> Self {
        let home_url = site.home_url.trim_end_matches('/').to_string();
        let home_path = Url::parse(&home_url)
            .ok()
            .map(|url| url.path().trim_end_matches('/').to_string())
            .unwrap_or_default();

        let mut rules = Vec::with_capacity(site.rewrites.len());
        for rule in &site.rewrites {
            match Regex::new(&format!("^{}", rule.pattern)) {
                Ok(regex) => rules.push(CompiledRule {
                    source: rule.pattern.clone(),
                    regex,
                    query: rule.query.clone(),
                }),
                Err(error) => {
                    warn!(
                        pattern = %rule.pattern,
                        error = %error,
                        "Skipping rewrite rule with invalid pattern"
                    );
                }
            }
        }

        Self {
            home_url,
            home_path,
            using_index_permalinks: site.using_index_permalinks,
            rules,
            public_query_vars: site.public_query_vars.clone(),
            kind_query_vars: site.kind_query_vars.clone(),
            overrides: BTreeMap::new(),
            store,
        }
    }

    /// Pin query variables that take precedence over rule-derived values
    pub fn with_overrides(mut self, overrides: BTreeMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Reduce a raw report path to the slug form rewrite patterns match on:
    /// no fragment or query string, host aligned with the configured home
    /// URL, home prefix removed, slashes trimmed
    fn normalize(&self, path: &str) -> String {
        let mut url = path;
        if let Some((head, _)) = url.split_once('#') {
            url = head;
        }
        if let Some((head, _)) = url.split_once('?') {
            url = head;
        }

        let mut url = url.to_string();
        if self.home_url.contains("://www.") && !url.contains("://www.") {
            url = url.replace("://", "://www.");
        }
        if !self.home_url.contains("://www.") {
            url = url.replace("://www.", "://");
        }

        if !self.using_index_permalinks {
            url = url.replace("index.php/", "");
        }

        if url.contains(&self.home_url) {
            url = url.replace(&self.home_url, "");
        } else if !self.home_path.is_empty() {
            if let Some(rest) = url.strip_prefix(&self.home_path) {
                url = rest.to_string();
            }
        }

        url.trim_matches('/').to_string()
    }

    fn walk_rules(&self, path: &str) -> Option<ContentId> {
        for rule in &self.rules {
            let Some(captures) = rule.regex.captures(path) else {
                continue;
            };
            trace!(path, pattern = %rule.source, "Rewrite rule matched");

            // Query templates may carry a script prefix ("index.php?...");
            // only the part after the last '?' holds the variables.
            let template = rule
                .query
                .rsplit_once('?')
                .map_or(rule.query.as_str(), |(_, tail)| tail);
            let expanded = substitute_matches(template, &captures);
            let rule_vars: BTreeMap<String, String> =
                url::form_urlencoded::parse(expanded.as_bytes())
                    .into_owned()
                    .collect();

            let query = self.build_query(&rule_vars);
            return self.store.find_singular(&query).filter(|id| *id != 0);
        }
        None
    }

    /// Keep only public query variables, apply overrides, and expand
    /// content-kind variables into a kind + name pair
    fn build_query(&self, rule_vars: &BTreeMap<String, String>) -> ContentQuery {
        let mut query = ContentQuery::default();
        for var in &self.public_query_vars {
            let Some(value) = self.overrides.get(var).or_else(|| rule_vars.get(var)) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            query.vars.insert(var.clone(), value.clone());
            if let Some(kind) = self.kind_query_vars.get(var) {
                query.vars.insert("post_type".to_string(), kind.clone());
                query.vars.insert("name".to_string(), value.clone());
            }
        }
        query
    }
}

impl ResolveStrategy for RewriteResolver {
    fn name(&self) -> &'static str {
        "rewrite"
    }

    fn resolve(&self, path: &str) -> Option<ContentId> {
        if let Some(captures) = ID_PARAMS.captures(path) {
            let id = captures
                .get(2)
                .and_then(|m| m.as_str().parse::<ContentId>().ok())
                .unwrap_or(0);
            if id != 0 {
                return Some(id);
            }
        }

        if self.rules.is_empty() {
            return None;
        }

        let normalized = self.normalize(path);
        self.walk_rules(&normalized)
    }
}

/// Expand `$matches[N]` references in a rule's query template; groups that
/// did not participate in the match expand to the empty string
fn substitute_matches(template: &str, captures: &Captures<'_>) -> String {
    const MARKER: &str = "$matches[";

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(MARKER) {
        out.push_str(&rest[..start]);
        let tail = &rest[start + MARKER.len()..];
        match tail.split_once(']') {
            Some((index, after)) => match index.parse::<usize>() {
                Ok(group) => {
                    if let Some(m) = captures.get(group) {
                        out.push_str(m.as_str());
                    }
                    rest = after;
                }
                Err(_) => {
                    out.push_str(MARKER);
                    rest = tail;
                }
            },
            None => {
                out.push_str(MARKER);
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::RewriteRule;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CapturingStore {
        calls: AtomicUsize,
        last: Mutex<Option<ContentQuery>>,
    }

    impl ContentStore for CapturingStore {
        fn url_to_content_id(&self, _path: &str) -> ContentId {
            0
        }

        fn find_singular(&self, query: &ContentQuery) -> Option<ContentId> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(query.clone());
            query
                .get("p")
                .and_then(|p| p.parse().ok())
                .filter(|id| *id != 0)
        }
    }

    fn site_with(home_url: &str, rewrites: Vec<RewriteRule>) -> SiteConfig {
        SiteConfig {
            home_url: home_url.to_string(),
            rewrites,
            ..SiteConfig::default()
        }
    }

    fn article_rule() -> RewriteRule {
        RewriteRule {
            pattern: "article/([0-9]+)/?$".to_string(),
            query: "index.php?p=$matches[1]".to_string(),
        }
    }

    fn resolver(site: &SiteConfig) -> (RewriteResolver, Arc<CapturingStore>) {
        let store = Arc::new(CapturingStore::default());
        (RewriteResolver::from_site(site, store.clone()), store)
    }

    #[test]
    fn test_explicit_id_param_short_circuits() {
        let site = site_with("https://example.com", Vec::new());
        let (resolver, store) = resolver(&site);

        assert_eq!(resolver.resolve("/?page_id=123"), Some(123));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_id_param_falls_through() {
        let site = site_with("https://example.com", Vec::new());
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("/?p=0"), None);
    }

    #[test]
    fn test_no_rules_resolves_nothing() {
        let site = site_with("https://example.com", Vec::new());
        let (resolver, store) = resolver(&site);

        assert_eq!(resolver.resolve("/article/42/"), None);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_matching_rule_resolves_via_store() {
        let site = site_with("https://example.com", vec![article_rule()]);
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("/article/42/"), Some(42));
    }

    #[test]
    fn test_fragment_and_query_are_stripped() {
        let site = site_with("https://example.com", vec![article_rule()]);
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("/article/42/?utm_source=feed#comments"), Some(42));
    }

    #[test]
    fn test_home_url_prefix_is_stripped() {
        let site = site_with("https://example.com", vec![article_rule()]);
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("https://example.com/article/7/"), Some(7));
    }

    #[test]
    fn test_www_host_is_aligned_with_home_url() {
        let site = site_with("https://example.com", vec![article_rule()]);
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("https://www.example.com/article/7/"), Some(7));
    }

    #[test]
    fn test_index_php_segment_is_stripped() {
        let site = site_with("https://example.com", vec![article_rule()]);
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("/index.php/article/9/"), Some(9));
    }

    #[test]
    fn test_home_path_prefix_is_stripped_for_subdirectory_sites() {
        let site = site_with("https://example.com/blog", vec![article_rule()]);
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("/blog/article/13/"), Some(13));
    }

    #[test]
    fn test_first_matching_rule_decides() {
        let broad = RewriteRule {
            pattern: "article/.*$".to_string(),
            query: "index.php?name=unknown".to_string(),
        };
        let site = site_with("https://example.com", vec![broad, article_rule()]);
        let (resolver, store) = resolver(&site);

        assert_eq!(resolver.resolve("/article/21/"), None);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let broken = RewriteRule {
            pattern: "article/([0-9]+".to_string(),
            query: "index.php?p=$matches[1]".to_string(),
        };
        let site = site_with("https://example.com", vec![broken, article_rule()]);
        let (resolver, _store) = resolver(&site);

        assert_eq!(resolver.resolve("/article/42/"), Some(42));
    }

    #[test]
    fn test_unmatched_optional_group_expands_empty() {
        let rule = RewriteRule {
            pattern: "article/([0-9]+)(?:/page/([0-9]+))?/?$".to_string(),
            query: "index.php?p=$matches[1]&paged=$matches[2]".to_string(),
        };
        let site = site_with("https://example.com", vec![rule]);
        let (resolver, store) = resolver(&site);

        assert_eq!(resolver.resolve("/article/42/"), Some(42));
        let query = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(query.get("p"), Some("42"));
        assert_eq!(query.get("paged"), None);
    }

    #[test]
    fn test_non_public_vars_are_filtered_out() {
        let rule = RewriteRule {
            pattern: "article/([0-9]+)/?$".to_string(),
            query: "index.php?p=$matches[1]&secret=1".to_string(),
        };
        let site = site_with("https://example.com", vec![rule]);
        let (resolver, store) = resolver(&site);

        assert_eq!(resolver.resolve("/article/42/"), Some(42));
        let query = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(query.get("secret"), None);
    }

    #[test]
    fn test_overrides_take_precedence_over_rule_vars() {
        let site = site_with("https://example.com", vec![article_rule()]);
        let store = Arc::new(CapturingStore::default());
        let resolver = RewriteResolver::from_site(&site, store.clone())
            .with_overrides(BTreeMap::from([("p".to_string(), "99".to_string())]));

        assert_eq!(resolver.resolve("/article/42/"), Some(99));
    }

    #[test]
    fn test_kind_query_var_expands_to_kind_and_name() {
        let rule = RewriteRule {
            pattern: "book/([^/]+)/?$".to_string(),
            query: "index.php?book=$matches[1]".to_string(),
        };
        let mut site = site_with("https://example.com", vec![rule]);
        site.public_query_vars.push("book".to_string());
        site.kind_query_vars
            .insert("book".to_string(), "book".to_string());
        let (resolver, store) = resolver(&site);

        resolver.resolve("/book/rust-in-practice/");
        let query = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(query.get("book"), Some("rust-in-practice"));
        assert_eq!(query.get("post_type"), Some("book"));
        assert_eq!(query.get("name"), Some("rust-in-practice"));
    }

    #[test]
    fn test_template_values_are_percent_decoded() {
        let rule = RewriteRule {
            pattern: "article/([^/]+)/?$".to_string(),
            query: "index.php?name=$matches[1]".to_string(),
        };
        let site = site_with("https://example.com", vec![rule]);
        let (resolver, store) = resolver(&site);

        resolver.resolve("/article/hello%20world/");
        let query = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(query.get("name"), Some("hello world"));
    }
}
