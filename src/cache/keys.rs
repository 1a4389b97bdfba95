use crate::period::Scope;

/// Key layout for ranking cache slots
///
/// Slot structure per scope:
/// - custom scope: `{namespace}` and `{namespace}_long`
/// - named scopes: `{namespace}_{scope}` and `{namespace}_{scope}_long`

const FALLBACK_SUFFIX: &str = "_long";

/// Encode the primary slot key for a scope
pub fn primary_key(namespace: &str, scope: Scope) -> String {
    match scope {
        Scope::Custom => namespace.to_string(),
        named => format!("{}_{}", namespace, named),
    }
}

/// Encode the fallback (last-known-good) slot key for a scope
pub fn fallback_key(namespace: &str, scope: Scope) -> String {
    format!("{}{}", primary_key(namespace, scope), FALLBACK_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_scope_keys() {
        assert_eq!(primary_key("viewrank", Scope::Custom), "viewrank");
        assert_eq!(fallback_key("viewrank", Scope::Custom), "viewrank_long");
    }

    #[test]
    fn test_named_scope_keys() {
        assert_eq!(primary_key("viewrank", Scope::Day), "viewrank_day");
        assert_eq!(primary_key("viewrank", Scope::Week), "viewrank_week");
        assert_eq!(primary_key("viewrank", Scope::Month), "viewrank_month");
        assert_eq!(fallback_key("viewrank", Scope::Week), "viewrank_week_long");
    }

    #[test]
    fn test_namespace_prefixes_every_key() {
        for scope in Scope::ALL {
            assert!(primary_key("site_a", scope).starts_with("site_a"));
            assert!(fallback_key("site_a", scope).ends_with("_long"));
        }
    }
}
