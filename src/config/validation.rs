use super::models::Config;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must cover at least one unit, got {amount}")]
    InvalidPeriod { field: String, amount: u32 },

    #[error("Cache namespace must not be empty")]
    EmptyNamespace,

    #[error("Refresh interval must be positive")]
    InvalidRefreshInterval,

    #[error("Rewrite pattern '{pattern}' is invalid: {reason}")]
    InvalidRewritePattern { pattern: String, reason: String },

    #[error("Site home URL must not be empty")]
    EmptyHomeUrl,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_ranking(config)?;
    validate_cache(config)?;
    validate_refresh(config)?;
    validate_site(config)?;
    Ok(())
}

/// Ranking periods must be at least one unit long
fn validate_ranking(config: &Config) -> Result<(), ValidationError> {
    if config.ranking.period.amount == 0 {
        return Err(ValidationError::InvalidPeriod {
            field: "ranking.period".to_string(),
            amount: 0,
        });
    }

    if config.ranking.expiration.amount == 0 {
        return Err(ValidationError::InvalidPeriod {
            field: "ranking.expiration".to_string(),
            amount: 0,
        });
    }

    Ok(())
}

/// The namespace prefixes every cache key and must not be empty
fn validate_cache(config: &Config) -> Result<(), ValidationError> {
    if config.cache.namespace.is_empty() {
        return Err(ValidationError::EmptyNamespace);
    }

    Ok(())
}

fn validate_refresh(config: &Config) -> Result<(), ValidationError> {
    if config.refresh.interval_secs == 0 {
        return Err(ValidationError::InvalidRefreshInterval);
    }

    Ok(())
}

/// Rewrite patterns must compile; the resolver anchors them at the start
fn validate_site(config: &Config) -> Result<(), ValidationError> {
    if config.site.home_url.is_empty() {
        return Err(ValidationError::EmptyHomeUrl);
    }

    for rule in &config.site.rewrites {
        if let Err(error) = Regex::new(&format!("^{}", rule.pattern)) {
            return Err(ValidationError::InvalidRewritePattern {
                pattern: rule.pattern.clone(),
                reason: error.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{Period, PeriodUnit};
    use crate::resolve::RewriteRule;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.site.rewrites.push(RewriteRule {
            pattern: "article/([0-9]+)/?$".to_string(),
            query: "index.php?p=$matches[1]".to_string(),
        });
        config
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_period() {
        let mut config = create_test_config();
        config.ranking.period = Period::new(0, PeriodUnit::Week);

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_zero_expiration() {
        let mut config = create_test_config();
        config.ranking.expiration = Period::new(0, PeriodUnit::Day);

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_empty_namespace() {
        let mut config = create_test_config();
        config.cache.namespace = String::new();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::EmptyNamespace)));
    }

    #[test]
    fn test_zero_refresh_interval() {
        let mut config = create_test_config();
        config.refresh.interval_secs = 0;

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidRefreshInterval)
        ));
    }

    #[test]
    fn test_empty_home_url() {
        let mut config = create_test_config();
        config.site.home_url = String::new();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::EmptyHomeUrl)));
    }

    #[test]
    fn test_invalid_rewrite_pattern() {
        let mut config = create_test_config();
        config.site.rewrites.push(RewriteRule {
            pattern: "article/([0-9]+".to_string(),
            query: "index.php?p=$matches[1]".to_string(),
        });

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidRewritePattern { .. })
        ));
    }
}
