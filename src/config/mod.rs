use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub security: SecurityConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Cap on tag name suggestions returned for autocomplete.
    pub tag_suggestion_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("TAG_SUGGESTION_LIMIT") {
            self.lookup.tag_suggestion_limit = v.parse().unwrap_or(self.lookup.tag_suggestion_limit);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            security: SecurityConfig {
                jwt_secret: "dev-only-signing-key-not-for-production".to_string(),
                jwt_issuer: "news-api-dev".to_string(),
                jwt_audience: "news-api-clients".to_string(),
                jwt_expiry_hours: 24,
            },
            lookup: LookupConfig {
                tag_suggestion_limit: 5,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "news-api-staging".to_string(),
                jwt_audience: "news-api-clients".to_string(),
                jwt_expiry_hours: 8,
            },
            lookup: LookupConfig {
                tag_suggestion_limit: 5,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            security: SecurityConfig {
                // must be provided via JWT_SECRET; token issuance fails otherwise
                jwt_secret: String::new(),
                jwt_issuer: "news-api".to_string(),
                jwt_audience: "news-api-clients".to_string(),
                jwt_expiry_hours: 8,
            },
            lookup: LookupConfig {
                tag_suggestion_limit: 5,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults_have_a_signing_key() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 24);
        assert_eq!(config.lookup.tag_suggestion_limit, 5);
    }

    #[test]
    fn production_requires_external_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 8);
    }
}
