use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub app: AppUrls,
    pub security: SecurityConfig,
    pub editor: EditorConfig,
    pub livestream: LivestreamConfig,
    pub saml: SamlConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Frontend application URLs the API redirects to or embeds in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUrls {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// Third-party rich-text editor integration. Both values must be present for
/// the token endpoint to be enabled; otherwise it reports 503.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub shared_secret: Option<String>,
    pub environment_id: Option<String>,
}

impl EditorConfig {
    pub fn is_enabled(&self) -> bool {
        self.shared_secret.is_some() && self.environment_id.is_some()
    }
}

/// Livestream provider credentials. Feature-flagged the same way as the
/// editor: missing config means disabled, not broken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestreamConfig {
    pub account_id: Option<String>,
    pub secret_key: Option<String>,
    pub upstream_url: String,
}

impl LivestreamConfig {
    pub fn is_enabled(&self) -> bool {
        self.account_id.is_some() && self.secret_key.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamlConfig {
    pub enabled: bool,
    pub entity_id: String,
    pub acs_url: String,
    pub certificate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub base_url: String,
    pub profile_index: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
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
        // App overrides
        if let Ok(v) = env::var("ATRIUM_APP_BASE_URL") {
            self.app.base_url = v;
        }

        // Security overrides
        if let Ok(v) = env::var("ATRIUM_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ATRIUM_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("ATRIUM_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("ATRIUM_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Editor overrides
        if let Ok(v) = env::var("ATRIUM_EDITOR_SECRET") {
            self.editor.shared_secret = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("ATRIUM_EDITOR_ENV_ID") {
            self.editor.environment_id = Some(v).filter(|s| !s.is_empty());
        }

        // Livestream overrides
        if let Ok(v) = env::var("ATRIUM_LIVESTREAM_ACCOUNT_ID") {
            self.livestream.account_id = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("ATRIUM_LIVESTREAM_SECRET_KEY") {
            self.livestream.secret_key = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("ATRIUM_LIVESTREAM_UPSTREAM_URL") {
            self.livestream.upstream_url = v;
        }

        // SAML overrides
        if let Ok(v) = env::var("ATRIUM_SAML_ENABLED") {
            self.saml.enabled = v.parse().unwrap_or(self.saml.enabled);
        }
        if let Ok(v) = env::var("ATRIUM_SAML_ENTITY_ID") {
            self.saml.entity_id = v;
        }
        if let Ok(v) = env::var("ATRIUM_SAML_ACS_URL") {
            self.saml.acs_url = v;
        }
        if let Ok(v) = env::var("ATRIUM_SAML_CERTIFICATE") {
            self.saml.certificate = v;
        }

        // Search overrides
        if let Ok(v) = env::var("ATRIUM_SEARCH_URL") {
            self.search.base_url = v;
        }
        if let Ok(v) = env::var("ATRIUM_SEARCH_PROFILE_INDEX") {
            self.search.profile_index = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            app: AppUrls {
                base_url: "http://localhost:8062".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: "insecure-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:8062".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            editor: EditorConfig {
                shared_secret: None,
                environment_id: None,
            },
            livestream: LivestreamConfig {
                account_id: None,
                secret_key: None,
                upstream_url: "https://livestreamapis.com/v3".to_string(),
            },
            saml: SamlConfig {
                enabled: false,
                entity_id: "http://localhost:3000".to_string(),
                acs_url: "http://localhost:3000/saml/acs".to_string(),
                certificate: String::new(),
            },
            search: SearchConfig {
                base_url: "http://localhost:9200".to_string(),
                profile_index: "profiles".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            app: AppUrls {
                base_url: "https://staging.atrium.example.com".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.atrium.example.com".to_string()],
            },
            editor: EditorConfig {
                shared_secret: None,
                environment_id: None,
            },
            livestream: LivestreamConfig {
                account_id: None,
                secret_key: None,
                upstream_url: "https://livestreamapis.com/v3".to_string(),
            },
            saml: SamlConfig {
                enabled: false,
                entity_id: "https://staging.atrium.example.com".to_string(),
                acs_url: "https://staging.atrium.example.com/saml/acs".to_string(),
                certificate: String::new(),
            },
            search: SearchConfig {
                base_url: "http://localhost:9200".to_string(),
                profile_index: "profiles".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            app: AppUrls {
                base_url: "https://atrium.example.com".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                enable_cors: true,
                cors_origins: vec!["https://atrium.example.com".to_string()],
            },
            editor: EditorConfig {
                shared_secret: None,
                environment_id: None,
            },
            livestream: LivestreamConfig {
                account_id: None,
                secret_key: None,
                upstream_url: "https://livestreamapis.com/v3".to_string(),
            },
            saml: SamlConfig {
                enabled: false,
                entity_id: "https://atrium.example.com".to_string(),
                acs_url: "https://atrium.example.com/saml/acs".to_string(),
                certificate: String::new(),
            },
            search: SearchConfig {
                base_url: "http://localhost:9200".to_string(),
                profile_index: "profiles".to_string(),
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
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.editor.is_enabled());
        assert!(!config.livestream.is_enabled());
        assert!(!config.saml.enabled);
        assert_eq!(config.security.jwt_expiry_hours, 24 * 7);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_editor_enabled_requires_both_values() {
        let mut editor = EditorConfig {
            shared_secret: Some("secret".into()),
            environment_id: None,
        };
        assert!(!editor.is_enabled());
        editor.environment_id = Some("env-1".into());
        assert!(editor.is_enabled());
    }
}
