use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Which implementation of the auth service and record store to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Hosted backend over HTTP.
    Remote,
    /// In-process tables and token issuer, for local runs and tests.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub url: String,
    pub anon_key: String,
    /// HS256 secret of the auth service. Empty means tokens are verified
    /// by asking the auth service instead of locally.
    pub jwt_secret: String,
    pub timeout_secs: u64,
    pub token_expiry_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
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
        // Backend overrides (SUPABASE_* accepted as aliases)
        if let Ok(v) = env::var("BACKEND_MODE") {
            self.backend.mode = match v.to_ascii_lowercase().as_str() {
                "memory" => BackendMode::Memory,
                "remote" => BackendMode::Remote,
                _ => self.backend.mode,
            };
        }
        if let Some(v) = first_var(&["BACKEND_URL", "SUPABASE_URL"]) {
            self.backend.url = v;
        }
        if let Some(v) = first_var(&["BACKEND_ANON_KEY", "SUPABASE_ANON_KEY"]) {
            self.backend.anon_key = v;
        }
        if let Some(v) = first_var(&["BACKEND_JWT_SECRET", "SUPABASE_JWT_SECRET"]) {
            self.backend.jwt_secret = v;
        }
        if let Ok(v) = env::var("BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().unwrap_or(self.backend.timeout_secs);
        }
        if let Ok(v) = env::var("BACKEND_TOKEN_EXPIRY_SECS") {
            self.backend.token_expiry_secs = v.parse().unwrap_or(self.backend.token_expiry_secs);
        }

        // API overrides
        if let Some(v) = first_var(&["API_PORT", "PORT"]) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    /// Checks the settings a remote backend cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.mode == BackendMode::Memory {
            if self.backend.jwt_secret.is_empty() {
                return Err(ConfigError::Missing("BACKEND_JWT_SECRET"));
            }
            return Ok(());
        }
        if self.backend.url.is_empty() {
            return Err(ConfigError::Missing("BACKEND_URL"));
        }
        if url::Url::parse(&self.backend.url).is_err() {
            return Err(ConfigError::Invalid {
                name: "BACKEND_URL",
                value: self.backend.url.clone(),
            });
        }
        if self.backend.anon_key.is_empty() {
            return Err(ConfigError::Missing("BACKEND_ANON_KEY"));
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                mode: BackendMode::Memory,
                url: String::new(),
                anon_key: String::new(),
                jwt_secret: "rentease-development-secret".to_string(),
                timeout_secs: 30,
                token_expiry_secs: 3600,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:5173".to_string(), "http://localhost:8080".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                mode: BackendMode::Remote,
                url: String::new(),
                anon_key: String::new(),
                jwt_secret: String::new(),
                timeout_secs: 15,
                token_expiry_secs: 3600,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.rentease.app".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                mode: BackendMode::Remote,
                url: String::new(),
                anon_key: String::new(),
                jwt_secret: String::new(),
                timeout_secs: 10,
                token_expiry_secs: 3600,
            },
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://rentease.app".to_string()],
            },
        }
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok())
        .filter(|v| !v.is_empty())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.backend.mode, BackendMode::Memory);
        assert!(config.validate().is_ok());
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config_requires_backend() {
        let config = AppConfig::production();
        assert_eq!(config.backend.mode, BackendMode::Remote);
        assert_eq!(config.validate(), Err(ConfigError::Missing("BACKEND_URL")));
    }

    #[test]
    fn test_remote_config_rejects_bad_url() {
        let mut config = AppConfig::staging();
        config.backend.url = "not a url".to_string();
        config.backend.anon_key = "anon".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { name: "BACKEND_URL", .. })));

        config.backend.url = "https://abc.supabase.co".to_string();
        assert!(config.validate().is_ok());
    }
}
