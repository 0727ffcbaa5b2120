use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

pub mod error;

pub use error::ConfigError;

use crate::access::rules::{DEFAULT_ALLOW_RULES, DEFAULT_DENY_RULES};
use crate::platform::ApiVersion;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub auth: AuthConfig,
    pub scope: ScopeConfig,
    pub access: AccessConfig,
    pub upstream: UpstreamConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub account_info_uri: String,
    pub api_uri: String,
    pub logout_uri: String,
    /// Members of this organization see unscoped results
    pub system_org: String,
    /// Disables tenant scoping for every session
    pub skip_authorization: bool,
    pub api_version: ApiVersion,
    pub page_size: u32,
    /// 0 leaves session lifetime to logout
    pub session_ttl_secs: u64,
    pub cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub field_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub deny_rules: Vec<String>,
    pub allow_rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub dashboard_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
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
        // Auth overrides
        if let Ok(v) = env::var("AUTH_ACCOUNT_INFO_URI") {
            self.auth.account_info_uri = v;
        }
        if let Ok(v) = env::var("AUTH_API_URI") {
            self.auth.api_uri = v;
        }
        if let Ok(v) = env::var("AUTH_LOGOUT_URI") {
            self.auth.logout_uri = v;
        }
        if let Ok(v) = env::var("AUTH_SYSTEM_ORG") {
            self.auth.system_org = v;
        }
        if let Ok(v) = env::var("AUTH_SKIP_AUTHORIZATION") {
            self.auth.skip_authorization = v.parse().unwrap_or(self.auth.skip_authorization);
        }
        if let Ok(v) = env::var("AUTH_API_VERSION") {
            self.auth.api_version = v.parse().unwrap_or(self.auth.api_version);
        }
        if let Ok(v) = env::var("AUTH_PAGE_SIZE") {
            self.auth.page_size = v.parse().unwrap_or(self.auth.page_size);
        }
        if let Ok(v) = env::var("AUTH_SESSION_TTL_SECS") {
            self.auth.session_ttl_secs = v.parse().unwrap_or(self.auth.session_ttl_secs);
        }
        if let Ok(v) = env::var("AUTH_COOKIE_NAME") {
            self.auth.cookie_name = v;
        }

        // Scope overrides
        if let Ok(v) = env::var("SCOPE_FIELD_PREFIX") {
            self.scope.field_prefix = v;
        }

        // Access rule overrides replace the whole list
        if let Ok(v) = env::var("ACCESS_DENY_RULES") {
            self.access.deny_rules = split_list(&v);
        }
        if let Ok(v) = env::var("ACCESS_ALLOW_RULES") {
            self.access.allow_rules = split_list(&v);
        }

        // Upstream overrides
        if let Ok(v) = env::var("UPSTREAM_DASHBOARD_URL") {
            self.upstream.dashboard_url = v;
        }
        if let Ok(v) = env::var("UPSTREAM_REQUEST_TIMEOUT_SECS") {
            self.upstream.request_timeout_secs = v.parse().unwrap_or(self.upstream.request_timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        self
    }

    fn base_auth() -> AuthConfig {
        AuthConfig {
            account_info_uri: "http://localhost:8080/userinfo".to_string(),
            api_uri: "http://localhost:8081".to_string(),
            logout_uri: "http://localhost:8080/logout.do".to_string(),
            system_org: "system".to_string(),
            skip_authorization: false,
            api_version: ApiVersion::V2,
            page_size: 100,
            session_ttl_secs: 0,
            cookie_name: "cf-scope-session".to_string(),
        }
    }

    fn base_access() -> AccessConfig {
        AccessConfig {
            deny_rules: DEFAULT_DENY_RULES.iter().map(|r| r.to_string()).collect(),
            allow_rules: DEFAULT_ALLOW_RULES.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            auth: Self::base_auth(),
            scope: ScopeConfig {
                field_prefix: "@cf".to_string(),
            },
            access: Self::base_access(),
            upstream: UpstreamConfig {
                dashboard_url: "http://localhost:5601".to_string(),
                request_timeout_secs: 60,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            upstream: UpstreamConfig {
                dashboard_url: "http://localhost:5601".to_string(),
                request_timeout_secs: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            ..Self::development()
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            upstream: UpstreamConfig {
                dashboard_url: "http://localhost:5601".to_string(),
                request_timeout_secs: 30,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            ..Self::development()
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
