use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::upstream::Upstream;
use crate::access::{PathClassifier, RuleSet};
use crate::audit::EventSink;
use crate::config::{AppConfig, ConfigError};
use crate::platform::{AuthorizationContextBuilder, ContextSettings};
use crate::scope::{QueryScoper, ScopePolicy, TenantFields};
use crate::session::{SessionStore, SessionTtl};

/// Request-independent settings the handlers need
#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub cookie_name: String,
    pub logout_uri: String,
    pub account_info_uri: Url,
    pub platform_timeout: Duration,
    pub max_request_size_bytes: usize,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ProxySettings>,
    pub classifier: Arc<PathClassifier>,
    pub scoper: Arc<QueryScoper>,
    pub policy: Arc<ScopePolicy>,
    pub sessions: Arc<dyn SessionStore>,
    pub contexts: Arc<AuthorizationContextBuilder>,
    pub sink: Arc<dyn EventSink>,
    pub upstream: Upstream,
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl { key, source })
}

impl AppState {
    pub fn from_config(
        config: &AppConfig,
        sessions: Arc<dyn SessionStore>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        let rules = RuleSet::compile(config.access.deny_rules.as_slice(), config.access.allow_rules.as_slice())?;
        let timeout = Duration::from_secs(config.upstream.request_timeout_secs);

        let settings = ProxySettings {
            cookie_name: config.auth.cookie_name.clone(),
            logout_uri: config.auth.logout_uri.clone(),
            account_info_uri: parse_url("auth.account_info_uri", &config.auth.account_info_uri)?,
            platform_timeout: timeout,
            max_request_size_bytes: config.api.max_request_size_bytes,
        };

        let contexts = AuthorizationContextBuilder::new(
            ContextSettings {
                api_uri: parse_url("auth.api_uri", &config.auth.api_uri)?,
                version: config.auth.api_version,
                page_size: config.auth.page_size,
                ttl: SessionTtl::from_secs(config.auth.session_ttl_secs),
            },
            sessions.clone(),
            sink.clone(),
        );

        let upstream = Upstream::new(
            parse_url("upstream.dashboard_url", &config.upstream.dashboard_url)?,
            timeout,
        )?;

        Ok(Self {
            settings: Arc::new(settings),
            classifier: Arc::new(PathClassifier::new(rules)),
            scoper: Arc::new(QueryScoper::new(TenantFields::with_prefix(&config.scope.field_prefix))),
            policy: Arc::new(ScopePolicy::new(
                config.auth.system_org.clone(),
                config.auth.skip_authorization,
            )),
            sessions,
            contexts: Arc::new(contexts),
            sink,
            upstream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RecordingSink;
    use crate::session::MemorySessionStore;

    #[test]
    fn invalid_rule_fails_startup() {
        let mut config = AppConfig::development();
        config.access.deny_rules.push("([".to_string());
        let err = AppState::from_config(&config, Arc::new(MemorySessionStore::new()), Arc::new(RecordingSink::new()))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Access(_)));
    }

    #[test]
    fn invalid_url_names_the_key() {
        let mut config = AppConfig::development();
        config.auth.api_uri = "not a url".to_string();
        let err = AppState::from_config(&config, Arc::new(MemorySessionStore::new()), Arc::new(RecordingSink::new()))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::InvalidUrl { key: "auth.api_uri", .. }));
    }
}
