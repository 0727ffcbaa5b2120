use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use super::client::{PageFetcher, ProfileFetcher};
use super::error::ContextError;
use super::paginator::{ApiVersion, Collection, CollectionPaginator};
use crate::audit::{EventLevel, EventSink};
use crate::session::{Credentials, SessionEntry, SessionStore, SessionTtl};
use crate::types::{AuthorizationContext, UserProfile};

/// Where and how the builder reads the platform API
#[derive(Debug, Clone)]
pub struct ContextSettings {
    pub api_uri: Url,
    pub version: ApiVersion,
    pub page_size: u32,
    pub ttl: SessionTtl,
}

/// Result of a login: the session id is always issued, the context only when
/// every stage succeeded and it was stored.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session_id: String,
    pub context: Option<AuthorizationContext>,
}

type SessionIdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Builds and caches a user's authorization context at login
pub struct AuthorizationContextBuilder {
    settings: ContextSettings,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn EventSink>,
    session_ids: SessionIdGenerator,
}

impl AuthorizationContextBuilder {
    pub fn new(settings: ContextSettings, store: Arc<dyn SessionStore>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            settings,
            store,
            sink,
            session_ids: Arc::new(|| Uuid::now_v7().to_string()),
        }
    }

    pub fn with_session_ids(mut self, generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.session_ids = Arc::new(generator);
        self
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Fetch profile, organizations and spaces, then store the session.
    ///
    /// Failures are logged with the failing stage as a tag and never
    /// propagate: the caller gets a session id without a context.
    pub async fn build(
        &self,
        credentials: Credentials,
        profiles: &dyn ProfileFetcher,
        pages: &dyn PageFetcher,
    ) -> LoginOutcome {
        let session_id = (self.session_ids)();

        match self.assemble(&session_id, credentials, profiles, pages).await {
            Ok(context) => {
                tracing::info!(
                    session_id = %session_id,
                    organizations = context.organization_ids.len(),
                    spaces = context.space_ids.len(),
                    "authorization context stored"
                );
                LoginOutcome {
                    session_id,
                    context: Some(context),
                }
            }
            Err(e) => {
                self.sink.log(
                    EventLevel::Error,
                    &["error", "authentication", e.stage()],
                    &e.to_string(),
                );
                LoginOutcome {
                    session_id,
                    context: None,
                }
            }
        }
    }

    async fn assemble(
        &self,
        session_id: &str,
        credentials: Credentials,
        profiles: &dyn ProfileFetcher,
        pages: &dyn PageFetcher,
    ) -> Result<AuthorizationContext, ContextError> {
        let raw_profile = profiles.fetch_profile().await.map_err(ContextError::Profile)?;
        let profile = UserProfile::from_raw(raw_profile);

        let version = self.settings.version;
        let paginator = &CollectionPaginator::new(version, self.settings.page_size)
            .with_api_base(self.settings.api_uri.clone());
        let orgs_url = version.collection_url(&self.settings.api_uri, Collection::Organizations)?;
        let spaces_url = version.collection_url(&self.settings.api_uri, Collection::Spaces)?;

        let (organizations, spaces) = futures::try_join!(
            async move {
                paginator
                    .collect(pages, orgs_url)
                    .await
                    .map_err(ContextError::Organizations)
            },
            async move {
                paginator
                    .collect(pages, spaces_url)
                    .await
                    .map_err(ContextError::Spaces)
            },
        )?;

        let context = AuthorizationContext::new(profile, organizations, spaces);
        let entry = SessionEntry {
            credentials,
            account: context.clone(),
        };
        self.store
            .set(session_id, entry, self.settings.ttl)
            .await
            .map_err(ContextError::Store)?;

        Ok(context)
    }
}
