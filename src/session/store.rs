use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::error::StoreError;
use crate::audit::{EventLevel, EventSink};
use crate::types::AuthorizationContext;

/// OAuth tokens handed over by the identity layer after login
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl Credentials {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: Some("bearer".to_string()),
        }
    }
}

// Tokens never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Everything cached for one login session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEntry {
    pub credentials: Credentials,
    pub account: AuthorizationContext,
}

/// Lifetime of a cached session entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTtl {
    /// The store never expires the entry; logout drops it
    Unmanaged,
    Expires(Duration),
}

impl SessionTtl {
    /// Zero seconds means unmanaged
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            SessionTtl::Unmanaged
        } else {
            SessionTtl::Expires(Duration::from_secs(secs))
        }
    }
}

/// Key-value session cache keyed by session id
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<SessionEntry>, StoreError>;

    async fn set(
        &self,
        session_id: &str,
        entry: SessionEntry,
        ttl: SessionTtl,
    ) -> Result<(), StoreError>;

    async fn drop_session(&self, session_id: &str) -> Result<(), StoreError>;
}

/// In-process session cache with lazy expiry
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, (SessionEntry, Option<Instant>)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionEntry>, StoreError> {
        {
            let entries = self.entries.read().await;
            match entries.get(session_id) {
                None => return Ok(None),
                Some((entry, None)) => return Ok(Some(entry.clone())),
                Some((entry, Some(deadline))) if Instant::now() < *deadline => {
                    return Ok(Some(entry.clone()))
                }
                Some(_) => {}
            }
        }
        // expired
        self.entries.write().await.remove(session_id);
        Ok(None)
    }

    async fn set(
        &self,
        session_id: &str,
        entry: SessionEntry,
        ttl: SessionTtl,
    ) -> Result<(), StoreError> {
        let deadline = match ttl {
            SessionTtl::Unmanaged => None,
            SessionTtl::Expires(ttl) => Some(Instant::now() + ttl),
        };
        self.entries
            .write()
            .await
            .insert(session_id.to_string(), (entry, deadline));
        Ok(())
    }

    async fn drop_session(&self, session_id: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(session_id);
        Ok(())
    }
}

/// Read a session, treating an unavailable store as an absent session
pub async fn lookup_session(
    store: &dyn SessionStore,
    session_id: &str,
    sink: &dyn EventSink,
) -> Option<SessionEntry> {
    match store.get(session_id).await {
        Ok(entry) => entry,
        Err(e) => {
            sink.log(
                EventLevel::Error,
                &["error", "authentication", "session:get"],
                &e.to_string(),
            );
            None
        }
    }
}
