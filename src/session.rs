//! Server-side session store with an explicit lifecycle.
//!
//! Sessions are keyed by an opaque identifier the client carries in a
//! cookie. The store is the only holder of session state: handlers receive
//! it explicitly instead of going through ambient globals, and every
//! mutation of one identity is serialized by the map entry it lives in.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Cookie under which the session identifier travels.
pub const SESSION_COOKIE: &str = "SESSION_ID";

const VISITS_KEY: &str = "visits";
const DEFAULT_THEME: &str = "dark";

#[derive(Debug, Clone)]
struct SessionMeta {
    remote_address: String,
    user_agent: String,
    created_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
}

/// One client's server-side state. Exists iff the session is active.
#[derive(Debug, Clone)]
struct Session {
    meta: SessionMeta,
    data: HashMap<String, String>,
}

impl Session {
    fn new(remote_address: &str, user_agent: &str) -> Self {
        let now = Utc::now();
        let mut data = HashMap::new();
        data.insert(VISITS_KEY.to_string(), "1".to_string());
        data.insert("theme".to_string(), DEFAULT_THEME.to_string());
        Self {
            meta: SessionMeta {
                remote_address: remote_address.to_string(),
                user_agent: user_agent.to_string(),
                created_at: now,
                last_accessed_at: now,
            },
            data,
        }
    }

    fn touch(&mut self) {
        self.meta.last_accessed_at = Utc::now();
    }

    fn bump_visits(&mut self) {
        let visits = self
            .data
            .get(VISITS_KEY)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        self.data
            .insert(VISITS_KEY.to_string(), (visits + 1).to_string());
    }

    fn view(&self, id: &str) -> SessionView {
        SessionView {
            active: true,
            session_id: Some(id.to_string()),
            ip_address: Some(self.meta.remote_address.clone()),
            user_agent: Some(self.meta.user_agent.clone()),
            created_at: Some(self.meta.created_at.to_rfc3339()),
            last_access: Some(self.meta.last_accessed_at.to_rfc3339()),
            data: Some(self.data.clone()),
        }
    }
}

/// Snapshot of a session as reported to the client.
///
/// Field names are the wire contract; inactive views carry only `active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
}

impl SessionView {
    /// The view reported for any identity without an active session.
    pub fn inactive() -> Self {
        Self {
            active: false,
            session_id: None,
            ip_address: None,
            user_agent: None,
            created_at: None,
            last_access: None,
            data: None,
        }
    }
}

/// Keyed map from client identity to [`Session`].
///
/// Concurrent operations against the same identity are serialized by the
/// entry lock; distinct identities never observe one another.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, or refresh the one the token already names.
    ///
    /// A fresh identity gets a new UUID, stamped metadata, and default
    /// data. An existing session gets `last_accessed_at` refreshed and its
    /// visit counter bumped. A token that parses as a UUID but no longer
    /// resolves is reused as the new session's id, matching how the
    /// original cookie flow resurrects known clients.
    pub fn start(
        &self,
        token: Option<&str>,
        remote_address: &str,
        user_agent: &str,
    ) -> (String, SessionView) {
        let id = token
            .filter(|t| Uuid::parse_str(t).is_ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match self.sessions.entry(id.clone()) {
            Entry::Occupied(mut occupied) => {
                let session = occupied.get_mut();
                session.touch();
                session.bump_visits();
                let view = session.view(&id);
                (id, view)
            }
            Entry::Vacant(vacant) => {
                debug!(session_id = %id, "session created");
                let session = Session::new(remote_address, user_agent);
                let view = session.view(&id);
                vacant.insert(session);
                (id, view)
            }
        }
    }

    /// Look up a session without ever creating one.
    ///
    /// A hit counts as a visit: `last_accessed_at` is refreshed and the
    /// counter bumped before the view is taken.
    pub fn get(&self, token: &str) -> SessionView {
        match self.sessions.get_mut(token) {
            Some(mut session) => {
                session.touch();
                session.bump_visits();
                session.view(token)
            }
            None => SessionView::inactive(),
        }
    }

    /// Upsert one data key. An empty key is a no-op that still reports the
    /// current state.
    pub fn put(&self, token: &str, key: &str, value: &str) -> SessionView {
        match self.sessions.get_mut(token) {
            Some(mut session) => {
                if !key.is_empty() {
                    session.data.insert(key.to_string(), value.to_string());
                    session.touch();
                }
                session.view(token)
            }
            None => SessionView::inactive(),
        }
    }

    /// Remove one data key. An absent key is a no-op.
    pub fn remove(&self, token: &str, key: &str) -> SessionView {
        match self.sessions.get_mut(token) {
            Some(mut session) => {
                if !key.is_empty() && session.data.remove(key).is_some() {
                    session.touch();
                }
                session.view(token)
            }
            None => SessionView::inactive(),
        }
    }

    /// Tear down a session. Idempotent: destroying an absent session still
    /// reports inactive.
    pub fn destroy(&self, token: &str) -> SessionView {
        if self.sessions.remove(token).is_some() {
            debug!(session_id = %token, "session destroyed");
        }
        SessionView::inactive()
    }

    /// Number of active sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
