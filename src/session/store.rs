use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// One user-visible flash message, consumed by the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Notice,
    Alert,
}

#[derive(Debug, Default)]
struct SessionData {
    user_id: Option<Uuid>,
    previous_url: Option<String>,
    flash: Vec<FlashMessage>,
    last_seen: Option<DateTime<Utc>>,
}

/// Handle to one session's server-side state.
///
/// Cheap to clone; the same handle lives in the store and in the request
/// extensions, so mutations made by gates (flash, previous URL) are
/// visible to later requests carrying the same cookie.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    data: Arc<Mutex<SessionData>>,
}

impl Session {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            data: Arc::new(Mutex::new(SessionData::default())),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.data.lock().unwrap().user_id
    }

    pub fn set_user_id(&self, user_id: Option<Uuid>) {
        self.data.lock().unwrap().user_id = user_id;
    }

    #[must_use]
    pub fn previous_url(&self) -> Option<String> {
        self.data.lock().unwrap().previous_url.clone()
    }

    pub fn set_previous_url(&self, url: String) {
        self.data.lock().unwrap().previous_url = Some(url);
    }

    pub fn flash(&self, kind: FlashKind, message: impl Into<String>) {
        self.data.lock().unwrap().flash.push(FlashMessage {
            kind,
            message: message.into(),
        });
    }

    /// Drain pending flash messages. The render layer calls this once per
    /// response; messages do not survive being read.
    #[must_use]
    pub fn take_flash(&self) -> Vec<FlashMessage> {
        std::mem::take(&mut self.data.lock().unwrap().flash)
    }

    /// Read pending flash messages without consuming them.
    #[must_use]
    pub fn peek_flash(&self) -> Vec<FlashMessage> {
        self.data.lock().unwrap().flash.clone()
    }

    fn touch(&self, at: DateTime<Utc>) {
        self.data.lock().unwrap().last_seen = Some(at);
    }

    fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.data.lock().unwrap().last_seen
    }
}

/// In-memory session store keyed by session id.
///
/// The cookie carries only a signed session id; all session state stays
/// server-side in this map.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, Session>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an existing session, refreshing its last-seen time.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Session> {
        let session = self.sessions.get(&id).map(|entry| entry.value().clone());
        if let Some(session) = &session {
            session.touch(Utc::now());
        }
        session
    }

    /// Create a fresh session with a random id.
    #[must_use]
    pub fn create(&self) -> Session {
        let session = Session::new(Uuid::new_v4());
        session.touch(Utc::now());
        self.sessions.insert(session.id(), session.clone());
        session
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot of all live sessions, for diagnostics and tests.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Drop sessions idle for longer than `max_age` to keep memory bounded.
    pub fn cleanup_expired(&self, max_age: Duration) {
        let cutoff = Utc::now() - max_age;
        self.sessions
            .retain(|_, session| session.last_seen().is_some_and(|seen| seen > cutoff));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_roundtrip() {
        let store = SessionStore::new();
        let session = store.create();
        session.set_user_id(Some(Uuid::new_v4()));

        let fetched = store.get(session.id()).unwrap();
        assert_eq!(fetched.user_id(), session.user_id());
    }

    #[test]
    fn test_get_unknown_session() {
        let store = SessionStore::new();
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_take_flash_drains_messages() {
        let store = SessionStore::new();
        let session = store.create();
        session.flash(FlashKind::Alert, "Unauthorized Access!");

        let messages = session.take_flash();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, FlashKind::Alert);

        // A second read comes back empty
        assert!(session.take_flash().is_empty());
    }

    #[test]
    fn test_previous_url_persists_on_handle_clones() {
        let store = SessionStore::new();
        let session = store.create();
        session.set_previous_url("/en/page".to_string());

        let fetched = store.get(session.id()).unwrap();
        assert_eq!(fetched.previous_url().as_deref(), Some("/en/page"));
    }

    #[test]
    fn test_cleanup_expired_drops_idle_sessions() {
        let store = SessionStore::new();
        let _session = store.create();
        assert_eq!(store.len(), 1);

        store.cleanup_expired(Duration::seconds(-1));
        assert!(store.is_empty());
    }
}
