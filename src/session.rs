use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::core::view::admin::AdminView;

pub const SESSION_COOKIE: &str = "portal_admin";

pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(12 * 60 * 60);

pub type SharedView = Arc<Mutex<AdminView>>;

#[derive(Debug)]
struct Session {
    view: SharedView,
    last_seen: Instant,
}

impl Session {
    fn is_expired(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= idle_timeout
    }
}

/// In-memory admin sessions keyed by an opaque cookie token.
///
/// Sessions only exist for unlocked views. They vanish on logout, restart,
/// or after `idle_timeout` without a request.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_SESSION_IDLE)
    }
}

impl SessionStore {
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub async fn open(&self, view: AdminView) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        self.prune(&mut sessions, now);
        sessions.insert(
            token.clone(),
            Session {
                view: Arc::new(Mutex::new(view)),
                last_seen: now,
            },
        );
        token
    }

    /// Looks up a live session and marks it as seen. Expired tokens yield `None`.
    pub async fn get(&self, token: &str) -> Option<SharedView> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        self.prune(&mut sessions, now);
        let session = sessions.get_mut(token)?;
        session.last_seen = now;
        Some(session.view.clone())
    }

    pub async fn close(&self, token: &str) -> Option<SharedView> {
        self.sessions
            .lock()
            .await
            .remove(token)
            .map(|session| session.view)
    }

    fn prune(&self, sessions: &mut HashMap<String, Session>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.idle_timeout));
        let expired = before - sessions.len();
        if expired > 0 {
            debug!(expired, "pruned idle admin sessions");
        }
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/admin; HttpOnly; SameSite=Strict")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/admin; HttpOnly; SameSite=Strict; Max-Age=0")
}
