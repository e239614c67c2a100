//! In-memory session store.
//!
//! Every session lives in a single mutex-guarded map. Sessions with a finite
//! max-age get a timer task that evicts them at their deadline; the timer's
//! abort handle is kept next to the record so an explicit delete cancels it.
//! Lookups also check the deadline themselves, so an entry whose timer has
//! not run yet is never handed out.

use anyhow::Result;
use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::{Duration, SystemTime},
};
use tokio::{
    sync::Mutex,
    task::AbortHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, instrument};

use super::token::SessionToken;

type SessionMap = HashMap<SessionToken, Entry>;

/// Absolute expiry of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Expiry {
    Never,
    At(Instant),
}

impl Expiry {
    /// A zero or absent max-age never expires.
    fn after(max_age: Option<Duration>, now: Instant) -> Self {
        match max_age {
            Some(age) if !age.is_zero() => now.checked_add(age).map_or(Self::Never, Self::At),
            _ => Self::Never,
        }
    }

    #[must_use]
    pub fn is_expired(self, now: Instant) -> bool {
        matches!(self, Self::At(deadline) if now >= deadline)
    }
}

/// One authenticated browser session.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: SessionToken,
    pub username: String,
    pub created_at: SystemTime,
    pub expires_at: Expiry,
}

struct Entry {
    session: Session,
    timer: Option<AbortHandle>,
}

impl Entry {
    fn cancel_timer(&self) {
        if let Some(timer) = &self.timer {
            timer.abort();
        }
    }
}

/// Token to session mapping shared by every request handler.
///
/// Cloning is cheap; all clones operate on the same sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<SessionMap>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token for `username` and start tracking its session.
    ///
    /// # Errors
    /// Returns an error if a token could not be generated.
    #[instrument(skip(self))]
    pub async fn create(&self, username: &str, max_age: Option<Duration>) -> Result<SessionToken> {
        let token = SessionToken::generate()?;
        let expires_at = Expiry::after(max_age, Instant::now());

        // The timer is spawned under the lock, so it cannot run before the entry exists.
        let mut sessions = self.sessions.lock().await;
        let timer = match expires_at {
            Expiry::At(deadline) => Some(self.schedule_eviction(token.clone(), deadline)),
            Expiry::Never => None,
        };
        sessions.insert(
            token.clone(),
            Entry {
                session: Session {
                    token: token.clone(),
                    username: username.to_string(),
                    created_at: SystemTime::now(),
                    expires_at,
                },
                timer,
            },
        );
        drop(sessions);

        debug!("session created");

        Ok(token)
    }

    /// Return the live session for `token`, evicting it if its deadline passed.
    pub async fn lookup(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;

        let expired = sessions.get(token)?.session.expires_at.is_expired(Instant::now());
        if expired {
            if let Some(entry) = sessions.remove(token) {
                entry.cancel_timer();
                debug!(username = %entry.session.username, "evicted expired session on lookup");
            }
            return None;
        }

        sessions.get(token).map(|entry| entry.session.clone())
    }

    /// Remove the session for `token`. Unknown tokens are ignored.
    pub async fn delete(&self, token: &str) {
        let removed = self.sessions.lock().await.remove(token);
        if let Some(entry) = removed {
            entry.cancel_timer();
            debug!(username = %entry.session.username, "session deleted");
        }
    }

    /// Username bound to `token`, if the session is live.
    pub async fn username_for(&self, token: &str) -> Option<String> {
        self.lookup(token).await.map(|session| session.username)
    }

    /// Number of sessions that have not expired.
    pub async fn active_sessions(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .lock()
            .await
            .values()
            .filter(|entry| !entry.session.expires_at.is_expired(now))
            .count()
    }

    fn schedule_eviction(&self, token: SessionToken, deadline: Instant) -> AbortHandle {
        let sessions: Weak<Mutex<SessionMap>> = Arc::downgrade(&self.sessions);
        tokio::spawn(async move {
            sleep_until(deadline).await;

            let Some(sessions) = sessions.upgrade() else {
                return;
            };
            let removed = sessions.lock().await.remove(&token);
            if let Some(entry) = removed {
                debug!(username = %entry.session.username, "session expired");
            }
        })
        .abort_handle()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
