//! Session and profile collaborator contracts plus their observable state.

use std::future::Future;

use async_trait::async_trait;
use shared::domain::{Credentials, Profile, RegistrationData};
use tokio::sync::watch;

use crate::error::SessionError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

#[async_trait]
pub trait SessionManager: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<(), SessionError>;
    async fn register(&self, data: &RegistrationData) -> Result<(), SessionError>;
    /// Ends the current session. The local session is dropped even when the
    /// service call fails.
    async fn logout(&self) -> Result<(), SessionError>;
    fn status(&self) -> watch::Receiver<SessionStatus>;
}

#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn refresh(&self) -> Result<Profile, SessionError>;
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, SessionError>;
    fn clear(&self);
    fn state(&self) -> watch::Receiver<ProfileState>;
}

/// Publishes `loading`/`error` around session calls.
pub struct SessionStatusTracker {
    tx: watch::Sender<SessionStatus>,
}

impl Default for SessionStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStatusTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionStatus::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SessionStatus {
        self.tx.borrow().clone()
    }

    pub async fn track<T, F>(&self, call: F) -> Result<T, SessionError>
    where
        F: Future<Output = Result<T, SessionError>>,
    {
        self.tx.send_modify(|status| {
            status.loading = true;
            status.error = None;
        });
        let result = call.await;
        let error = result.as_ref().err().map(SessionError::status_text);
        self.tx.send_modify(|status| {
            status.loading = false;
            status.error = error;
        });
        result
    }

    pub fn reset(&self) {
        self.tx.send_modify(|status| *status = SessionStatus::default());
    }
}

pub struct ProfileStateTracker {
    tx: watch::Sender<ProfileState>,
}

impl Default for ProfileStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStateTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ProfileState::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> ProfileState {
        self.tx.borrow().clone()
    }

    /// Runs a profile load. A previously loaded profile stays in place while
    /// the new load is pending.
    pub async fn track<F>(&self, load: F) -> Result<Profile, SessionError>
    where
        F: Future<Output = Result<Profile, SessionError>>,
    {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        let result = load.await;
        self.tx.send_modify(|state| {
            state.loading = false;
            match &result {
                Ok(profile) => {
                    state.profile = Some(profile.clone());
                    state.error = None;
                }
                Err(err) => state.error = Some(err.status_text()),
            }
        });
        result
    }

    pub fn clear(&self) {
        self.tx.send_modify(|state| *state = ProfileState::default());
    }
}
