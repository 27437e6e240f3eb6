//! In-memory account collaborator for controller and worker tests.

use std::sync::Mutex;

use async_trait::async_trait;
use client_core::{
    ProfileSource, ProfileState, ProfileStateTracker, SessionError, SessionManager, SessionStatus,
    SessionStatusTracker,
};
use shared::domain::{Credentials, Profile, RegistrationData, UserId};
use tokio::sync::watch;

#[derive(Default)]
pub struct FakeAccount {
    login_error: Option<String>,
    status: SessionStatusTracker,
    profile: ProfileStateTracker,
    login_calls: Mutex<u32>,
    logout_calls: Mutex<u32>,
    registered: Mutex<Vec<RegistrationData>>,
}

impl FakeAccount {
    pub fn rejecting_login(message: &str) -> Self {
        Self {
            login_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn login_calls(&self) -> u32 {
        *self.login_calls.lock().expect("login calls")
    }

    pub fn logout_calls(&self) -> u32 {
        *self.logout_calls.lock().expect("logout calls")
    }

    pub fn registered_payloads(&self) -> Vec<RegistrationData> {
        self.registered.lock().expect("registrations").clone()
    }
}

pub fn sample_profile() -> Profile {
    Profile {
        id: UserId(7),
        name: "Juan".into(),
        paternal_lastname: "Pérez".into(),
        maternal_lastname: "García".into(),
        email: "juan@example.com".into(),
        phone: Some("987654321".into()),
        user_name: "jperez".into(),
        image_url: None,
        role: None,
        country: None,
    }
}

#[async_trait]
impl SessionManager for FakeAccount {
    async fn login(&self, _credentials: &Credentials) -> Result<(), SessionError> {
        *self.login_calls.lock().expect("login calls") += 1;
        let outcome = match &self.login_error {
            Some(message) => Err(SessionError::rejected_with_message(401, message.clone())),
            None => Ok(()),
        };
        self.status.track(async move { outcome }).await
    }

    async fn register(&self, data: &RegistrationData) -> Result<(), SessionError> {
        self.registered
            .lock()
            .expect("registrations")
            .push(data.clone());
        self.status.track(async { Ok(()) }).await
    }

    async fn logout(&self) -> Result<(), SessionError> {
        *self.logout_calls.lock().expect("logout calls") += 1;
        Ok(())
    }

    fn status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }
}

#[async_trait]
impl ProfileSource for FakeAccount {
    async fn refresh(&self) -> Result<Profile, SessionError> {
        self.profile.track(async { Ok(sample_profile()) }).await
    }

    async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>, SessionError> {
        Err(SessionError::rejected_with_message(404, "Not found"))
    }

    fn clear(&self) {
        self.profile.clear();
    }

    fn state(&self) -> watch::Receiver<ProfileState> {
        self.profile.subscribe()
    }
}
