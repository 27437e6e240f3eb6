//! HTTP implementation of the session manager and profile source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::{
    domain::{Credentials, Profile, RegistrationData},
    error::ApiErrorBody,
    protocol::{LoginResponse, ProfileResponse, LOGIN_PATH, LOGOUT_PATH, PROFILE_PATH, REGISTER_PATH},
};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::SessionError,
    session::{
        ProfileSource, ProfileState, ProfileStateTracker, SessionManager, SessionStatus,
        SessionStatusTracker,
    },
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Account service client. Construct once at startup and share it; it owns
/// the bearer token and publishes session/profile state.
pub struct AccountClient {
    http: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
    status: SessionStatusTracker,
    profile: ProfileStateTracker,
}

impl AccountClient {
    pub fn new(base_url: &str) -> Result<Self, SessionError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SessionError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SessionError::Transport)?;
        Self::with_http_client(http, base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self, SessionError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            token: RwLock::new(None),
            status: SessionStatusTracker::new(),
            profile: ProfileStateTracker::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        Ok(self.base_url.join(path)?)
    }

    async fn bearer_token(&self) -> Result<String, SessionError> {
        self.token
            .read()
            .await
            .clone()
            .ok_or(SessionError::NotAuthenticated)
    }

    async fn send(request: RequestBuilder) -> Result<Response, SessionError> {
        let response = request.send().await.map_err(SessionError::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.bytes().await.map_err(SessionError::Transport)?;
        let body = serde_json::from_slice::<ApiErrorBody>(&raw).unwrap_or_default();
        warn!(status = status.as_u16(), "account service rejected request");
        Err(SessionError::rejected(status.as_u16(), body))
    }

    async fn login_impl(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let response = Self::send(
            self.http
                .post(self.endpoint(LOGIN_PATH)?)
                .json(credentials),
        )
        .await?;
        let body: LoginResponse = response.json().await?;
        *self.token.write().await = Some(body.token);
        info!(user_id = body.user_id.map(|id| id.0), "session established");
        Ok(())
    }

    async fn register_impl(&self, data: &RegistrationData) -> Result<(), SessionError> {
        Self::send(self.http.post(self.endpoint(REGISTER_PATH)?).json(data)).await?;
        info!("account registered");
        Ok(())
    }

    async fn logout_impl(&self) -> Result<(), SessionError> {
        let token = self.token.write().await.take();
        self.profile.clear();

        let Some(token) = token else {
            debug!("logout requested without an active session");
            return Ok(());
        };

        let result = Self::send(
            self.http
                .post(self.endpoint(LOGOUT_PATH)?)
                .bearer_auth(token),
        )
        .await;
        match &result {
            Ok(_) => info!("session closed"),
            Err(err) => warn!("logout call failed, local session dropped anyway: {err}"),
        }
        result.map(|_| ())
    }

    async fn fetch_profile(&self) -> Result<Profile, SessionError> {
        let token = self.bearer_token().await?;
        let response = Self::send(
            self.http
                .get(self.endpoint(PROFILE_PATH)?)
                .bearer_auth(token),
        )
        .await?;
        let body: ProfileResponse = response.json().await?;
        Ok(body.into_profile())
    }
}

#[async_trait]
impl SessionManager for AccountClient {
    async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        self.status.track(self.login_impl(credentials)).await
    }

    async fn register(&self, data: &RegistrationData) -> Result<(), SessionError> {
        self.status.track(self.register_impl(data)).await
    }

    async fn logout(&self) -> Result<(), SessionError> {
        let result = self.logout_impl().await;
        self.status.reset();
        result
    }

    fn status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }
}

#[async_trait]
impl ProfileSource for AccountClient {
    async fn refresh(&self) -> Result<Profile, SessionError> {
        self.profile.track(self.fetch_profile()).await
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, SessionError> {
        let url = self.base_url.join(url)?;
        let response = Self::send(self.http.get(url)).await?;
        let bytes = response.bytes().await.map_err(SessionError::Transport)?;
        Ok(bytes.to_vec())
    }

    fn clear(&self) {
        self.profile.clear();
    }

    fn state(&self) -> watch::Receiver<ProfileState> {
        self.profile.subscribe()
    }
}

/// Parses the API base URL and makes sure relative endpoint paths are joined
/// beneath it rather than replacing its last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, SessionError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Ok(Url::parse(&with_slash)?)
}
