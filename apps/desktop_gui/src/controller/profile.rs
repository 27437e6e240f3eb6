use client_core::ProfileState;
use shared::domain::Profile;

use crate::controller::events::ServiceFailure;

pub const DEFAULT_ROLE_LABEL: &str = "User";
pub const MISSING_PHONE_LABEL: &str = "Not registered";
pub const MISSING_COUNTRY_LABEL: &str = "Not available";

/// The three mutually exclusive renderings of the profile screen.
#[derive(Debug, PartialEq, Eq)]
pub enum ProfileView<'a> {
    Loading,
    Error(&'a str),
    Ready(ProfileCard<'a>),
}

/// Loading wins over everything, including a profile left over from an
/// earlier load. With no profile and no error yet, the load is still pending.
pub fn select_view(state: &ProfileState) -> ProfileView<'_> {
    if state.loading {
        return ProfileView::Loading;
    }
    if let Some(error) = state.error.as_deref() {
        return ProfileView::Error(error);
    }
    match &state.profile {
        Some(profile) => ProfileView::Ready(ProfileCard { profile }),
        None => ProfileView::Loading,
    }
}

/// First letter of the name and of the paternal surname, uppercased. Missing
/// parts are skipped.
pub fn initials(name: &str, paternal_lastname: &str) -> String {
    [name, paternal_lastname]
        .iter()
        .filter_map(|part| part.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileCard<'a> {
    profile: &'a Profile,
}

impl<'a> ProfileCard<'a> {
    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn display_name(&self) -> String {
        self.profile.full_name()
    }

    pub fn initials(&self) -> String {
        initials(&self.profile.name, &self.profile.paternal_lastname)
    }

    pub fn image_url(&self) -> Option<&'a str> {
        self.profile
            .image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn role_label(&self) -> &'a str {
        self.profile
            .role
            .as_ref()
            .map(|role| role.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_ROLE_LABEL)
    }

    pub fn phone_label(&self) -> &'a str {
        self.profile
            .phone
            .as_deref()
            .filter(|phone| !phone.is_empty())
            .unwrap_or(MISSING_PHONE_LABEL)
    }

    pub fn country_label(&self) -> &'a str {
        self.profile
            .country
            .as_ref()
            .map(|country| country.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(MISSING_COUNTRY_LABEL)
    }

    pub fn id_label(&self) -> String {
        format!("#{}", self.profile.id.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarState {
    Initials,
    Loading(String),
    Ready(String),
    Failed(String),
}

#[derive(Debug)]
pub struct ProfileScreen {
    avatar: AvatarState,
    logout_in_flight: bool,
}

impl Default for ProfileScreen {
    fn default() -> Self {
        Self::mount()
    }
}

impl ProfileScreen {
    pub fn mount() -> Self {
        Self {
            avatar: AvatarState::Initials,
            logout_in_flight: false,
        }
    }

    pub fn avatar(&self) -> &AvatarState {
        &self.avatar
    }

    /// Returns the image url to download when the loaded profile carries one
    /// that has not been requested yet.
    pub fn on_profile_loaded(&mut self, profile: &Profile) -> Option<String> {
        let card = ProfileCard { profile };
        let Some(url) = card.image_url() else {
            self.avatar = AvatarState::Initials;
            return None;
        };
        let already_requested = match &self.avatar {
            AvatarState::Loading(current)
            | AvatarState::Ready(current)
            | AvatarState::Failed(current) => current == url,
            AvatarState::Initials => false,
        };
        if already_requested {
            return None;
        }
        self.avatar = AvatarState::Loading(url.to_string());
        Some(url.to_string())
    }

    pub fn on_avatar_result(&mut self, url: &str, loaded: bool) {
        if self.avatar != AvatarState::Loading(url.to_string()) {
            return;
        }
        self.avatar = if loaded {
            AvatarState::Ready(url.to_string())
        } else {
            AvatarState::Failed(url.to_string())
        };
    }

    pub fn is_logging_out(&self) -> bool {
        self.logout_in_flight
    }

    /// `true` when a logout call should be dispatched.
    pub fn request_logout(&mut self) -> bool {
        !std::mem::replace(&mut self.logout_in_flight, true)
    }

    /// Drops a logout that could not be queued. Returns `true` if one was
    /// pending.
    pub fn abort_logout(&mut self) -> bool {
        let pending = std::mem::take(&mut self.logout_in_flight);
        if pending {
            tracing::warn!("logout command not queued; returning to login");
        }
        pending
    }

    /// Logout always ends on the login screen; a failure is only logged.
    pub fn finish_logout(&mut self, result: Result<(), ServiceFailure>) {
        self.logout_in_flight = false;
        if let Err(failure) = result {
            tracing::warn!(detail = %failure.detail, "logout failed; continuing to login");
        }
    }
}
