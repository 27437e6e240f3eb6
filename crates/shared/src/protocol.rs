use serde::{Deserialize, Serialize};

use crate::domain::{Profile, UserId};

pub const LOGIN_PATH: &str = "auth/login";
pub const REGISTER_PATH: &str = "auth/register";
pub const LOGOUT_PATH: &str = "auth/logout";
pub const PROFILE_PATH: &str = "auth/profile";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Profile responses arrive either bare or wrapped in a `data` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Wrapped { data: Profile },
    Bare(Profile),
}

impl ProfileResponse {
    pub fn into_profile(self) -> Profile {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(profile) => profile,
        }
    }
}
