//! Backend commands queued from UI to backend worker.

use shared::domain::{Credentials, RegistrationData};

pub enum BackendCommand {
    Login(Credentials),
    Register(RegistrationData),
    Logout,
    LoadProfile,
    FetchAvatar { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::LoadProfile => "load_profile",
            Self::FetchAvatar { .. } => "fetch_avatar",
        }
    }
}
