use shared::domain::Credentials;

use crate::controller::{
    events::{Notice, ServiceFailure},
    navigation::{NavigationState, Route},
    validation::{require_filled, FormField, ValidationOutcome},
    SubmitAction,
};

pub const MISSING_CREDENTIALS_NOTICE: &str = "Please fill in all fields";
pub const LOGIN_FAILED_FALLBACK: &str = "Could not sign in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn(Route),
    Failed(Notice),
    Ignored,
}

#[derive(Debug, Default)]
pub struct LoginScreen {
    credentials: Credentials,
    in_flight: bool,
}

impl LoginScreen {
    /// Mounts a fresh screen, pre-filling the email from a registration hint.
    pub fn mount(state: Option<NavigationState>) -> Self {
        let mut screen = Self::default();
        if let Some(email) = state.and_then(|state| state.registered_email) {
            screen.credentials.email = email;
        }
        screen
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn field_mut(&mut self, field: LoginField) -> &mut String {
        match field {
            LoginField::Email => &mut self.credentials.email,
            LoginField::Password => &mut self.credentials.password,
        }
    }

    pub fn set_field(&mut self, field: LoginField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn validate(&self) -> ValidationOutcome<LoginField> {
        require_filled([
            (LoginField::Email, self.credentials.email.as_str()),
            (LoginField::Password, self.credentials.password.as_str()),
        ])
    }

    pub fn submit(&mut self) -> SubmitAction<Credentials> {
        if self.in_flight {
            return SubmitAction::InFlight;
        }
        match self.validate() {
            ValidationOutcome::Valid => {
                self.in_flight = true;
                SubmitAction::Dispatch(self.credentials.clone())
            }
            ValidationOutcome::MissingFields(_) => {
                SubmitAction::Blocked(Notice::validation(MISSING_CREDENTIALS_NOTICE))
            }
        }
    }

    /// Releases the guard for a submit whose command was never queued.
    pub fn abort_submit(&mut self) {
        self.in_flight = false;
    }

    pub fn finish(&mut self, result: Result<(), ServiceFailure>) -> LoginOutcome {
        if !std::mem::take(&mut self.in_flight) {
            return LoginOutcome::Ignored;
        }
        match result {
            Ok(()) => LoginOutcome::SignedIn(Route::Profile),
            Err(failure) => LoginOutcome::Failed(Notice::error(
                failure
                    .service_message
                    .unwrap_or_else(|| LOGIN_FAILED_FALLBACK.to_string()),
            )),
        }
    }
}
