use shared::domain::RegistrationData;

use crate::controller::{
    events::{Notice, ServiceFailure},
    navigation::{NavigationState, Route},
    validation::{missing_labels, require_filled, FormField, ValidationOutcome},
    SubmitAction,
};

pub const REGISTERED_NOTICE: &str = "Account created successfully!";
pub const REGISTER_FAILED_FALLBACK: &str = "Could not register the account";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Name,
    PaternalLastname,
    MaternalLastname,
    DocumentNumber,
    Email,
    UserName,
    Phone,
    Password,
}

impl RegisterField {
    /// Form order.
    pub const ALL: [RegisterField; 8] = [
        Self::Name,
        Self::PaternalLastname,
        Self::MaternalLastname,
        Self::DocumentNumber,
        Self::Email,
        Self::UserName,
        Self::Phone,
        Self::Password,
    ];

    pub fn hint(self) -> &'static str {
        match self {
            Self::Name => "e.g. Juan",
            Self::PaternalLastname => "e.g. Pérez",
            Self::MaternalLastname => "e.g. García",
            Self::DocumentNumber => "e.g. 87654321",
            Self::Email => "user@company.com",
            Self::UserName => "e.g. jperez",
            Self::Phone => "e.g. 987654321",
            Self::Password => "••••••••",
        }
    }

    pub fn is_secret(self) -> bool {
        self == Self::Password
    }
}

impl FormField for RegisterField {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::PaternalLastname => "Paternal last name",
            Self::MaternalLastname => "Maternal last name",
            Self::DocumentNumber => "Document",
            Self::Email => "Email",
            Self::UserName => "Username",
            Self::Phone => "Phone",
            Self::Password => "Password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered {
        notice: Notice,
        route: Route,
        state: NavigationState,
    },
    Failed(Notice),
    Ignored,
}

#[derive(Debug)]
pub struct RegisterScreen {
    data: RegistrationData,
    in_flight: bool,
}

impl Default for RegisterScreen {
    fn default() -> Self {
        Self::mount(RegistrationData::default())
    }
}

impl RegisterScreen {
    pub fn mount(seed: RegistrationData) -> Self {
        Self {
            data: seed,
            in_flight: false,
        }
    }

    pub fn field_mut(&mut self, field: RegisterField) -> &mut String {
        match field {
            RegisterField::Name => &mut self.data.name,
            RegisterField::PaternalLastname => &mut self.data.paternal_lastname,
            RegisterField::MaternalLastname => &mut self.data.maternal_lastname,
            RegisterField::DocumentNumber => &mut self.data.document_number,
            RegisterField::Email => &mut self.data.email,
            RegisterField::UserName => &mut self.data.user_name,
            RegisterField::Phone => &mut self.data.phone,
            RegisterField::Password => &mut self.data.password,
        }
    }

    pub fn set_field(&mut self, field: RegisterField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn validate(&self) -> ValidationOutcome<RegisterField> {
        let data = &self.data;
        require_filled(RegisterField::ALL.map(|field| {
            let value = match field {
                RegisterField::Name => data.name.as_str(),
                RegisterField::PaternalLastname => data.paternal_lastname.as_str(),
                RegisterField::MaternalLastname => data.maternal_lastname.as_str(),
                RegisterField::DocumentNumber => data.document_number.as_str(),
                RegisterField::Email => data.email.as_str(),
                RegisterField::UserName => data.user_name.as_str(),
                RegisterField::Phone => data.phone.as_str(),
                RegisterField::Password => data.password.as_str(),
            };
            (field, value)
        }))
    }

    pub fn submit(&mut self) -> SubmitAction<RegistrationData> {
        if self.in_flight {
            return SubmitAction::InFlight;
        }
        match self.validate() {
            ValidationOutcome::Valid => {
                self.in_flight = true;
                SubmitAction::Dispatch(self.data.clone())
            }
            ValidationOutcome::MissingFields(fields) => SubmitAction::Blocked(Notice::validation(
                format!("Please fill in the required fields: {}", missing_labels(&fields)),
            )),
        }
    }

    pub fn abort_submit(&mut self) {
        self.in_flight = false;
    }

    pub fn finish(&mut self, email: String, result: Result<(), ServiceFailure>) -> RegisterOutcome {
        if !std::mem::take(&mut self.in_flight) {
            return RegisterOutcome::Ignored;
        }
        match result {
            Ok(()) => RegisterOutcome::Registered {
                notice: Notice::success(REGISTERED_NOTICE),
                route: Route::Login,
                state: NavigationState::registered(email),
            },
            Err(failure) => RegisterOutcome::Failed(Notice::error(failure_text(&failure))),
        }
    }
}

/// Field errors are flattened into one message per line; otherwise the
/// service message (or the fallback) is shown.
pub fn failure_text(failure: &ServiceFailure) -> String {
    if failure.field_messages.is_empty() {
        format!(
            "Error: {}",
            failure
                .service_message
                .as_deref()
                .unwrap_or(REGISTER_FAILED_FALLBACK)
        )
    } else {
        format!("Errors:\n\n{}", failure.field_messages.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::domain::{DEFAULT_COUNTRY_ID, DEFAULT_DOCUMENT_TYPE_ID};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).expect("date")
    }

    fn filled() -> RegisterScreen {
        let mut screen = RegisterScreen::mount(RegistrationData::with_session_date(today()));
        for field in RegisterField::ALL {
            screen.set_field(field, format!("{} value", field.label()));
        }
        screen.set_field(RegisterField::Email, "ana@example.com");
        screen
    }

    #[test]
    fn payload_keeps_defaulted_fields() {
        let mut screen = filled();
        let SubmitAction::Dispatch(payload) = screen.submit() else {
            panic!("expected dispatch");
        };

        assert!(payload.account_statement);
        assert_eq!(payload.document_type_id, DEFAULT_DOCUMENT_TYPE_ID);
        assert_eq!(payload.document_type_id.0, 1);
        assert_eq!(payload.country_id, DEFAULT_COUNTRY_ID);
        assert_eq!(payload.country_id.0, 179);
        assert_eq!(payload.last_session, today());
    }

    #[test]
    fn missing_required_fields_block_submission() {
        let mut screen = filled();
        screen.set_field(RegisterField::Phone, "");
        screen.set_field(RegisterField::Name, "");

        assert_eq!(
            screen.validate(),
            ValidationOutcome::MissingFields(vec![RegisterField::Name, RegisterField::Phone])
        );
        assert_eq!(
            screen.submit(),
            SubmitAction::Blocked(Notice::validation(
                "Please fill in the required fields: Name, Phone"
            ))
        );
        assert!(!screen.is_in_flight());
    }

    #[test]
    fn success_forwards_registered_email_to_login() {
        let mut screen = filled();
        screen.submit();

        assert_eq!(
            screen.finish("ana@example.com".into(), Ok(())),
            RegisterOutcome::Registered {
                notice: Notice::success(REGISTERED_NOTICE),
                route: Route::Login,
                state: NavigationState::registered("ana@example.com"),
            }
        );
    }

    #[test]
    fn field_errors_are_flattened_line_by_line() {
        let failure = ServiceFailure::message("The given data was invalid.").with_field_messages(
            vec![
                "The email has already been taken.".into(),
                "The user name has already been taken.".into(),
            ],
        );
        assert_eq!(
            failure_text(&failure),
            "Errors:\n\nThe email has already been taken.\nThe user name has already been taken."
        );
    }

    #[test]
    fn single_message_and_fallback() {
        assert_eq!(
            failure_text(&ServiceFailure::message("Server exploded")),
            "Error: Server exploded"
        );
        assert_eq!(
            failure_text(&ServiceFailure::without_message("timed out")),
            format!("Error: {REGISTER_FAILED_FALLBACK}")
        );
    }

    #[test]
    fn stale_result_without_pending_submit_is_ignored() {
        let mut screen = filled();
        assert_eq!(
            screen.finish("ana@example.com".into(), Ok(())),
            RegisterOutcome::Ignored
        );
    }
}
