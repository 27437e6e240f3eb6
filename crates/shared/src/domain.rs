use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(DocumentTypeId);
id_newtype!(CountryId);

pub const DEFAULT_DOCUMENT_TYPE_ID: DocumentTypeId = DocumentTypeId(1);
pub const DEFAULT_COUNTRY_ID: CountryId = CountryId(179);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Account creation payload. Built entirely on the client from form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationData {
    pub document_number: String,
    pub name: String,
    pub paternal_lastname: String,
    pub maternal_lastname: String,
    pub email: String,
    pub phone: String,
    pub user_name: String,
    pub password: String,
    pub last_session: NaiveDate,
    pub account_statement: bool,
    pub document_type_id: DocumentTypeId,
    pub country_id: CountryId,
}

impl RegistrationData {
    /// Empty form seeded with the classification defaults and `last_session`
    /// set to `today`.
    pub fn with_session_date(today: NaiveDate) -> Self {
        Self {
            document_number: String::new(),
            name: String::new(),
            paternal_lastname: String::new(),
            maternal_lastname: String::new(),
            email: String::new(),
            phone: String::new(),
            user_name: String::new(),
            password: String::new(),
            last_session: today,
            account_statement: true,
            document_type_id: DEFAULT_DOCUMENT_TYPE_ID,
            country_id: DEFAULT_COUNTRY_ID,
        }
    }
}

impl Default for RegistrationData {
    fn default() -> Self {
        Self::with_session_date(Local::now().date_naive())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub paternal_lastname: String,
    #[serde(default)]
    pub maternal_lastname: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<NamedRef>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        [
            self.name.as_str(),
            self.paternal_lastname.as_str(),
            self.maternal_lastname.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}
