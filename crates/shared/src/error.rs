use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error body returned by the account service on a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, FieldMessages>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

impl FieldMessages {
    fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::One(message) => std::slice::from_ref(message),
            Self::Many(messages) => messages,
        };
        slice.iter().map(String::as_str)
    }
}

impl ApiErrorBody {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn has_field_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// Every field message, ordered by field name.
    pub fn field_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|errors| errors.values())
            .flat_map(FieldMessages::iter)
            .map(str::to_string)
            .collect()
    }

    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}
