//! UI/backend events, notices, and error modeling for the desktop GUI controller.

use client_core::SessionError;
use shared::domain::Profile;

use crate::media::PreviewImage;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    LoginFinished(Result<(), ServiceFailure>),
    RegisterFinished {
        email: String,
        result: Result<(), ServiceFailure>,
    },
    LogoutFinished(Result<(), ServiceFailure>),
    ProfileFinished(Result<Profile, ServiceFailure>),
    AvatarLoaded {
        url: String,
        image: PreviewImage,
    },
    AvatarFailed {
        url: String,
        reason: String,
    },
}

/// Cloneable summary of a failed collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    pub service_message: Option<String>,
    pub field_messages: Vec<String>,
    pub detail: String,
    /// Taken from the typed error, never from the message text.
    pub category: UiErrorCategory,
}

#[cfg(test)]
impl ServiceFailure {
    pub fn message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            detail: message.clone(),
            service_message: Some(message),
            field_messages: Vec::new(),
            category: UiErrorCategory::Unknown,
        }
    }

    pub fn without_message(detail: impl Into<String>) -> Self {
        Self {
            service_message: None,
            field_messages: Vec::new(),
            detail: detail.into(),
            category: UiErrorCategory::Unknown,
        }
    }

    pub fn with_category(mut self, category: UiErrorCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_field_messages(mut self, messages: Vec<String>) -> Self {
        self.field_messages = messages;
        self
    }
}

impl From<&SessionError> for ServiceFailure {
    fn from(err: &SessionError) -> Self {
        Self {
            service_message: err.service_message().map(str::to_string),
            field_messages: err
                .body()
                .map(|body| body.field_messages())
                .unwrap_or_default(),
            detail: err.to_string(),
            category: category_of(err),
        }
    }
}

fn category_of(err: &SessionError) -> UiErrorCategory {
    if err.is_unauthorized() {
        return UiErrorCategory::Auth;
    }
    match err {
        SessionError::Transport(_) => UiErrorCategory::Transport,
        SessionError::Rejected {
            status: 400 | 422, ..
        } => UiErrorCategory::Validation,
        _ => UiErrorCategory::Unknown,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Error,
    Success,
}

/// Blocking message shown over the current screen until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Validation,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Login,
    Register,
    Logout,
    Profile,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Classifies untyped messages, such as worker startup failures, by
    /// keyword.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("unauthenticated")
            || message_lower.contains("not signed in")
            || message_lower.contains("invalid credential")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("422")
            || message_lower.contains("invalid")
            || message_lower.contains("required")
            || message_lower.contains("missing")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_failure(context: UiErrorContext, failure: &ServiceFailure) -> Self {
        let message = match &failure.service_message {
            Some(message) => format!("{}: {message}", failure.detail),
            None => failure.detail.clone(),
        };
        Self {
            category: failure.category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Authentication",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
