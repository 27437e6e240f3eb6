use shared::error::ApiErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("account service rejected the request with status {status}")]
    Rejected { status: u16, body: ApiErrorBody },
    #[error("account service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid account service response: {0}")]
    Decode(String),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("invalid account service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SessionError {
    pub fn rejected(status: u16, body: ApiErrorBody) -> Self {
        Self::Rejected { status, body }
    }

    pub fn rejected_with_message(status: u16, message: impl Into<String>) -> Self {
        Self::rejected(status, ApiErrorBody::with_message(message))
    }

    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Message supplied by the account service itself, if any.
    pub fn service_message(&self) -> Option<&str> {
        self.body().and_then(ApiErrorBody::message)
    }

    /// Text published on the observable status: the service message when
    /// present, otherwise the error's own description.
    pub fn status_text(&self) -> String {
        self.service_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
            || matches!(self, Self::Rejected { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value)
        }
    }
}
