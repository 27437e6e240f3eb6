//! Account service client: session management and profile loading.

pub mod account;
pub mod error;
pub mod session;

pub use account::{normalize_base_url, AccountClient, DEFAULT_REQUEST_TIMEOUT};
pub use error::SessionError;
pub use session::{
    ProfileSource, ProfileState, ProfileStateTracker, SessionManager, SessionStatus,
    SessionStatusTracker,
};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
