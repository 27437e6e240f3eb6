//! Controller layer: screen state machines, navigation, UI events, and command orchestration.

pub mod events;
pub mod login;
pub mod navigation;
pub mod orchestration;
pub mod profile;
pub mod register;
pub mod shell;
pub mod validation;

use crate::controller::events::Notice;

/// What a form screen asks for when its submit control is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction<T> {
    Dispatch(T),
    Blocked(Notice),
    InFlight,
}
