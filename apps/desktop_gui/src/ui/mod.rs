//! egui rendering of the account screens.

pub mod app;
pub mod widgets;

pub use app::AccountApp;
