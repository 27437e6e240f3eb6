//! Bridge between the egui thread and the async account collaborators.

pub mod commands;
pub mod runtime;
