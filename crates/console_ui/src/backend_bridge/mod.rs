//! Bridge between the UI-thread controllers and the async backend worker.

pub mod commands;
pub mod runtime;
