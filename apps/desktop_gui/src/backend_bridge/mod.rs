//! Bridge between the UI thread and the directory worker thread.

pub mod commands;
pub mod runtime;
