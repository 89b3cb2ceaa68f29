//! UI layer for the directory viewer: the app shell and its table widgets.

pub mod app;

pub use app::{DirectoryGuiApp, StartupConfig};
