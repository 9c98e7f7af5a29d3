//! UI layer for desktop GUI: the form window and its status bar.

pub mod app;

pub use app::CloneAiApp;
