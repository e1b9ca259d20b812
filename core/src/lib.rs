//! # Quarry Core
//!
//! Editor framework shared by the Quarry map editor crates: reversible
//! actions, the bounded undo/redo history, and editor configuration.

pub mod abstract_editor;
pub mod config;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
