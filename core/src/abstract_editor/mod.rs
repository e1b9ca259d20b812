//! Abstract editor framework for reversible editing operations.
//!
//! This module provides the foundational traits and types for building
//! an undo/redo-capable editor. It is decoupled from concrete documents
//! (maps, scene graphs, textures) so that higher-level crates can plug
//! in their own targets and action sets.
//!
//! - [`Editable`]: a document that actions operate on
//! - [`EditAction`]: an edit operation (Command pattern)
//! - [`EditActionHistory`]: bounded undo/redo sequence with a cursor
//!
//! # Disposal
//!
//! When the history drops an action for good (capacity eviction, redo
//! truncation, [`EditActionHistory::clear`]), it calls
//! [`EditAction::dispose`] with a flag telling whether the action is
//! currently applied. Actions that keep detached data alive for a later
//! redo use this to release it, and must leave live data alone, including
//! data another recorded action still needs. [`EditAction::recorded`] runs
//! when an action enters the history, before anything older is dropped, so
//! actions can track what they share.
//!
//! # Failed steps
//!
//! An undo or redo that finds the target in an unexpected state returns an
//! error without moving the cursor. The action is responsible for leaving
//! the target unchanged in that case.

mod action;
mod history;

pub use action::{EditAction, EditActionError, EditActionResult, EditChange, Editable};
pub use history::{DEFAULT_MAX_UNDO, EditActionHistory};
