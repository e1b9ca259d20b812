//! An open map together with its undo history.

use std::sync::Arc;

use parking_lot::Mutex;
use quarry_core::abstract_editor::{EditActionHistory, EditActionResult};
use quarry_core::config::EditorConfig;

use crate::document::Document;
use crate::operations::EditOperation;
use crate::visgroups::{GroupId, ToggleReport, VisgroupResult};

/// Undo history of a map document.
pub type MapHistory = EditActionHistory<Document, EditOperation>;

/// A session shared between the UI and background tools.
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// One open map and its history.
///
/// All edits that should be undoable go through [`execute`](Self::execute).
/// Visgroup toggles change visibility only and are not recorded.
#[derive(Debug)]
pub struct EditorSession {
    document: Document,
    history: MapHistory,
}

impl EditorSession {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    /// Opens an existing document with an empty history.
    pub fn with_document(mut document: Document, config: &EditorConfig) -> Self {
        document.refresh_indicators();
        log::info!(
            "Opened document with {} objects, undo capacity {}",
            document.scene().object_count(),
            config.history.capacity
        );
        Self {
            document,
            history: MapHistory::with_config(&config.history),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for changes that are not recorded, such as spawning
    /// detached objects or editing the visgroup list.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &MapHistory {
        &self.history
    }

    /// Applies an operation and records it. A failed operation leaves the
    /// document and the history untouched.
    pub fn execute(&mut self, operation: EditOperation) -> EditActionResult {
        self.history.execute(operation, &mut self.document)
    }

    pub fn undo(&mut self) -> EditActionResult<bool> {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> EditActionResult<bool> {
        self.history.redo(&mut self.document)
    }

    pub fn clear_history(&mut self) {
        self.history.clear(&mut self.document);
    }

    pub fn set_history_capacity(&mut self, capacity: usize) {
        self.history.set_capacity(capacity, &mut self.document);
    }

    pub fn toggle_group(&mut self, group: GroupId, visible: bool) -> VisgroupResult<ToggleReport> {
        self.document.toggle_group(group, visible)
    }

    pub fn show_all(&mut self) {
        self.document.show_all();
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.history.has_unsaved_changes()
    }

    /// Discards the history, releasing everything only it kept alive, and
    /// returns the document.
    pub fn close(mut self) -> Document {
        self.history.clear(&mut self.document);
        self.document
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
