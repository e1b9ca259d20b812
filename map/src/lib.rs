//! # Quarry Map
//!
//! The map document of the Quarry level editor.
//!
//! - [`scene`]: the object tree, stored in a generational arena
//! - [`operations`]: reversible edits recorded in the undo history
//! - [`visgroups`]: named visibility groups with tri-state indicators
//! - [`document`] / [`session`]: an open map, its observers and its history
//!
//! ```
//! use quarry_core::config::EditorConfig;
//! use quarry_map::operations::EditOperation;
//! use quarry_map::session::EditorSession;
//!
//! let mut session = EditorSession::new(&EditorConfig::default());
//! let root = session.document().scene().root();
//! let brush = session.document_mut().spawn("brush");
//! let create = EditOperation::create_under("Create brush", session.document().scene(), root, &[brush]);
//! session.execute(create).unwrap();
//!
//! session.undo().unwrap();
//! assert!(!session.document().scene().is_attached(brush));
//! session.redo().unwrap();
//! assert!(session.document().scene().is_attached(brush));
//! ```

pub mod document;
pub mod operations;
pub mod scene;
pub mod session;
pub mod visgroups;

pub use document::{Document, DocumentEvent, DocumentObserver};
pub use operations::{EditOperation, Placement};
pub use scene::{MapObject, ObjectId, SceneError, SceneGraph};
pub use session::{EditorSession, SharedSession};
pub use visgroups::{GroupId, GroupVisibility, VisgroupRegistry};
