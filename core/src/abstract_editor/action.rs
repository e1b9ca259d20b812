//! Editable targets and reversible editor actions.
//!
//! This module defines the core abstractions for an undo/redo editor system:
//!
//! - [`Editable`]: a document that actions operate on
//! - [`EditAction`]: a reversible edit operation (Command pattern)
//! - [`EditChange`]: the notification passed to [`Editable::changed`]
//! - [`EditActionError`] / [`EditActionResult`]: error handling for actions
//!
//! EditActions are self-contained: each implementation captures whatever
//! data it needs (target identifiers, old/new values, placements, etc.)
//! when it is constructed, before the target is mutated.

use std::fmt;

/// What kind of history step just mutated an [`Editable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditChange {
    /// A new action was applied for the first time.
    Applied,
    /// An action was reverted by undo.
    Undone,
    /// An action was re-applied by redo.
    Redone,
}

/// A type that serves as an editing target.
///
/// Implement this on any document actions can operate on: a map, a scene
/// graph, a texture, etc. The history calls [`changed`](Self::changed)
/// exactly once after every executed, undone or redone action so it can
/// tell its listeners (display lists, panels) to refresh.
///
/// # Example
///
/// ```ignore
/// struct MyScene { /* ... */ }
/// impl Editable for MyScene {}
/// ```
pub trait Editable: 'static {
    /// Called after the target has been mutated by a history step.
    ///
    /// Default: does nothing.
    fn changed(&mut self, _change: EditChange) {}
}

/// Error type for action execution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditActionError {
    /// The target object was not found.
    #[error("target not found: {0}")]
    TargetNotFound(String),
    /// The target is in an invalid state for this action.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// The live target no longer matches what the action captured, usually
    /// because it was mutated outside of the history.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    /// A custom error with a description.
    #[error("{0}")]
    Custom(String),
}

/// Result type for action operations.
pub type EditActionResult<T = ()> = Result<T, EditActionError>;

/// A reversible editor action (Command pattern).
///
/// EditActions encapsulate a single logical edit and capture enough state to
/// undo the change and redo it. Calling [`undo`](Self::undo) after
/// [`apply`](Self::apply) must restore the target exactly, and vice versa.
///
/// A failing `apply` or `undo` must leave the target unchanged: verify the
/// captured state first, or roll back the partial work before returning.
///
/// # Object Safety
///
/// This trait is dyn-compatible so that unrelated action types can share one
/// [`EditActionHistory`](super::EditActionHistory) as
/// `Box<dyn EditAction<T>>`. A closed set of actions can instead be a single
/// enum that implements this trait and dispatches by `match`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct MoveEntity {
///     entity: Entity,
///     old_pos: Vec3,
///     new_pos: Vec3,
/// }
///
/// impl EditAction<World> for MoveEntity {
///     fn apply(&mut self, target: &mut World) -> EditActionResult {
///         target.set_position(self.entity, self.new_pos);
///         Ok(())
///     }
///
///     fn undo(&mut self, target: &mut World) -> EditActionResult {
///         target.set_position(self.entity, self.old_pos);
///         Ok(())
///     }
///
///     fn description(&self) -> &str {
///         "Move entity"
///     }
/// }
/// ```
pub trait EditAction<T: Editable>: fmt::Debug + Send {
    /// Applies the action to the target (forward / redo direction).
    fn apply(&mut self, target: &mut T) -> EditActionResult;

    /// Reverses the action (undo direction).
    ///
    /// Must restore the target to the state before [`apply`](Self::apply)
    /// was called.
    fn undo(&mut self, target: &mut T) -> EditActionResult;

    /// A short, human-readable description for display in the edit menu.
    ///
    /// Examples: `"Create brush"`, `"Delete objects"`, `"Rename entity"`.
    fn description(&self) -> &str;

    /// Called once when the history takes ownership of the action, before
    /// any older entry is discarded to make room for it.
    ///
    /// Actions that share target data with other entries can register
    /// their interest here and drop it again in [`dispose`](Self::dispose).
    ///
    /// Default: does nothing.
    fn recorded(&mut self, _target: &mut T) {}

    /// Releases whatever the action exclusively owns, once the history
    /// drops it for good (capacity eviction, redo truncation, clear).
    ///
    /// `applied` tells whether the action's effect is currently in the
    /// target. Implementations must never destroy data that is still
    /// live in the target or still needed by another recorded action.
    ///
    /// Default: does nothing.
    fn dispose(&mut self, _target: &mut T, _applied: bool) {}
}

impl<T: Editable> EditAction<T> for Box<dyn EditAction<T>> {
    fn apply(&mut self, target: &mut T) -> EditActionResult {
        (**self).apply(target)
    }

    fn undo(&mut self, target: &mut T) -> EditActionResult {
        (**self).undo(target)
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn recorded(&mut self, target: &mut T) {
        (**self).recorded(target)
    }

    fn dispose(&mut self, target: &mut T, applied: bool) {
        (**self).dispose(target, applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: i32,
        changes: Vec<EditChange>,
    }

    impl Editable for Counter {
        fn changed(&mut self, change: EditChange) {
            self.changes.push(change);
        }
    }

    #[derive(Debug)]
    struct Add {
        amount: i32,
    }

    impl EditAction<Counter> for Add {
        fn apply(&mut self, target: &mut Counter) -> EditActionResult {
            target.value += self.amount;
            Ok(())
        }

        fn undo(&mut self, target: &mut Counter) -> EditActionResult {
            target.value -= self.amount;
            Ok(())
        }

        fn description(&self) -> &str {
            "Add"
        }
    }

    #[test]
    fn apply_modifies_target() {
        let mut counter = Counter::default();
        let mut action = Add { amount: 5 };
        action.apply(&mut counter).unwrap();
        assert_eq!(counter.value, 5);
    }

    #[test]
    fn undo_reverses_apply() {
        let mut counter = Counter::default();
        let mut action = Add { amount: 5 };
        action.apply(&mut counter).unwrap();
        action.undo(&mut counter).unwrap();
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn action_error_display() {
        assert_eq!(
            EditActionError::TargetNotFound("object 42".into()).to_string(),
            "target not found: object 42"
        );
        assert_eq!(
            EditActionError::InvalidState("locked".into()).to_string(),
            "invalid state: locked"
        );
        assert_eq!(
            EditActionError::ProtocolViolation("moved behind our back".into()).to_string(),
            "protocol violation: moved behind our back"
        );
        assert_eq!(
            EditActionError::Custom("something went wrong".into()).to_string(),
            "something went wrong"
        );
    }

    #[test]
    fn boxed_action_delegates() {
        let mut counter = Counter::default();
        let mut boxed: Box<dyn EditAction<Counter>> = Box::new(Add { amount: 3 });
        boxed.apply(&mut counter).unwrap();
        assert_eq!(counter.value, 3);
        assert_eq!(boxed.description(), "Add");
        boxed.dispose(&mut counter, true);
        boxed.undo(&mut counter).unwrap();
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn default_changed_hook_is_noop() {
        struct Silent;
        impl Editable for Silent {}

        let mut silent = Silent;
        silent.changed(EditChange::Undone);
    }

    #[test]
    fn changed_hook_records_kind() {
        let mut counter = Counter::default();
        counter.changed(EditChange::Redone);
        assert_eq!(counter.changes, vec![EditChange::Redone]);
    }
}
