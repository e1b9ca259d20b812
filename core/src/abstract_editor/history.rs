//! Undo/redo action history.
//!
//! [`EditActionHistory`] keeps a bounded, ordered sequence of actions and a
//! cursor marking the last applied one. Actions after the cursor form the
//! redo stack; recording a new action discards them. When the sequence is
//! full, the oldest entries are evicted from the front, so the most recent
//! edits are always the ones kept.

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use super::action::{EditAction, EditActionResult, EditChange, Editable};
use crate::config::HistoryConfig;

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Manages a bounded undo/redo sequence of editor actions.
///
/// Entries `0..=cursor` have been applied to the target; entries after the
/// cursor have been undone and can be redone. The history never applies an
/// action on [`record`](Self::record): the caller has already done that
/// (or use [`execute`](Self::execute), which does both).
///
/// `A` defaults to `Box<dyn EditAction<T>>`; a closed enum of actions can
/// be used instead to avoid dynamic dispatch.
///
/// # Example
///
/// ```ignore
/// let mut history = EditActionHistory::new(50);
/// let mut target = MyScene::new();
///
/// // Execute and record an action
/// history.execute(Box::new(my_action), &mut target)?;
///
/// // Undo the last action, then redo it
/// history.undo(&mut target)?;
/// history.redo(&mut target)?;
/// ```
pub struct EditActionHistory<T: Editable, A: EditAction<T> = Box<dyn EditAction<T>>> {
    actions: VecDeque<A>,
    /// Number of applied entries at the front of `actions` (cursor + 1).
    applied: usize,
    capacity: usize,
    /// Value of `applied` when the target was last saved.
    ///
    /// `None` means never saved or the save point is permanently unreachable
    /// (evicted, or part of a discarded redo branch).
    saved_at: Option<usize>,
    _target: PhantomData<fn(&mut T)>,
}

impl<T: Editable, A: EditAction<T>> EditActionHistory<T, A> {
    /// Creates a new empty history holding at most `capacity` actions.
    ///
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            actions: VecDeque::new(),
            applied: 0,
            capacity: sanitize_capacity(capacity),
            saved_at: Some(0),
            _target: PhantomData,
        }
    }

    /// Creates a new empty history sized by `config`.
    pub fn with_config(config: &HistoryConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Records an action that the caller has already applied to `target`.
    ///
    /// The action is told it was recorded, then every action after the
    /// cursor is disposed and removed. Then the oldest entries are evicted
    /// until the new action fits, and the cursor is placed on the new action.
    pub fn record(&mut self, mut action: A, target: &mut T) {
        action.recorded(target);
        self.discard_redo(target);
        while self.actions.len() > self.capacity - 1 {
            self.evict_oldest(target);
        }

        log::debug!(
            "Recorded \"{}\" ({} of {} history entries)",
            action.description(),
            self.actions.len() + 1,
            self.capacity
        );
        self.actions.push_back(action);
        self.applied = self.actions.len();
    }

    /// Applies an action to the target and records it.
    ///
    /// If the action fails, nothing is recorded and the history is left
    /// untouched.
    pub fn execute(&mut self, mut action: A, target: &mut T) -> EditActionResult {
        action.apply(target)?;
        target.changed(EditChange::Applied);
        self.record(action, target);
        Ok(())
    }

    /// Undoes the action at the cursor and moves the cursor back.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. If the action
    /// refuses to undo, the error is returned and the cursor stays put.
    pub fn undo(&mut self, target: &mut T) -> EditActionResult<bool> {
        let Some(index) = self.applied.checked_sub(1) else {
            return Ok(false);
        };
        let action = &mut self.actions[index];
        if let Err(err) = action.undo(target) {
            log::warn!("Undo of \"{}\" rejected: {err}", action.description());
            return Err(err);
        }
        self.applied = index;
        target.changed(EditChange::Undone);
        Ok(true)
    }

    /// Re-applies the action after the cursor and moves the cursor forward.
    ///
    /// Returns `Ok(false)` when there is nothing to redo. If the action
    /// refuses to apply, the error is returned and the cursor stays put.
    pub fn redo(&mut self, target: &mut T) -> EditActionResult<bool> {
        let Some(action) = self.actions.get_mut(self.applied) else {
            return Ok(false);
        };
        if let Err(err) = action.apply(target) {
            log::warn!("Redo of \"{}\" rejected: {err}", action.description());
            return Err(err);
        }
        self.applied += 1;
        target.changed(EditChange::Redone);
        Ok(true)
    }

    /// Disposes every action and resets the cursor.
    ///
    /// If the target was at its save point, it stays saved. Otherwise the
    /// save point is permanently lost.
    pub fn clear(&mut self, target: &mut T) {
        log::debug!("Clearing {} history entries", self.actions.len());
        let applied = self.applied;
        for (index, mut action) in self.actions.drain(..).enumerate() {
            action.dispose(target, index < applied);
        }
        self.saved_at = if self.saved_at == Some(applied) {
            Some(0)
        } else {
            None
        };
        self.applied = 0;
    }

    /// Changes the maximum number of entries, trimming immediately.
    ///
    /// Applied entries are evicted oldest first. If only redo entries are
    /// left over the limit, the newest of them are dropped instead.
    pub fn set_capacity(&mut self, capacity: usize, target: &mut T) {
        self.capacity = sanitize_capacity(capacity);
        while self.actions.len() > self.capacity {
            if self.applied > 0 {
                self.evict_oldest(target);
            } else {
                self.pop_redo(target);
            }
        }
    }

    /// Returns `true` if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Returns `true` if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Index of the last applied action, or `None` when nothing is applied.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Returns the number of actions that can be undone.
    pub fn undo_count(&self) -> usize {
        self.applied
    }

    /// Returns the number of actions that can be redone.
    pub fn redo_count(&self) -> usize {
        self.actions.len() - self.applied
    }

    /// Total number of recorded actions, applied or not.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over all recorded actions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.actions.iter()
    }

    /// Returns an iterator over undo action descriptions, most recent first.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.actions
            .range(..self.applied)
            .rev()
            .map(|a| a.description())
    }

    /// Returns an iterator over redo action descriptions, next redo first.
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.actions.range(self.applied..).map(|a| a.description())
    }

    /// Records the current state as the saved state.
    pub fn mark_saved(&mut self) {
        self.saved_at = Some(self.applied);
    }

    /// Returns `true` if the current state differs from the last saved state.
    ///
    /// Also `true` when the save point became unreachable (evicted, or in a
    /// redo branch that was discarded).
    pub fn has_unsaved_changes(&self) -> bool {
        self.saved_at != Some(self.applied)
    }

    fn discard_redo(&mut self, target: &mut T) {
        let count = self.redo_count();
        if count == 0 {
            return;
        }
        log::debug!("Discarding {count} redo entries");
        for _ in 0..count {
            self.pop_redo(target);
        }
    }

    fn pop_redo(&mut self, target: &mut T) {
        if self.actions.len() <= self.applied {
            return;
        }
        if let Some(mut action) = self.actions.pop_back() {
            action.dispose(target, false);
        }
        if self.saved_at.is_some_and(|saved| saved > self.actions.len()) {
            self.saved_at = None;
        }
    }

    fn evict_oldest(&mut self, target: &mut T) {
        let Some(mut action) = self.actions.pop_front() else {
            return;
        };
        log::debug!("Evicting \"{}\" from history", action.description());
        action.dispose(target, self.applied > 0);
        self.applied = self.applied.saturating_sub(1);
        self.saved_at = match self.saved_at {
            Some(saved) if saved > 0 => Some(saved - 1),
            _ => None,
        };
    }
}

fn sanitize_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        log::warn!("History capacity must be at least 1, using 1");
        1
    } else {
        capacity
    }
}

impl<T: Editable, A: EditAction<T>> fmt::Debug for EditActionHistory<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditActionHistory")
            .field("len", &self.actions.len())
            .field("cursor", &self.cursor())
            .field("capacity", &self.capacity)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}
