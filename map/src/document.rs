//! A map document: the object tree, its visgroups, and the views watching them.

use std::fmt;

use quarry_core::abstract_editor::{EditChange, Editable};

use crate::scene::{ObjectId, SceneGraph, SceneResult};
use crate::visgroups::{
    self, GroupId, GroupVisibility, ToggleReport, Visgroup, VisgroupRegistry, VisgroupResult,
};

/// Notification sent to [`DocumentObserver`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentEvent {
    /// An edit was applied, undone or redone.
    Edited(EditChange),
    /// Object visibility changed without an edit (visgroup toggles, show all).
    VisibilityChanged,
}

/// A view that redraws when the document changes.
pub trait DocumentObserver: Send {
    fn document_changed(&mut self, event: DocumentEvent);
}

impl<F> DocumentObserver for F
where
    F: FnMut(DocumentEvent) + Send,
{
    fn document_changed(&mut self, event: DocumentEvent) {
        self(event)
    }
}

/// The editable state of one open map.
pub struct Document {
    scene: SceneGraph,
    visgroups: VisgroupRegistry,
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            scene: SceneGraph::new(),
            visgroups: VisgroupRegistry::new(),
            observers: Vec::new(),
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub(crate) fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn visgroups(&self) -> &VisgroupRegistry {
        &self.visgroups
    }

    /// Allocates a detached object. Put it into the map with a create operation.
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectId {
        self.scene.spawn(name)
    }

    pub fn spawn_in_visgroups(
        &mut self,
        name: impl Into<String>,
        visgroups: impl IntoIterator<Item = GroupId>,
    ) -> ObjectId {
        self.scene.spawn_in_visgroups(name, visgroups)
    }

    /// Hides or shows one object directly, independent of its visgroups.
    pub fn set_hidden(&mut self, id: ObjectId, hidden: bool) -> SceneResult<()> {
        self.scene.set_hidden(id, hidden)?;
        self.notify(DocumentEvent::VisibilityChanged);
        Ok(())
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> VisgroupResult<GroupId> {
        self.visgroups.add_group(name)
    }

    pub fn rename_group(&mut self, id: GroupId, name: impl Into<String>) -> VisgroupResult<()> {
        self.visgroups.rename_group(id, name)
    }

    /// Removes a visgroup and every object's membership in it.
    pub fn remove_group(&mut self, id: GroupId) -> VisgroupResult<Visgroup> {
        let group = self.visgroups.remove_group(id)?;
        let members = self.scene.strip_visgroup(id);
        log::debug!("Removed {id} \"{}\" from {members} objects", group.name());
        Ok(group)
    }

    pub fn group_visibility(&self, id: GroupId) -> Option<GroupVisibility> {
        self.visgroups.visibility(id)
    }

    pub fn objects_in_group(&self, id: GroupId) -> Vec<ObjectId> {
        visgroups::objects_in_group(&self.scene, id)
    }

    /// Shows or hides a visgroup. See [`visgroups::toggle_group`].
    pub fn toggle_group(&mut self, id: GroupId, visible: bool) -> VisgroupResult<ToggleReport> {
        let report = visgroups::toggle_group(&mut self.scene, &mut self.visgroups, id, visible)?;
        self.notify(DocumentEvent::VisibilityChanged);
        Ok(report)
    }

    pub fn show_all(&mut self) {
        visgroups::show_all(&mut self.scene, &mut self.visgroups);
        self.notify(DocumentEvent::VisibilityChanged);
    }

    /// Recomputes every visgroup indicator from the objects' current state.
    pub fn refresh_indicators(&mut self) {
        self.visgroups.refresh_indicators(&self.scene);
    }

    pub fn add_observer(&mut self, observer: impl DocumentObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: DocumentEvent) {
        for observer in &mut self.observers {
            observer.document_changed(event);
        }
    }
}

impl Editable for Document {
    fn changed(&mut self, change: EditChange) {
        self.notify(DocumentEvent::Edited(change));
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("objects", &self.scene.object_count())
            .field("visgroups", &self.visgroups.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
