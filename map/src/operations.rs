//! Reversible map edits.
//!
//! [`EditOperation`] is the closed set of edits a map document records in
//! its history. Each variant captures what it needs when it is built,
//! before the map is touched, and checks on every apply/undo that the live
//! tree still matches what it captured. If it does not (the map was changed
//! outside the history), the step is refused with
//! [`EditActionError::ProtocolViolation`] and the map is left as it was.

use std::collections::{BTreeSet, HashSet};

use quarry_core::abstract_editor::{EditAction, EditActionError, EditActionResult};

use crate::document::Document;
use crate::scene::{ObjectId, SceneError, SceneGraph, SceneResult};
use crate::visgroups::GroupId;

impl From<SceneError> for EditActionError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::ObjectNotFound(_) => Self::TargetNotFound(err.to_string()),
            _ => Self::ProtocolViolation(err.to_string()),
        }
    }
}

/// Where an object sits in the map: its parent and index among siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub object: ObjectId,
    pub parent: ObjectId,
    pub index: usize,
}

/// An ordered list of placements, inserted front to back and removed back
/// to front so that every index is exact at the moment it is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements(Vec<Placement>);

impl Placements {
    pub fn new(placements: impl IntoIterator<Item = Placement>) -> Self {
        Self(placements.into_iter().collect())
    }

    pub fn as_slice(&self) -> &[Placement] {
        &self.0
    }

    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.0.iter().map(|p| p.object)
    }

    /// Captures the current placement of attached objects so that inserting
    /// the result rebuilds today's tree.
    ///
    /// Objects whose ancestor is also listed are dropped: they travel with
    /// the ancestor's subtree.
    fn capture(scene: &SceneGraph, objects: &[ObjectId]) -> SceneResult<Self> {
        let selected: HashSet<ObjectId> = objects.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut placements = Vec::new();

        for &object in objects {
            if !seen.insert(object) {
                continue;
            }
            if object == scene.root() {
                return Err(SceneError::RootImmutable);
            }
            if !scene.contains(object) {
                return Err(SceneError::ObjectNotFound(object));
            }
            if !scene.is_attached(object) {
                return Err(SceneError::NotAttached(object));
            }

            let mut ancestor = scene.parent(object);
            let mut covered = false;
            while let Some(id) = ancestor {
                if selected.contains(&id) {
                    covered = true;
                    break;
                }
                ancestor = scene.parent(id);
            }
            if covered {
                continue;
            }

            let (parent, index) = scene
                .position(object)
                .ok_or(SceneError::NotAttached(object))?;
            placements.push(Placement {
                object,
                parent,
                index,
            });
        }

        // Ascending index per parent; objects under different parents are independent.
        placements.sort_by_key(|p| p.index);
        Ok(Self(placements))
    }

    fn insert_all(&self, scene: &mut SceneGraph) -> SceneResult<()> {
        for (done, placement) in self.0.iter().enumerate() {
            if let Err(err) = scene.attach(placement.object, placement.parent, placement.index) {
                for inserted in self.0[..done].iter().rev() {
                    if let Err(rollback) = scene.detach(inserted.object) {
                        log::error!("Rollback of {} failed: {rollback}", inserted.object);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn remove_all(&self, scene: &mut SceneGraph) -> SceneResult<()> {
        for (position, placement) in self.0.iter().enumerate().rev() {
            let result = expect_position(scene, placement.object, (placement.parent, placement.index))
                .and_then(|()| scene.detach(placement.object));
            if let Err(err) = result {
                for removed in &self.0[position + 1..] {
                    if let Err(rollback) = scene.attach(removed.object, removed.parent, removed.index)
                    {
                        log::error!("Rollback of {} failed: {rollback}", removed.object);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

fn expect_position(
    scene: &SceneGraph,
    object: ObjectId,
    (parent, index): (ObjectId, usize),
) -> SceneResult<()> {
    if !scene.contains(object) {
        return Err(SceneError::ObjectNotFound(object));
    }
    let actual = scene.position(object);
    if actual == Some((parent, index)) {
        Ok(())
    } else {
        Err(SceneError::PlacementMismatch {
            object,
            expected_parent: parent,
            expected_index: index,
            actual,
        })
    }
}

/// Visgroup memberships of one object before and after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub object: ObjectId,
    pub before: BTreeSet<GroupId>,
    pub after: BTreeSet<GroupId>,
}

/// A reversible edit of a map document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Puts new objects into the map. Undo detaches them without freeing
    /// them, so redo can put the same objects back.
    Create {
        label: String,
        placements: Placements,
    },
    /// Takes objects, with their subtrees, out of the map. The reverse of
    /// [`Create`](Self::Create).
    Destroy {
        label: String,
        placements: Placements,
    },
    /// Moves one object under `to.0` at index `to.1`, where the index counts
    /// siblings after the object has left its old place.
    Move {
        label: String,
        object: ObjectId,
        from: (ObjectId, usize),
        to: (ObjectId, usize),
    },
    /// Changes an object's display name.
    Rename {
        label: String,
        object: ObjectId,
        before: String,
        after: String,
    },
    /// Changes the visgroup memberships of a set of objects.
    SetVisgroups {
        label: String,
        changes: Vec<MembershipChange>,
    },
}

impl EditOperation {
    /// Creation of detached objects at explicit placements.
    ///
    /// Placements are inserted in order, so a placement may name an object
    /// created earlier in the same list as its parent.
    pub fn create(label: impl Into<String>, placements: impl IntoIterator<Item = Placement>) -> Self {
        Self::Create {
            label: label.into(),
            placements: Placements::new(placements),
        }
    }

    /// Creation of detached objects appended, in order, to `parent`.
    pub fn create_under(
        label: impl Into<String>,
        scene: &SceneGraph,
        parent: ObjectId,
        objects: &[ObjectId],
    ) -> Self {
        let start = scene.children(parent).len();
        Self::create(
            label,
            objects
                .iter()
                .enumerate()
                .map(|(offset, &object)| Placement {
                    object,
                    parent,
                    index: start + offset,
                }),
        )
    }

    /// Removal of attached objects, capturing where each one sits now.
    pub fn destroy(
        label: impl Into<String>,
        scene: &SceneGraph,
        objects: &[ObjectId],
    ) -> SceneResult<Self> {
        Ok(Self::Destroy {
            label: label.into(),
            placements: Placements::capture(scene, objects)?,
        })
    }

    /// Reparenting or reordering of one attached object.
    pub fn move_object(
        label: impl Into<String>,
        scene: &SceneGraph,
        object: ObjectId,
        parent: ObjectId,
        index: usize,
    ) -> SceneResult<Self> {
        if !scene.contains(object) {
            return Err(SceneError::ObjectNotFound(object));
        }
        let from = scene
            .position(object)
            .ok_or(SceneError::NotAttached(object))?;
        Ok(Self::Move {
            label: label.into(),
            object,
            from,
            to: (parent, index),
        })
    }

    pub fn rename(
        label: impl Into<String>,
        scene: &SceneGraph,
        object: ObjectId,
        name: impl Into<String>,
    ) -> SceneResult<Self> {
        let before = scene
            .get(object)
            .ok_or(SceneError::ObjectNotFound(object))?
            .name()
            .to_owned();
        Ok(Self::Rename {
            label: label.into(),
            object,
            before,
            after: name.into(),
        })
    }

    /// Replacement of memberships, one new set per object.
    ///
    /// An object listed twice keeps its first entry.
    pub fn set_visgroups(
        label: impl Into<String>,
        scene: &SceneGraph,
        assignments: impl IntoIterator<Item = (ObjectId, BTreeSet<GroupId>)>,
    ) -> SceneResult<Self> {
        let mut seen = HashSet::new();
        let mut changes = Vec::new();
        for (object, after) in assignments {
            if !seen.insert(object) {
                continue;
            }
            let before = scene
                .get(object)
                .ok_or(SceneError::ObjectNotFound(object))?
                .visgroups()
                .clone();
            changes.push(MembershipChange {
                object,
                before,
                after,
            });
        }
        Ok(Self::SetVisgroups {
            label: label.into(),
            changes,
        })
    }

    /// Adds `group` to the memberships of every listed object.
    pub fn add_to_visgroup(
        label: impl Into<String>,
        scene: &SceneGraph,
        objects: &[ObjectId],
        group: GroupId,
    ) -> SceneResult<Self> {
        Self::edit_memberships(label, scene, objects, |groups| {
            groups.insert(group);
        })
    }

    /// Removes `group` from the memberships of every listed object.
    pub fn remove_from_visgroup(
        label: impl Into<String>,
        scene: &SceneGraph,
        objects: &[ObjectId],
        group: GroupId,
    ) -> SceneResult<Self> {
        Self::edit_memberships(label, scene, objects, |groups| {
            groups.remove(&group);
        })
    }

    /// Every object this operation refers to, in capture order.
    pub fn objects(&self) -> Vec<ObjectId> {
        match self {
            Self::Create { placements, .. } | Self::Destroy { placements, .. } => {
                placements.objects().collect()
            }
            Self::Move { object, .. } | Self::Rename { object, .. } => vec![*object],
            Self::SetVisgroups { changes, .. } => changes.iter().map(|c| c.object).collect(),
        }
    }

    fn edit_memberships(
        label: impl Into<String>,
        scene: &SceneGraph,
        objects: &[ObjectId],
        edit: impl Fn(&mut BTreeSet<GroupId>),
    ) -> SceneResult<Self> {
        let assignments = objects
            .iter()
            .map(|&object| -> SceneResult<(ObjectId, BTreeSet<GroupId>)> {
                let mut groups = scene
                    .get(object)
                    .ok_or(SceneError::ObjectNotFound(object))?
                    .visgroups()
                    .clone();
                edit(&mut groups);
                Ok((object, groups))
            })
            .collect::<SceneResult<Vec<_>>>()?;
        Self::set_visgroups(label, scene, assignments)
    }
}

impl EditAction<Document> for EditOperation {
    fn apply(&mut self, document: &mut Document) -> EditActionResult {
        let scene = document.scene_mut();
        match self {
            Self::Create { placements, .. } => placements.insert_all(scene)?,
            Self::Destroy { placements, .. } => placements.remove_all(scene)?,
            Self::Move {
                object, from, to, ..
            } => relocate(scene, *object, *from, *to)?,
            Self::Rename {
                object,
                before,
                after,
                ..
            } => rename_checked(scene, *object, before, after)?,
            Self::SetVisgroups { changes, .. } => reassign(scene, changes, true)?,
        }
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> EditActionResult {
        let scene = document.scene_mut();
        match self {
            Self::Create { placements, .. } => placements.remove_all(scene)?,
            Self::Destroy { placements, .. } => placements.insert_all(scene)?,
            Self::Move {
                object, from, to, ..
            } => relocate(scene, *object, *to, *from)?,
            Self::Rename {
                object,
                before,
                after,
                ..
            } => rename_checked(scene, *object, after, before)?,
            Self::SetVisgroups { changes, .. } => reassign(scene, changes, false)?,
        }
        Ok(())
    }

    fn description(&self) -> &str {
        match self {
            Self::Create { label, .. }
            | Self::Destroy { label, .. }
            | Self::Move { label, .. }
            | Self::Rename { label, .. }
            | Self::SetVisgroups { label, .. } => label,
        }
    }

    fn recorded(&mut self, document: &mut Document) {
        let scene = document.scene_mut();
        for object in self.objects() {
            scene.retain(object);
        }
    }

    /// Drops this entry's references and frees every detached tree it
    /// leaves behind that no other recorded entry refers to.
    ///
    /// Whether the entry was applied does not matter: an undone creation or
    /// an applied destruction leaves its objects detached, the opposite
    /// cases leave them in the map where they are never freed.
    fn dispose(&mut self, document: &mut Document, _applied: bool) {
        let scene = document.scene_mut();
        let objects = self.objects();
        for &object in &objects {
            scene.release(object);
        }
        let freed: usize = objects
            .iter()
            .map(|&object| scene.collect_detached(object))
            .sum();
        if freed > 0 {
            log::trace!("\"{}\" released {freed} objects", self.description());
        }

        match self {
            Self::Create { placements, .. } | Self::Destroy { placements, .. } => {
                placements.clear()
            }
            Self::SetVisgroups { changes, .. } => changes.clear(),
            Self::Move { .. } | Self::Rename { .. } => {}
        }
    }
}

fn relocate(
    scene: &mut SceneGraph,
    object: ObjectId,
    from: (ObjectId, usize),
    to: (ObjectId, usize),
) -> SceneResult<()> {
    expect_position(scene, object, from)?;
    scene.detach(object)?;
    if let Err(err) = scene.attach(object, to.0, to.1) {
        if let Err(rollback) = scene.attach(object, from.0, from.1) {
            log::error!("Rollback of {object} failed: {rollback}");
        }
        return Err(err);
    }
    Ok(())
}

fn rename_checked(
    scene: &mut SceneGraph,
    object: ObjectId,
    expected: &str,
    name: &str,
) -> EditActionResult {
    let current = scene
        .get(object)
        .ok_or(SceneError::ObjectNotFound(object))?
        .name();
    if current != expected {
        return Err(EditActionError::ProtocolViolation(format!(
            "{object} is named \"{current}\", expected \"{expected}\""
        )));
    }
    scene.set_name(object, name.to_owned())?;
    Ok(())
}

fn reassign(scene: &mut SceneGraph, changes: &[MembershipChange], forward: bool) -> EditActionResult {
    let sides = |change: &MembershipChange| {
        if forward {
            (change.before.clone(), change.after.clone())
        } else {
            (change.after.clone(), change.before.clone())
        }
    };

    for change in changes {
        let (expected, _) = sides(change);
        let current = scene
            .get(change.object)
            .ok_or(SceneError::ObjectNotFound(change.object))?
            .visgroups();
        if *current != expected {
            return Err(EditActionError::ProtocolViolation(format!(
                "visgroups of {} changed outside the history",
                change.object
            )));
        }
    }
    for change in changes {
        let (_, target) = sides(change);
        scene.replace_visgroups(change.object, target)?;
    }
    Ok(())
}
