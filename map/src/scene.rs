//! Map object tree stored in an arena.
//!
//! Objects live in generational slots addressed by [`ObjectId`]. Each object
//! stores its parent handle and an ordered list of child handles, so the
//! tree never holds references into itself.
//!
//! An object can be *detached*: still allocated, but with no parent and so
//! not part of the map. Reversible operations rely on this to take objects
//! out of the map on undo and put the very same objects back on redo.
//! Detached objects are only freed through [`SceneGraph::despawn_recursive`],
//! after which every old handle to them is stale.
//!
//! Tree-shape mutators are crate-private: the map is edited through
//! [`EditOperation`](crate::operations::EditOperation)s only.

use std::collections::BTreeSet;
use std::fmt;

use crate::visgroups::GroupId;

/// Stable handle to an object in a [`SceneGraph`].
///
/// Layout: `u32 index` + `u32 generation`. When a slot is freed and reused,
/// its generation changes, so handles to the freed object stop resolving.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    /// Returns the slot index of this object.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns how many times the slot had been reused when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}@{})", self.index, self.generation)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}@{})", self.index, self.generation)
    }
}

/// Errors from tree queries and mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("{0} does not exist")]
    ObjectNotFound(ObjectId),
    #[error("the world root cannot be moved or removed")]
    RootImmutable,
    #[error("{object} is already attached to {parent}")]
    AlreadyAttached { object: ObjectId, parent: ObjectId },
    #[error("{0} is not attached to a parent")]
    NotAttached(ObjectId),
    #[error("index {index} is out of range for {parent} with {len} children")]
    IndexOutOfRange {
        parent: ObjectId,
        index: usize,
        len: usize,
    },
    #[error("attaching {object} under {parent} would create a cycle")]
    WouldCycle { object: ObjectId, parent: ObjectId },
    #[error(
        "{object} expected at {expected_parent}[{expected_index}], found {}",
        describe_position(.actual)
    )]
    PlacementMismatch {
        object: ObjectId,
        expected_parent: ObjectId,
        expected_index: usize,
        actual: Option<(ObjectId, usize)>,
    },
    #[error("scene integrity violated: {0}")]
    Corrupted(String),
}

fn describe_position(position: &Option<(ObjectId, usize)>) -> String {
    match position {
        Some((parent, index)) => format!("{parent}[{index}]"),
        None => "it detached".into(),
    }
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// A node of the map tree: a brush, an entity, a group, or the world root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapObject {
    name: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    visgroups: BTreeSet<GroupId>,
    /// Hidden directly by the user. Not touched by visgroup propagation.
    hidden: bool,
    /// Hidden because one of its visgroups is hidden.
    visgroup_hidden: bool,
    /// Number of recorded history entries that refer to this object.
    references: usize,
}

impl MapObject {
    fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            visgroups: BTreeSet::new(),
            hidden: false,
            visgroup_hidden: false,
            references: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Owned children, in order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// The visgroups this object belongs to.
    pub fn visgroups(&self) -> &BTreeSet<GroupId> {
        &self.visgroups
    }

    pub fn is_in_visgroup(&self, group: GroupId) -> bool {
        self.visgroups.contains(&group)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_visgroup_hidden(&self) -> bool {
        self.visgroup_hidden
    }

    /// Effective visibility: neither hidden directly nor by a visgroup.
    pub fn is_visible(&self) -> bool {
        !(self.hidden || self.visgroup_hidden)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<MapObject>,
}

/// Arena-backed object tree with a single world root.
#[derive(Debug)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    /// Free list of recyclable slot indices (LIFO stack).
    free_list: Vec<u32>,
    root: ObjectId,
    live: usize,
}

impl SceneGraph {
    /// Name given to the world root object.
    pub const ROOT_NAME: &'static str = "worldspawn";

    /// Creates a map containing only the world root.
    pub fn new() -> Self {
        let mut scene = Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            root: ObjectId {
                index: 0,
                generation: 0,
            },
            live: 0,
        };
        scene.root = scene.allocate(MapObject::new(Self::ROOT_NAME.into()));
        scene
    }

    /// Allocates a new detached object.
    ///
    /// The object is not part of the map until a
    /// [`Create`](crate::operations::EditOperation::Create) operation
    /// attaches it.
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectId {
        self.allocate(MapObject::new(name.into()))
    }

    /// Allocates a new detached object that already belongs to `visgroups`.
    pub fn spawn_in_visgroups(
        &mut self,
        name: impl Into<String>,
        visgroups: impl IntoIterator<Item = GroupId>,
    ) -> ObjectId {
        let mut object = MapObject::new(name.into());
        object.visgroups.extend(visgroups);
        self.allocate(object)
    }

    fn allocate(&mut self, object: MapObject) -> ObjectId {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            return ObjectId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            object: Some(object),
        });
        ObjectId {
            index,
            generation: 0,
        }
    }

    /// The world root. Always attached, never removable.
    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn get(&self, id: ObjectId) -> Option<&MapObject> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_ref())
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut MapObject> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_mut())
    }

    fn object(&self, id: ObjectId) -> SceneResult<&MapObject> {
        self.get(id).ok_or(SceneError::ObjectNotFound(id))
    }

    fn object_mut(&mut self, id: ObjectId) -> SceneResult<&mut MapObject> {
        self.get_mut(id).ok_or(SceneError::ObjectNotFound(id))
    }

    /// Returns `true` if `id` refers to a live object (attached or not).
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live objects, including the root and detached objects.
    pub fn object_count(&self) -> usize {
        self.live
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.get(id).and_then(|object| object.parent)
    }

    /// Children of `id` in order; empty if `id` does not exist.
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.get(id).map(MapObject::children).unwrap_or_default()
    }

    /// Parent and index of `id` within the parent's children.
    pub fn position(&self, id: ObjectId) -> Option<(ObjectId, usize)> {
        let parent = self.get(id)?.parent?;
        let index = self.get(parent)?.children.iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    /// Returns `true` if `id` is reachable from the world root.
    pub fn is_attached(&self, id: ObjectId) -> bool {
        self.contains(id) && self.is_ancestor_or_self(self.root, id)
    }

    fn is_ancestor_or_self(&self, ancestor: ObjectId, mut id: ObjectId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Inserts a detached object under `parent` at `index`.
    pub(crate) fn attach(
        &mut self,
        object: ObjectId,
        parent: ObjectId,
        index: usize,
    ) -> SceneResult<()> {
        if object == self.root {
            return Err(SceneError::RootImmutable);
        }
        if let Some(existing) = self.object(object)?.parent {
            return Err(SceneError::AlreadyAttached {
                object,
                parent: existing,
            });
        }
        let len = self.object(parent)?.children.len();
        if index > len {
            return Err(SceneError::IndexOutOfRange { parent, index, len });
        }
        if self.is_ancestor_or_self(object, parent) {
            return Err(SceneError::WouldCycle { object, parent });
        }

        self.object_mut(parent)?.children.insert(index, object);
        self.object_mut(object)?.parent = Some(parent);
        log::trace!("Attached {object} to {parent} at {index}");
        Ok(())
    }

    /// Removes an object (with its subtree) from its parent, keeping it alive.
    ///
    /// Returns the parent and index it was removed from.
    pub(crate) fn detach(&mut self, object: ObjectId) -> SceneResult<(ObjectId, usize)> {
        if object == self.root {
            return Err(SceneError::RootImmutable);
        }
        let parent = self
            .object(object)?
            .parent
            .ok_or(SceneError::NotAttached(object))?;
        let index = self
            .object(parent)?
            .children
            .iter()
            .position(|&c| c == object)
            .ok_or_else(|| {
                SceneError::Corrupted(format!("{parent} does not list its child {object}"))
            })?;

        self.object_mut(parent)?.children.remove(index);
        self.object_mut(object)?.parent = None;
        log::trace!("Detached {object} from {parent} at {index}");
        Ok((parent, index))
    }

    /// Marks `id` as referred to by one more recorded history entry.
    pub(crate) fn retain(&mut self, id: ObjectId) {
        if let Some(object) = self.get_mut(id) {
            object.references += 1;
        }
    }

    /// Drops one history reference to `id`.
    pub(crate) fn release(&mut self, id: ObjectId) {
        if let Some(object) = self.get_mut(id) {
            object.references = object.references.saturating_sub(1);
        }
    }

    /// Returns `true` if a recorded history entry still refers to `id`.
    pub fn is_referenced(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(|object| object.references > 0)
    }

    /// Top of the detached tree that holds `id`, or `None` when `id` is
    /// part of the map or does not exist.
    pub fn detached_root(&self, id: ObjectId) -> Option<ObjectId> {
        let mut top = id;
        while let Some(parent) = self.parent(top) {
            top = parent;
        }
        (self.contains(top) && top != self.root).then_some(top)
    }

    /// Frees the detached tree holding `id` unless some object in it is
    /// still referenced by the history.
    ///
    /// Returns the number of objects freed.
    pub(crate) fn collect_detached(&mut self, id: ObjectId) -> usize {
        let Some(top) = self.detached_root(id) else {
            return 0;
        };
        if self.walk_from(top).any(|member| self.is_referenced(member)) {
            log::trace!("Keeping {top}: still referenced by the history");
            return 0;
        }
        match self.despawn_recursive(top) {
            Ok(freed) => freed,
            Err(err) => {
                log::error!("Failed to free {top}: {err}");
                0
            }
        }
    }

    /// Frees a detached object and its whole subtree.
    ///
    /// Returns the number of objects freed. Handles to them become stale.
    pub(crate) fn despawn_recursive(&mut self, object: ObjectId) -> SceneResult<usize> {
        if object == self.root {
            return Err(SceneError::RootImmutable);
        }
        if let Some(parent) = self.object(object)?.parent {
            return Err(SceneError::AlreadyAttached { object, parent });
        }

        let mut stack = vec![object];
        let mut freed = 0;
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.free(id) {
                stack.extend(removed.children);
                freed += 1;
            }
        }
        log::trace!("Freed {freed} objects under {object}");
        Ok(freed)
    }

    fn free(&mut self, id: ObjectId) -> Option<MapObject> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.live -= 1;
        Some(object)
    }

    /// Depth-first, pre-order walk of the attached map, starting at the root.
    pub fn walk(&self) -> Walk<'_> {
        self.walk_from(self.root)
    }

    /// Depth-first, pre-order walk of the subtree under `id` (inclusive).
    pub fn walk_from(&self, id: ObjectId) -> Walk<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Walk { scene: self, stack }
    }

    /// Every attached object with its handle, in walk order.
    pub fn attached_objects(&self) -> impl Iterator<Item = (ObjectId, &MapObject)> {
        self.walk()
            .filter_map(|id| self.get(id).map(|object| (id, object)))
    }

    /// Collects every attached object matching `predicate`, in walk order.
    pub fn find(&self, mut predicate: impl FnMut(&MapObject) -> bool) -> Vec<ObjectId> {
        self.walk()
            .filter(|&id| self.get(id).is_some_and(&mut predicate))
            .collect()
    }

    /// Sets the user-controlled hidden bit.
    pub fn set_hidden(&mut self, id: ObjectId, hidden: bool) -> SceneResult<()> {
        self.object_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Sets the visgroup-hidden bit on every listed object that is still live.
    pub(crate) fn set_visgroup_hidden(&mut self, ids: &[ObjectId], hidden: bool) {
        for &id in ids {
            if let Some(object) = self.get_mut(id) {
                object.visgroup_hidden = hidden;
            }
        }
    }

    /// Clears the visgroup-hidden bit on every live object.
    pub(crate) fn clear_visgroup_hidden(&mut self) {
        for object in self.objects_mut() {
            object.visgroup_hidden = false;
        }
    }

    /// Renames an object, returning its previous name.
    pub(crate) fn set_name(&mut self, id: ObjectId, name: String) -> SceneResult<String> {
        Ok(std::mem::replace(&mut self.object_mut(id)?.name, name))
    }

    /// Replaces an object's visgroup memberships, returning the previous set.
    pub(crate) fn replace_visgroups(
        &mut self,
        id: ObjectId,
        visgroups: BTreeSet<GroupId>,
    ) -> SceneResult<BTreeSet<GroupId>> {
        Ok(std::mem::replace(
            &mut self.object_mut(id)?.visgroups,
            visgroups,
        ))
    }

    /// Removes `group` from every live object's memberships.
    ///
    /// Returns how many objects were members.
    pub(crate) fn strip_visgroup(&mut self, group: GroupId) -> usize {
        let mut members = 0;
        for object in self.objects_mut() {
            if object.visgroups.remove(&group) {
                members += 1;
            }
        }
        members
    }

    fn objects_mut(&mut self) -> impl Iterator<Item = &mut MapObject> {
        self.slots.iter_mut().filter_map(|slot| slot.object.as_mut())
    }

    fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object.as_ref().map(|_| ObjectId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    /// Verifies the tree invariants.
    ///
    /// Parent and child edges must agree, no object may be listed twice,
    /// parent chains must not loop, and the root must have no parent.
    pub fn check_integrity(&self) -> SceneResult<()> {
        let root = self.object(self.root)?;
        if root.parent.is_some() {
            return Err(SceneError::Corrupted("the root has a parent".into()));
        }

        for id in self.ids() {
            let object = self.object(id)?;
            if let Some(parent) = object.parent {
                let listed = self
                    .get(parent)
                    .map_or(0, |p| p.children.iter().filter(|&&c| c == id).count());
                if listed != 1 {
                    return Err(SceneError::Corrupted(format!(
                        "{parent} lists {id} {listed} times"
                    )));
                }
            }
            for &child in &object.children {
                if self.parent(child) != Some(id) {
                    return Err(SceneError::Corrupted(format!(
                        "{child} is listed under {id} but does not point back"
                    )));
                }
            }

            let mut current = id;
            let mut steps = 0;
            while let Some(parent) = self.parent(current) {
                steps += 1;
                if steps > self.live {
                    return Err(SceneError::Corrupted(format!(
                        "parent chain of {id} loops"
                    )));
                }
                current = parent;
            }
        }
        Ok(())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`SceneGraph::walk`].
pub struct Walk<'a> {
    scene: &'a SceneGraph,
    stack: Vec<ObjectId>,
}

impl Iterator for Walk<'_> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.scene.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root
    /// ├── a
    /// │   └── a1
    /// └── b
    fn sample() -> (SceneGraph, ObjectId, ObjectId, ObjectId) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let a = scene.spawn("a");
        let a1 = scene.spawn("a1");
        let b = scene.spawn("b");
        scene.attach(a, root, 0).unwrap();
        scene.attach(a1, a, 0).unwrap();
        scene.attach(b, root, 1).unwrap();
        (scene, a, a1, b)
    }

    #[test]
    fn new_scene_has_only_root() {
        let scene = SceneGraph::new();
        assert_eq!(scene.object_count(), 1);
        assert_eq!(scene.get(scene.root()).unwrap().name(), "worldspawn");
        assert!(scene.is_attached(scene.root()));
    }

    #[test]
    fn spawned_objects_start_detached() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn("brush");
        assert!(scene.contains(id));
        assert!(!scene.is_attached(id));
        assert_eq!(scene.parent(id), None);
        assert!(scene.walk().all(|w| w != id));
    }

    #[test]
    fn attach_places_at_index() {
        let (mut scene, a, _, b) = sample();
        let root = scene.root();
        let c = scene.spawn("c");

        scene.attach(c, root, 1).unwrap();

        assert_eq!(scene.children(root), &[a, c, b]);
        assert_eq!(scene.position(c), Some((root, 1)));
        scene.check_integrity().unwrap();
    }

    #[test]
    fn attach_rejects_bad_index() {
        let (mut scene, a, _, _) = sample();
        let c = scene.spawn("c");
        assert_eq!(
            scene.attach(c, a, 5),
            Err(SceneError::IndexOutOfRange {
                parent: a,
                index: 5,
                len: 1
            })
        );
        assert!(!scene.is_attached(c));
    }

    #[test]
    fn attach_rejects_already_attached() {
        let (mut scene, a, a1, b) = sample();
        assert_eq!(
            scene.attach(a1, b, 0),
            Err(SceneError::AlreadyAttached {
                object: a1,
                parent: a
            })
        );
    }

    #[test]
    fn attach_rejects_cycles() {
        let (mut scene, a, a1, _) = sample();
        scene.detach(a).unwrap();
        assert_eq!(
            scene.attach(a, a1, 0),
            Err(SceneError::WouldCycle {
                object: a,
                parent: a1
            })
        );
        assert_eq!(
            scene.attach(a, a, 0),
            Err(SceneError::WouldCycle {
                object: a,
                parent: a
            })
        );
    }

    #[test]
    fn root_cannot_move() {
        let (mut scene, a, _, _) = sample();
        let root = scene.root();
        assert_eq!(scene.detach(root), Err(SceneError::RootImmutable));
        assert_eq!(scene.attach(root, a, 0), Err(SceneError::RootImmutable));
        assert_eq!(
            scene.despawn_recursive(root),
            Err(SceneError::RootImmutable)
        );
    }

    #[test]
    fn detach_keeps_subtree_alive() {
        let (mut scene, a, a1, b) = sample();
        let root = scene.root();

        assert_eq!(scene.detach(a), Ok((root, 0)));

        assert_eq!(scene.children(root), &[b]);
        assert!(scene.contains(a));
        assert!(!scene.is_attached(a));
        assert!(!scene.is_attached(a1));
        assert_eq!(scene.parent(a1), Some(a));
        assert_eq!(scene.detach(a), Err(SceneError::NotAttached(a)));
        scene.check_integrity().unwrap();
    }

    #[test]
    fn despawn_frees_subtree_and_invalidates_handles() {
        let (mut scene, a, a1, _) = sample();
        scene.detach(a).unwrap();

        assert_eq!(scene.despawn_recursive(a), Ok(2));

        assert!(!scene.contains(a));
        assert!(!scene.contains(a1));
        assert_eq!(scene.object_count(), 2);

        // Reused slot gets a new generation.
        let reused = scene.spawn("reused");
        assert_eq!(reused.index(), a1.index());
        assert_ne!(reused, a1);
        assert!(!scene.contains(a1));
        scene.check_integrity().unwrap();
    }

    #[test]
    fn despawn_requires_detached() {
        let (mut scene, a, _, _) = sample();
        let root = scene.root();
        assert_eq!(
            scene.despawn_recursive(a),
            Err(SceneError::AlreadyAttached {
                object: a,
                parent: root
            })
        );
    }

    #[test]
    fn collect_detached_respects_references() {
        let (mut scene, a, a1, b) = sample();
        scene.detach(a).unwrap();
        scene.retain(a1);

        assert_eq!(scene.detached_root(a1), Some(a));
        assert_eq!(scene.detached_root(b), None);
        assert_eq!(scene.collect_detached(a1), 0);
        assert!(scene.contains(a));

        scene.release(a1);
        assert!(!scene.is_referenced(a1));
        assert_eq!(scene.collect_detached(a1), 2);
        assert!(!scene.contains(a));
        assert!(!scene.contains(a1));
    }

    #[test]
    fn collect_detached_keeps_attached_objects() {
        let (mut scene, a, _, b) = sample();
        assert_eq!(scene.collect_detached(a), 0);
        assert_eq!(scene.collect_detached(b), 0);
        assert_eq!(scene.collect_detached(scene.root()), 0);
        assert_eq!(scene.object_count(), 4);
    }

    #[test]
    fn walk_is_depth_first_preorder() {
        let (scene, a, a1, b) = sample();
        let order: Vec<ObjectId> = scene.walk().collect();
        assert_eq!(order, vec![scene.root(), a, a1, b]);
        let subtree: Vec<ObjectId> = scene.walk_from(a).collect();
        assert_eq!(subtree, vec![a, a1]);
    }

    #[test]
    fn find_skips_detached_objects() {
        let (mut scene, a, a1, _) = sample();
        let loose = scene.spawn("a-loose");

        let found = scene.find(|o| o.name().starts_with('a'));
        assert_eq!(found, vec![a, a1]);
        assert!(!found.contains(&loose));
    }

    #[test]
    fn visibility_bits_are_independent() {
        let (mut scene, a, _, _) = sample();

        scene.set_hidden(a, true).unwrap();
        let object = scene.get(a).unwrap();
        assert!(object.is_hidden());
        assert!(!object.is_visgroup_hidden());
        assert!(!object.is_visible());

        scene.set_hidden(a, false).unwrap();
        scene.set_visgroup_hidden(&[a], true);
        assert!(!scene.get(a).unwrap().is_visible());

        scene.clear_visgroup_hidden();
        assert!(scene.get(a).unwrap().is_visible());
    }

    #[test]
    fn strip_visgroup_removes_membership() {
        let mut scene = SceneGraph::new();
        let walls = GroupId::new(1);
        let doors = GroupId::new(2);
        let x = scene.spawn_in_visgroups("x", [walls, doors]);
        let y = scene.spawn_in_visgroups("y", [walls]);

        assert_eq!(scene.strip_visgroup(walls), 2);

        assert!(!scene.get(x).unwrap().is_in_visgroup(walls));
        assert!(scene.get(x).unwrap().is_in_visgroup(doors));
        assert!(scene.get(y).unwrap().visgroups().is_empty());
    }

    #[test]
    fn placement_mismatch_display() {
        let (scene, a, _, b) = sample();
        let err = SceneError::PlacementMismatch {
            object: b,
            expected_parent: a,
            expected_index: 0,
            actual: scene.position(b),
        };
        assert_eq!(
            err.to_string(),
            format!("{b} expected at {a}[0], found {}[1]", scene.root())
        );
    }
}
