use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::scene::SceneGraph;

/// Identifier of a visgroup, unique within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u32);

impl GroupId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Visgroup({})", self.0)
    }
}

/// Tri-state indicator shown next to a visgroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupVisibility {
    /// No member is hidden by a visgroup.
    #[default]
    Shown,
    /// Every member is hidden by a visgroup.
    Hidden,
    /// Some members are hidden, some are not. Never chosen by the user.
    Mixed,
}

impl GroupVisibility {
    /// The decisive state for a direct toggle.
    pub fn from_visible(visible: bool) -> Self {
        if visible { Self::Shown } else { Self::Hidden }
    }

    /// Indicator for a group with `total` members of which `hidden` are hidden.
    ///
    /// A group without members counts as shown.
    pub fn from_counts(hidden: usize, total: usize) -> Self {
        if hidden == 0 {
            Self::Shown
        } else if hidden == total {
            Self::Hidden
        } else {
            Self::Mixed
        }
    }
}

/// A named visgroup and its current indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visgroup {
    id: GroupId,
    name: String,
    visibility: GroupVisibility,
}

impl Visgroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> GroupVisibility {
        self.visibility
    }
}

/// Errors from visgroup lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisgroupError {
    #[error("{0} does not exist")]
    GroupNotFound(GroupId),
    #[error("visgroup ids are exhausted")]
    IdsExhausted,
}

/// Result type for visgroup operations.
pub type VisgroupResult<T> = Result<T, VisgroupError>;

/// The visgroups of one document, iterated in id order.
#[derive(Debug, Clone)]
pub struct VisgroupRegistry {
    groups: BTreeMap<GroupId, Visgroup>,
    next_id: u32,
}

impl VisgroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Adds a new, shown group and returns its id.
    ///
    /// Ids are never reused, so a registry hands out at most `u32::MAX - 1`
    /// of them over its lifetime.
    pub fn add_group(&mut self, name: impl Into<String>) -> VisgroupResult<GroupId> {
        let id = GroupId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(VisgroupError::IdsExhausted)?;
        let name = name.into();
        log::debug!("Added {id} \"{name}\"");
        self.groups.insert(
            id,
            Visgroup {
                id,
                name,
                visibility: GroupVisibility::Shown,
            },
        );
        Ok(id)
    }

    /// Removes a group from the registry.
    ///
    /// Object memberships are not touched here; see
    /// [`Document::remove_group`](crate::document::Document::remove_group).
    pub fn remove_group(&mut self, id: GroupId) -> VisgroupResult<Visgroup> {
        self.groups
            .remove(&id)
            .ok_or(VisgroupError::GroupNotFound(id))
    }

    pub fn rename_group(&mut self, id: GroupId, name: impl Into<String>) -> VisgroupResult<()> {
        self.group_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn get(&self, id: GroupId) -> Option<&Visgroup> {
        self.groups.get(&id)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// The indicator of a group, for populating a tri-state checkbox.
    pub fn visibility(&self, id: GroupId) -> Option<GroupVisibility> {
        self.get(id).map(Visgroup::visibility)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Visgroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn group_mut(&mut self, id: GroupId) -> VisgroupResult<&mut Visgroup> {
        self.groups
            .get_mut(&id)
            .ok_or(VisgroupError::GroupNotFound(id))
    }

    pub(crate) fn set_visibility(
        &mut self,
        id: GroupId,
        visibility: GroupVisibility,
    ) -> VisgroupResult<()> {
        self.group_mut(id)?.visibility = visibility;
        Ok(())
    }

    pub(crate) fn show_all(&mut self) {
        for group in self.groups.values_mut() {
            group.visibility = GroupVisibility::Shown;
        }
    }

    /// Recomputes every indicator from the attached objects' current bits.
    ///
    /// Used after loading a document, or after edits that changed
    /// memberships or brought hidden objects back into the map.
    pub fn refresh_indicators(&mut self, scene: &SceneGraph) {
        let mut counts: HashMap<GroupId, (usize, usize)> = HashMap::new();
        for (_, object) in scene.attached_objects() {
            for &group in object.visgroups() {
                let (hidden, total) = counts.entry(group).or_default();
                *total += 1;
                if object.is_visgroup_hidden() {
                    *hidden += 1;
                }
            }
        }
        for group in self.groups.values_mut() {
            let (hidden, total) = counts.get(&group.id).copied().unwrap_or_default();
            group.visibility = GroupVisibility::from_counts(hidden, total);
        }
    }
}

impl Default for VisgroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
