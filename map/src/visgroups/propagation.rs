//! Visgroup toggling and the tri-state indicator propagation it drives.

use std::collections::BTreeSet;

use super::registry::{GroupId, GroupVisibility, VisgroupError, VisgroupRegistry, VisgroupResult};
use crate::scene::{ObjectId, SceneGraph};

/// What a [`toggle_group`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleReport {
    /// Attached members of the toggled group, in walk order.
    pub objects: Vec<ObjectId>,
    /// Peer groups whose indicator was recomputed, in id order.
    pub peers: Vec<(GroupId, GroupVisibility)>,
}

/// Every attached object that belongs to `group`, in walk order.
pub fn objects_in_group(scene: &SceneGraph, group: GroupId) -> Vec<ObjectId> {
    scene.find(|object| object.is_in_visgroup(group))
}

/// Shows or hides every object of `group` and updates the indicators.
///
/// The toggled group's indicator becomes exactly Shown or Hidden. Every
/// other group that shares an object with it is recomputed: after a show,
/// a peer with members still hidden becomes Mixed (otherwise Shown); after
/// a hide, a peer with members still visible becomes Mixed (otherwise
/// Hidden).
///
/// An unknown `group` is reported and nothing is changed.
pub fn toggle_group(
    scene: &mut SceneGraph,
    registry: &mut VisgroupRegistry,
    group: GroupId,
    visible: bool,
) -> VisgroupResult<ToggleReport> {
    if !registry.contains(group) {
        log::warn!("Ignoring toggle of unknown {group}");
        return Err(VisgroupError::GroupNotFound(group));
    }

    let objects = objects_in_group(scene, group);
    scene.set_visgroup_hidden(&objects, !visible);

    let peers: BTreeSet<GroupId> = objects
        .iter()
        .filter_map(|&id| scene.get(id))
        .flat_map(|object| object.visgroups().iter().copied())
        .filter(|&peer| peer != group)
        .collect();

    let mut report = ToggleReport {
        objects,
        peers: Vec::with_capacity(peers.len()),
    };
    for peer in peers {
        if !registry.contains(peer) {
            log::debug!("Skipping unregistered {peer} referenced by members of {group}");
            continue;
        }
        // Showing can only move a peer toward Shown, hiding only toward Hidden.
        let visibility = if visible {
            let any_hidden = scene
                .attached_objects()
                .any(|(_, o)| o.is_in_visgroup(peer) && o.is_visgroup_hidden());
            if any_hidden {
                GroupVisibility::Mixed
            } else {
                GroupVisibility::Shown
            }
        } else {
            let any_visible = scene
                .attached_objects()
                .any(|(_, o)| o.is_in_visgroup(peer) && !o.is_visgroup_hidden());
            if any_visible {
                GroupVisibility::Mixed
            } else {
                GroupVisibility::Hidden
            }
        };
        registry.set_visibility(peer, visibility)?;
        report.peers.push((peer, visibility));
    }

    registry.set_visibility(group, GroupVisibility::from_visible(visible))?;
    log::info!(
        "{} {group}: {} objects, {} peer groups updated",
        if visible { "Showed" } else { "Hid" },
        report.objects.len(),
        report.peers.len()
    );
    Ok(report)
}

/// Clears visgroup hiding on every object and marks every group Shown.
///
/// Objects hidden directly by the user stay hidden.
pub fn show_all(scene: &mut SceneGraph, registry: &mut VisgroupRegistry) {
    scene.clear_visgroup_hidden();
    registry.show_all();
    log::info!("Showing all {} visgroups", registry.len());
}
