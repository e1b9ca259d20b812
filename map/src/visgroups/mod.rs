//! Visgroups: named sets of map objects that are shown or hidden together.
//!
//! - [`VisgroupRegistry`]: the groups of a document and their tri-state
//!   indicators
//! - [`toggle_group`]: hides or shows one group and recomputes the
//!   indicators of every group sharing objects with it
//! - [`show_all`]: clears all visgroup hiding
//!
//! An object may belong to several groups, so hiding one group can leave a
//! peer group partly hidden. Indicators are always recomputed from the
//! current per-object bits and never hand-set, except for the toggled group
//! itself, which takes exactly the state the user chose.

mod propagation;
mod registry;

pub use propagation::{ToggleReport, objects_in_group, show_all, toggle_group};
pub use registry::{
    GroupId, GroupVisibility, Visgroup, VisgroupError, VisgroupRegistry, VisgroupResult,
};
