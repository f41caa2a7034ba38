// Entity Models - Near-Earth objects and their close approaches
//
// Both entities live in arenas owned by `NeoDatabase`. Cross references are
// plain handles into those arenas, so neither side owns the other:
// - CloseApproach.neo -> NeoId (set once by the linker)
// - NearEarthObject.approaches -> Vec<ApproachId> (appended by the linker)

pub mod neo;
pub mod approach;

pub use neo::{NearEarthObject, NeoRecord};
pub use approach::{ApproachRecord, CloseApproach};

/// Handle of a `NearEarthObject` inside a `NeoDatabase`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoId(pub(crate) usize);

/// Handle of a `CloseApproach` inside a `NeoDatabase`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApproachId(pub(crate) usize);
