//! Narrative events derived from what changed during a tick

pub mod alchemizer;
pub mod diff;

pub use alchemizer::{alchemize, cards_from_diff, roll_omens, EventCard, EventChoice};
pub use diff::{RegionShift, ResourceShift, StanceChange, WorldDiff};
