//! Drift systems, one per tick pass

pub mod diplomacy;
pub mod economy;
pub mod faith;
pub mod justice;
pub mod politics;
pub mod regional;

pub use diplomacy::diplomacy_drift;
pub use economy::economic_drift;
pub use faith::faith_drift;
pub use justice::justice_drift;
pub use politics::political_drift;
pub use regional::regional_drift;
