//! Simulation tick: effect application and the ordered drift passes

pub mod apply;
pub mod systems;
pub mod tick;

pub use apply::{apply_action, apply_effect, apply_effects, check_affordable, FiredRisk};
pub use tick::{run_tick, step, TickOutcome};
