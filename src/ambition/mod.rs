//! Player ambition: text interpretation, the profile itself, and how
//! executed actions reshape it over time.

pub mod interpreter;
pub mod mutation;
pub mod profile;

pub use interpreter::interpret;
pub use mutation::{mutate, DreamEvent, MutationOutcome};
pub use profile::{AmbitionProfile, DreamMark, MutationRecord, ProfileDelta};
