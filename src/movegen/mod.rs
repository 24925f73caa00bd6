//! Legal move generation.
//!
//! Currently limited to the retreat phase: the movement-phase legality rules
//! live with the resolver in `resolve::legality`.

pub mod retreat;

pub use retreat::{valid_retreats, RetreatExclusions};
