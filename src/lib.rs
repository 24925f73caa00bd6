//! Diplomacy movement-phase adjudicator.
//!
//! Exposes the board representation, the resolution pipeline, retreat
//! generation, configuration and the JSON-lines protocol for use by
//! integration tests and the binary entry point.

pub mod adjudicator;
pub mod board;
pub mod config;
pub mod movegen;
pub mod protocol;
pub mod resolve;

pub use adjudicator::{Adjudicator, Phase};
pub use config::{AdjudicatorConfig, ConfigError, Reresolution, Ruleset};
pub use resolve::{AdjudicationResult, DislodgedUnit, OrderReport, Outcome};
