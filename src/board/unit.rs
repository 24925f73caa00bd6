//! Unit types and ownership.
//!
//! `Unit` is the wire shape exchanged with the orchestrator. Its territory is
//! kept as the identifier the orchestrator supplied so that units on
//! territories unknown to the graph can be passed through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Army,
    #[serde(alias = "fleet")]
    Navy,
}

/// An owning country. Countries are opaque names supplied by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(pub String);

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Country(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A military unit on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub country: Country,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    /// Exact territory, coast-qualified for fleets on split coasts.
    pub territory: String,
    /// Recomputed on every adjudication; ignored on input.
    #[serde(default)]
    pub dislodged: bool,
}

impl Unit {
    pub fn new(
        id: impl Into<String>,
        country: impl Into<String>,
        unit_type: UnitType,
        territory: impl Into<String>,
    ) -> Self {
        Unit {
            id: id.into(),
            country: Country::new(country),
            unit_type,
            territory: territory.into(),
            dislodged: false,
        }
    }

    pub fn army(id: impl Into<String>, country: impl Into<String>, territory: impl Into<String>) -> Self {
        Unit::new(id, country, UnitType::Army, territory)
    }

    pub fn navy(id: impl Into<String>, country: impl Into<String>, territory: impl Into<String>) -> Self {
        Unit::new(id, country, UnitType::Navy, territory)
    }
}
