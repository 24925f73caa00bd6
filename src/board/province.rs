//! Province identifiers.
//!
//! A territory identifier is a base province code optionally qualified by a
//! coast, e.g. `SPA` or `SPA/nc`. Identifiers are parsed once at the edge of
//! the crate into `ProvinceId`; everything downstream compares parsed values
//! (or arena indices) instead of raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when parsing a territory identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProvinceIdError {
    #[error("empty province identifier")]
    Empty,

    #[error("invalid province code '{0}'")]
    InvalidCode(String),

    #[error("unknown coast '{0}'")]
    UnknownCoast(String),
}

/// Coast qualifier for split-coast provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coast {
    North,
    South,
    East,
    West,
}

impl Coast {
    /// Returns the 2-letter abbreviation.
    pub const fn abbr(self) -> &'static str {
        match self {
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
            Coast::West => "wc",
        }
    }

    /// Parses a coast from its 2-letter abbreviation (case-insensitive).
    pub fn from_abbr(s: &str) -> Option<Coast> {
        match s.to_ascii_lowercase().as_str() {
            "nc" => Some(Coast::North),
            "sc" => Some(Coast::South),
            "ec" => Some(Coast::East),
            "wc" => Some(Coast::West),
            _ => None,
        }
    }
}

/// A base province code such as `SPA`, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProvinceCode(String);

impl ProvinceCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProvinceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An exact territory identifier: base province plus optional coast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProvinceId {
    pub base: ProvinceCode,
    pub coast: Option<Coast>,
}

impl ProvinceId {
    /// Returns the identifier with the coast qualifier dropped.
    pub fn base_id(&self) -> ProvinceId {
        ProvinceId {
            base: self.base.clone(),
            coast: None,
        }
    }

    pub fn is_coast_qualified(&self) -> bool {
        self.coast.is_some()
    }
}

impl FromStr for ProvinceId {
    type Err = ProvinceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ProvinceIdError::Empty);
        }

        let (base, coast) = match s.split_once('/') {
            Some((base, coast)) => {
                let c = Coast::from_abbr(coast)
                    .ok_or_else(|| ProvinceIdError::UnknownCoast(coast.to_string()))?;
                (base, Some(c))
            }
            None => (s, None),
        };

        if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ProvinceIdError::InvalidCode(base.to_string()));
        }

        Ok(ProvinceId {
            base: ProvinceCode(base.to_ascii_uppercase()),
            coast,
        })
    }
}

impl fmt::Display for ProvinceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coast {
            Some(c) => write!(f, "{}/{}", self.base, c.abbr()),
            None => write!(f, "{}", self.base),
        }
    }
}

impl Serialize for ProvinceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProvinceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Classifies a territory by what may stand on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Inland: armies only.
    Land,
    /// Coastal: armies and fleets.
    Coast,
    Sea,
    /// A named coast of a split-coast province: fleets only.
    FleetCoast,
}

impl Category {
    pub const fn army_can_stand(self) -> bool {
        matches!(self, Category::Land | Category::Coast)
    }

    pub const fn fleet_can_stand(self) -> bool {
        !matches!(self, Category::Land)
    }
}
