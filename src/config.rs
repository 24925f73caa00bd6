//! Adjudicator configuration.
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! rules = "datc"
//! reresolution = "fixed_point"
//! max_rounds = 8
//! map_path = "maps/variant.json"
//! ```
//!
//! Every field is optional; an empty file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{MapError, MapGraph};

/// How often combat is re-run after supports from dislodged units are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reresolution {
    /// At most one corrective round.
    #[default]
    SinglePass,
    /// Repeat rounds until no further support is dropped.
    FixedPoint,
}

/// Which reading of the resolution rules the adjudicator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// The strength formulas as written. Every well-formed support counts
    /// wherever the supporter stands, support-to-hold also helps a unit that
    /// is moving, an army move with no land edge is an entrant until its
    /// convoy is checked, and any two swapping moves meet head-to-head.
    #[default]
    Classic,
    /// DATC preferences: support needs reach, support-to-hold does not help
    /// a moving unit, an army move with no land edge needs both ends coastal
    /// and some chain of convoy orders, a fleet may omit the coast when only
    /// one is reachable, convoyed moves never meet head-to-head, and a
    /// head-to-head winner must still be the strongest entrant.
    Datc,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid map {}: {source}", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: MapError,
    },

    #[error("bundled map is invalid: {0}")]
    StandardMap(#[source] MapError),

    #[error("max_rounds must be at least 1")]
    ZeroRounds,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjudicatorConfig {
    pub rules: Ruleset,
    pub reresolution: Reresolution,
    /// Upper bound on corrective rounds under `FixedPoint`. Defaults to the
    /// number of live units plus one.
    pub max_rounds: Option<usize>,
    /// Map JSON to load instead of the bundled standard map.
    pub map_path: Option<PathBuf>,
}

impl AdjudicatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: AdjudicatorConfig = toml::from_str(s)?;
        if config.max_rounds == Some(0) {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(config)
    }

    /// Reads and parses a TOML config file. A relative `map_path` is taken
    /// relative to the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = AdjudicatorConfig::from_toml_str(&text)?;
        if let (Some(map), Some(dir)) = (&config.map_path, path.parent()) {
            if map.is_relative() {
                config.map_path = Some(dir.join(map));
            }
        }
        Ok(config)
    }

    /// Builds the configured map graph.
    pub fn load_map(&self) -> Result<MapGraph, ConfigError> {
        let Some(path) = &self.map_path else {
            return MapGraph::standard().map_err(ConfigError::StandardMap);
        };
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        MapGraph::from_json(&json).map_err(|source| ConfigError::Map {
            path: path.clone(),
            source,
        })
    }

    /// Number of corrective rounds allowed for a phase with `live_units`
    /// units on the board.
    pub fn round_limit(&self, live_units: usize) -> usize {
        match self.reresolution {
            Reresolution::SinglePass => 1,
            Reresolution::FixedPoint => self.max_rounds.unwrap_or(live_units + 1),
        }
    }
}
