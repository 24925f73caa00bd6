//! Territory graph.
//!
//! The map is supplied as data (`MapSpec`, the JSON shape exchanged with the
//! orchestrator) and compiled once into an index-addressable arena: every
//! exact identifier gets a `TerritoryIdx`, each record knows the index of its
//! base province, and adjacency is stored as per-territory edge lists.
//!
//! Edges are directed and declared per exact identifier. Army movement uses
//! only land edges between base provinces; fleet movement uses only naval
//! edges, which name coast-qualified identifiers on split-coast provinces.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::province::{Category, ProvinceId, ProvinceIdError};

/// The bundled standard map in `MapSpec` JSON form.
pub const STANDARD_MAP_JSON: &str = include_str!("../../data/standard.json");

/// Errors raised while compiling a `MapSpec` into a `MapGraph`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("malformed map json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid territory id '{id}': {source}")]
    InvalidId {
        id: String,
        #[source]
        source: ProvinceIdError,
    },

    #[error("territory '{0}' is declared twice")]
    Duplicate(String),

    #[error("coast '{0}' has no declared base province")]
    MissingBase(String),

    #[error("territory '{id}' has category {category:?}, which does not match its identifier")]
    CategoryMismatch { id: String, category: Category },

    #[error("edge {from} -> {to} names an undeclared territory")]
    UnknownEdgeEndpoint { from: String, to: String },

    #[error("map has {0} territories, more than an index can address")]
    TooLarge(usize),
}

/// Serializable description of one territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritorySpec {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub supply_center: bool,
}

/// Serializable description of one directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub to: String,
    #[serde(rename = "isNaval", alias = "is_naval")]
    pub is_naval: bool,
}

/// The map as supplied by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSpec {
    pub territories: BTreeMap<String, TerritorySpec>,
    #[serde(default)]
    pub adjacency: BTreeMap<String, Vec<EdgeSpec>>,
}

/// Index of a territory in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerritoryIdx(u16);

impl TerritoryIdx {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A compiled territory record.
#[derive(Debug, Clone)]
pub struct Territory {
    pub id: ProvinceId,
    pub name: String,
    pub category: Category,
    pub supply_center: bool,
    /// Index of the base province; equals the record's own index when the
    /// identifier carries no coast.
    pub base: TerritoryIdx,
}

/// A compiled directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: TerritoryIdx,
    pub naval: bool,
}

/// Immutable territory/adjacency graph.
#[derive(Debug, Clone)]
pub struct MapGraph {
    territories: Vec<Territory>,
    index: HashMap<ProvinceId, TerritoryIdx>,
    edges: Vec<Vec<Edge>>,
    /// Fleet-only coasts of each base province, indexed by base.
    coasts: Vec<Vec<TerritoryIdx>>,
}

impl MapGraph {
    /// Compiles the bundled standard map.
    pub fn standard() -> Result<MapGraph, MapError> {
        MapGraph::from_json(STANDARD_MAP_JSON)
    }

    /// Parses a `MapSpec` from JSON and compiles it.
    pub fn from_json(json: &str) -> Result<MapGraph, MapError> {
        let spec: MapSpec = serde_json::from_str(json)?;
        MapGraph::from_spec(&spec)
    }

    /// Compiles a `MapSpec`, validating identifiers, categories and edges.
    pub fn from_spec(spec: &MapSpec) -> Result<MapGraph, MapError> {
        if spec.territories.len() > u16::MAX as usize {
            return Err(MapError::TooLarge(spec.territories.len()));
        }

        let mut parsed = Vec::with_capacity(spec.territories.len());
        let mut index = HashMap::with_capacity(spec.territories.len());
        for (raw, info) in &spec.territories {
            let id = parse_id(raw)?;
            let qualified = id.is_coast_qualified();
            if qualified != (info.category == Category::FleetCoast) {
                return Err(MapError::CategoryMismatch {
                    id: raw.clone(),
                    category: info.category,
                });
            }
            let idx = TerritoryIdx(parsed.len() as u16);
            if index.insert(id.clone(), idx).is_some() {
                return Err(MapError::Duplicate(raw.clone()));
            }
            parsed.push((id, info));
        }

        let mut territories = Vec::with_capacity(parsed.len());
        let mut coasts = vec![Vec::new(); parsed.len()];
        for (i, (id, info)) in parsed.into_iter().enumerate() {
            let base = if id.is_coast_qualified() {
                let base = *index
                    .get(&id.base_id())
                    .ok_or_else(|| MapError::MissingBase(id.to_string()))?;
                coasts[base.index()].push(TerritoryIdx(i as u16));
                base
            } else {
                TerritoryIdx(i as u16)
            };
            territories.push(Territory {
                id,
                name: info.name.clone(),
                category: info.category,
                supply_center: info.supply_center,
                base,
            });
        }

        let mut edges = vec![Vec::new(); territories.len()];
        for (from, list) in &spec.adjacency {
            let from_idx = resolve_endpoint(&index, from, from, from)?;
            for e in list {
                let to_idx = resolve_endpoint(&index, &e.to, from, &e.to)?;
                edges[from_idx.index()].push(Edge {
                    to: to_idx,
                    naval: e.is_naval,
                });
            }
        }

        Ok(MapGraph {
            territories,
            index,
            edges,
            coasts,
        })
    }

    /// Number of exact territories, coast variants included.
    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn territory(&self, idx: TerritoryIdx) -> &Territory {
        &self.territories[idx.index()]
    }

    pub fn territories(&self) -> impl Iterator<Item = (TerritoryIdx, &Territory)> {
        self.territories
            .iter()
            .enumerate()
            .map(|(i, t)| (TerritoryIdx(i as u16), t))
    }

    pub fn id(&self, idx: TerritoryIdx) -> &ProvinceId {
        &self.territories[idx.index()].id
    }

    pub fn category(&self, idx: TerritoryIdx) -> Category {
        self.territories[idx.index()].category
    }

    #[inline]
    pub fn base_of(&self, idx: TerritoryIdx) -> TerritoryIdx {
        self.territories[idx.index()].base
    }

    /// Looks up an exact identifier.
    pub fn lookup(&self, id: &ProvinceId) -> Option<TerritoryIdx> {
        self.index.get(id).copied()
    }

    /// Parses and looks up an identifier; `None` if malformed or undeclared.
    pub fn lookup_str(&self, s: &str) -> Option<TerritoryIdx> {
        s.parse::<ProvinceId>().ok().and_then(|id| self.lookup(&id))
    }

    /// Fleet-only coasts of a base province (empty when the coast is not split).
    pub fn coasts_of(&self, base: TerritoryIdx) -> &[TerritoryIdx] {
        &self.coasts[self.base_of(base).index()]
    }

    pub fn edges(&self, idx: TerritoryIdx) -> &[Edge] {
        &self.edges[idx.index()]
    }

    pub fn land_neighbors(&self, idx: TerritoryIdx) -> impl Iterator<Item = TerritoryIdx> + '_ {
        self.edges(idx).iter().filter(|e| !e.naval).map(|e| e.to)
    }

    pub fn naval_neighbors(&self, idx: TerritoryIdx) -> impl Iterator<Item = TerritoryIdx> + '_ {
        self.edges(idx).iter().filter(|e| e.naval).map(|e| e.to)
    }

    /// True if a land edge joins the two base provinces.
    pub fn is_land_adjacent(&self, from: TerritoryIdx, to: TerritoryIdx) -> bool {
        let from = self.base_of(from);
        let to = self.base_of(to);
        self.land_neighbors(from).any(|t| self.base_of(t) == to)
    }

    /// True if a naval edge joins the two exact territories.
    pub fn is_naval_adjacent(&self, from: TerritoryIdx, to: TerritoryIdx) -> bool {
        self.naval_neighbors(from).any(|t| t == to)
    }

    /// True if a naval edge leads from `from` to any coast of `base`.
    pub fn naval_reaches_base(&self, from: TerritoryIdx, base: TerritoryIdx) -> bool {
        let base = self.base_of(base);
        self.naval_neighbors(from).any(|t| self.base_of(t) == base)
    }
}

fn parse_id(raw: &str) -> Result<ProvinceId, MapError> {
    raw.parse().map_err(|source| MapError::InvalidId {
        id: raw.to_string(),
        source,
    })
}

fn resolve_endpoint(
    index: &HashMap<ProvinceId, TerritoryIdx>,
    raw: &str,
    from: &str,
    to: &str,
) -> Result<TerritoryIdx, MapError> {
    let id = parse_id(raw)?;
    index
        .get(&id)
        .copied()
        .ok_or_else(|| MapError::UnknownEdgeEndpoint {
            from: from.to_string(),
            to: to.to_string(),
        })
}
