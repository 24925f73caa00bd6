//! Board representation.
//!
//! Contains the territory graph, province identifiers, units and orders.

pub mod graph;
pub mod order;
pub mod province;
pub mod unit;

pub use graph::{
    Edge, EdgeSpec, MapError, MapGraph, MapSpec, Territory, TerritoryIdx, TerritorySpec,
    STANDARD_MAP_JSON,
};
pub use order::{Action, OrderKind, RawOrder};
pub use province::{Category, Coast, ProvinceCode, ProvinceId, ProvinceIdError};
pub use unit::{Country, Unit, UnitType};
