//! Retreat-phase move generation.
//!
//! Enumerates the legal retreat destinations of a dislodged unit.

use crate::board::{MapGraph, TerritoryIdx, UnitType};

/// Everything that rules a province out as a retreat destination.
///
/// `standoffs` and `occupied` are indexed by base territory.
#[derive(Debug, Clone, Copy)]
pub struct RetreatExclusions<'a> {
    /// Base province the attacker moved from.
    pub attacker_origin: TerritoryIdx,
    pub standoffs: &'a [bool],
    pub occupied: &'a [bool],
}

/// Legal retreat destinations for a unit dislodged from `location`.
///
/// Armies follow land edges into land or coastal provinces; fleets follow
/// naval edges from their exact location, so a fleet may retreat onto a
/// specific coast. A destination is excluded when its base province is the
/// unit's own, the attacker's origin, a standoff or occupied after movement.
/// An empty list means the unit must disband.
pub fn valid_retreats(
    graph: &MapGraph,
    unit_type: UnitType,
    location: TerritoryIdx,
    exclusions: &RetreatExclusions<'_>,
) -> Vec<TerritoryIdx> {
    let own = graph.base_of(location);
    let attacker = graph.base_of(exclusions.attacker_origin);

    let candidates: Vec<TerritoryIdx> = match unit_type {
        UnitType::Army => graph
            .land_neighbors(own)
            .map(|t| graph.base_of(t))
            .filter(|&t| graph.category(t).army_can_stand())
            .collect(),
        UnitType::Navy => graph
            .naval_neighbors(location)
            .filter(|&t| graph.category(t).fleet_can_stand())
            .collect(),
    };

    let mut retreats = Vec::with_capacity(candidates.len());
    for dest in candidates {
        let base = graph.base_of(dest);
        if base == own
            || base == attacker
            || exclusions.standoffs[base.index()]
            || exclusions.occupied[base.index()]
            || retreats.contains(&dest)
        {
            continue;
        }
        retreats.push(dest);
    }
    retreats
}
