//! Legality filter.
//!
//! Decides, per order, whether the unit can physically carry it out. Orders
//! that fail are void: they take no part in strength or combat, and the unit
//! stays where it is (it may still be attacked and still holds).
//!
//! Under [`Ruleset::Classic`] only moves are checked: an army move with no
//! land edge is always accepted for the convoy validator to settle, and
//! supports are never void. [`Ruleset::Datc`] adds the reach and convoy
//! chain checks.

use tracing::trace;

use crate::board::{Action, Category, MapGraph, TerritoryIdx, UnitType};
use crate::config::Ruleset;

use super::convoy::convoy_path_exists;
use super::normalize::{LiveUnit, NormalizedOrders};

/// A legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub unit: usize,
    /// Base province the unit leaves.
    pub from: TerritoryIdx,
    /// Exact territory the unit lands on if the move succeeds.
    pub landing: TerritoryIdx,
    /// Base province of `landing`.
    pub dest: TerritoryIdx,
    /// Army move with no land edge; must be carried by an intact convoy.
    pub via_convoy: bool,
}

/// A legal support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportIntent {
    pub unit: usize,
    /// Base province of the supporting unit.
    pub province: TerritoryIdx,
    pub origin: TerritoryIdx,
    pub target: TerritoryIdx,
}

impl SupportIntent {
    pub fn is_hold(&self) -> bool {
        self.origin == self.target
    }
}

/// A legal convoy: a fleet at sea offering to carry an army.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvoyIntent {
    pub unit: usize,
    pub sea: TerritoryIdx,
    pub army_origin: TerritoryIdx,
    pub destination: Option<TerritoryIdx>,
}

impl ConvoyIntent {
    /// True if this fleet offers to carry an army from `origin` to `dest`.
    pub fn carries(&self, origin: TerritoryIdx, dest: TerritoryIdx) -> bool {
        self.army_origin == origin && self.destination.map_or(true, |d| d == dest)
    }
}

/// Legal orders, index-aligned with the live units.
#[derive(Debug, Clone, Default)]
pub struct LegalOrders {
    pub moves: Vec<Option<MoveIntent>>,
    pub supports: Vec<Option<SupportIntent>>,
    pub convoys: Vec<Option<ConvoyIntent>>,
    /// Orders other than hold that failed legality.
    pub void: Vec<bool>,
    /// Rules the orders were checked under; later stages follow the same.
    pub rules: Ruleset,
}

impl LegalOrders {
    pub fn legal_moves(&self) -> impl Iterator<Item = &MoveIntent> {
        self.moves.iter().flatten()
    }

    pub fn legal_supports(&self) -> impl Iterator<Item = &SupportIntent> {
        self.supports.iter().flatten()
    }
}

/// Applies the legality rules to every normalized order.
pub fn filter(graph: &MapGraph, normalized: &NormalizedOrders<'_>, rules: Ruleset) -> LegalOrders {
    let n = normalized.units.len();
    let mut legal = LegalOrders {
        moves: vec![None; n],
        supports: vec![None; n],
        convoys: vec![None; n],
        void: vec![false; n],
        rules,
    };

    // Convoys first: under DATC rules tentative army moves are checked
    // against them.
    for (i, (unit, action)) in normalized.units.iter().zip(&normalized.actions).enumerate() {
        if let Action::Convoy {
            army_origin,
            destination,
        } = *action
        {
            let at_sea =
                unit.unit_type == UnitType::Navy && graph.category(unit.location) == Category::Sea;
            if at_sea && destination != Some(army_origin) {
                legal.convoys[i] = Some(ConvoyIntent {
                    unit: i,
                    sea: unit.location,
                    army_origin,
                    destination,
                });
            } else {
                legal.void[i] = true;
            }
        }
    }

    for (i, (unit, action)) in normalized.units.iter().zip(&normalized.actions).enumerate() {
        match *action {
            Action::Hold | Action::Convoy { .. } => {}
            Action::Move { target } => {
                match legal_move(graph, unit, i, target, &legal.convoys, rules) {
                    Some(m) => legal.moves[i] = Some(m),
                    None => {
                        trace!(unit = %unit.id, target = %graph.id(target), "void move");
                        legal.void[i] = true;
                    }
                }
            }
            Action::Support {
                supported_origin,
                supported_target,
            } => {
                if rules == Ruleset::Classic || can_reach(graph, unit, supported_target) {
                    legal.supports[i] = Some(SupportIntent {
                        unit: i,
                        province: unit.province,
                        origin: supported_origin,
                        target: supported_target,
                    });
                } else {
                    trace!(unit = %unit.id, target = %graph.id(supported_target), "void support");
                    legal.void[i] = true;
                }
            }
        }
    }

    legal
}

fn legal_move(
    graph: &MapGraph,
    unit: &LiveUnit<'_>,
    index: usize,
    target: TerritoryIdx,
    convoys: &[Option<ConvoyIntent>],
    rules: Ruleset,
) -> Option<MoveIntent> {
    let dest = graph.base_of(target);
    if dest == unit.province {
        return None;
    }

    match unit.unit_type {
        UnitType::Navy => {
            let landing = match rules {
                Ruleset::Classic => {
                    if !graph.is_naval_adjacent(unit.location, target)
                        || !graph.category(target).fleet_can_stand()
                    {
                        return None;
                    }
                    target
                }
                Ruleset::Datc => fleet_landing(graph, unit.location, target)?,
            };
            Some(MoveIntent {
                unit: index,
                from: unit.province,
                landing,
                dest,
                via_convoy: false,
            })
        }
        UnitType::Army => {
            let tentative = MoveIntent {
                unit: index,
                from: unit.province,
                landing: dest,
                dest,
                via_convoy: true,
            };
            if graph.is_land_adjacent(unit.province, dest) {
                return Some(MoveIntent {
                    via_convoy: false,
                    ..tentative
                });
            }
            match rules {
                // Left to the convoy validator.
                Ruleset::Classic => Some(tentative),
                // Some chain of convoy orders must be able to carry it at all.
                Ruleset::Datc => {
                    let coastal = graph.category(unit.province) == Category::Coast
                        && graph.category(dest) == Category::Coast;
                    (coastal && convoy_path_exists(graph, convoys, unit.province, dest, |_| false))
                        .then_some(tentative)
                }
            }
        }
    }
}

/// Resolves where a fleet lands. A bare split-coast target is accepted when
/// exactly one of its coasts is reachable.
fn fleet_landing(graph: &MapGraph, from: TerritoryIdx, target: TerritoryIdx) -> Option<TerritoryIdx> {
    if graph.is_naval_adjacent(from, target) {
        return graph.category(target).fleet_can_stand().then_some(target);
    }
    if graph.base_of(target) != target {
        return None;
    }
    let mut reachable = graph
        .coasts_of(target)
        .iter()
        .copied()
        .filter(|&c| graph.is_naval_adjacent(from, c));
    match (reachable.next(), reachable.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// True if the unit could itself move into `province`; under DATC rules a
/// unit may only support into provinces it can reach.
fn can_reach(graph: &MapGraph, unit: &LiveUnit<'_>, province: TerritoryIdx) -> bool {
    if province == unit.province {
        return false;
    }
    match unit.unit_type {
        UnitType::Army => {
            graph.category(province).army_can_stand() && graph.is_land_adjacent(unit.province, province)
        }
        UnitType::Navy => graph.naval_reaches_base(unit.location, province),
    }
}
