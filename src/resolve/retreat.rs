//! Retreat-phase resolution.
//!
//! Resolves retreat orders for the units a movement phase dislodged: if two
//! units retreat to the same province, both are disbanded. Dislodged units
//! without an order, or ordered somewhere they cannot go, are disbanded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::board::{ProvinceId, Unit};

use super::movement::DislodgedUnit;
use super::normalize::clean_unit_id;

/// A retreat order in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatOrder {
    pub unit_id: String,
    pub target: String,
}

impl RetreatOrder {
    pub fn new(unit_id: impl Into<String>, target: impl Into<String>) -> Self {
        RetreatOrder {
            unit_id: unit_id.into(),
            target: target.into(),
        }
    }
}

/// Board after the retreat phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetreatOutcome {
    /// `board` minus every dislodged unit, plus the units that retreated.
    pub new_units: Vec<Unit>,
    pub disbanded: Vec<String>,
}

/// Resolves retreat orders.
///
/// `board` is the post-movement unit list (typically `newUnits`); units in it
/// that match a dislodged unit id are replaced by their retreat outcome.
pub fn resolve_retreats(
    board: &[Unit],
    dislodged: &[DislodgedUnit],
    orders: &[RetreatOrder],
) -> RetreatOutcome {
    let by_id: HashMap<&str, usize> = dislodged
        .iter()
        .enumerate()
        .map(|(i, d)| (d.unit.id.as_str(), i))
        .collect();

    // Last order per unit wins.
    let mut chosen: Vec<Option<&RetreatOrder>> = vec![None; dislodged.len()];
    for order in orders {
        let slot = by_id
            .get(order.unit_id.as_str())
            .or_else(|| by_id.get(clean_unit_id(&order.unit_id)))
            .copied();
        match slot {
            Some(slot) => chosen[slot] = Some(order),
            None => warn!(unit = %order.unit_id, "retreat order for a unit that was not dislodged"),
        }
    }

    let destinations: Vec<Option<ProvinceId>> = dislodged
        .iter()
        .zip(&chosen)
        .map(|(d, order)| order.and_then(|o| destination(d, &o.target)))
        .collect();

    let mut per_base: HashMap<ProvinceId, usize> = HashMap::new();
    for dest in destinations.iter().flatten() {
        *per_base.entry(dest.base_id()).or_default() += 1;
    }

    let mut retreated = Vec::new();
    let mut disbanded = Vec::new();
    for (d, dest) in dislodged.iter().zip(destinations) {
        match dest {
            Some(dest) if per_base[&dest.base_id()] == 1 => {
                trace!(unit = %d.unit.id, to = %dest, "retreat");
                let mut unit = d.unit.clone();
                unit.territory = dest.to_string();
                unit.dislodged = false;
                retreated.push(unit);
            }
            _ => {
                trace!(unit = %d.unit.id, "disbanded");
                disbanded.push(d.unit.id.clone());
            }
        }
    }

    let mut new_units: Vec<Unit> = board
        .iter()
        .filter(|u| !by_id.contains_key(u.id.as_str()))
        .cloned()
        .map(|mut u| {
            u.dislodged = false;
            u
        })
        .collect();
    debug!(
        retreated = retreated.len(),
        disbanded = disbanded.len(),
        "retreats resolved"
    );
    new_units.extend(retreated);

    RetreatOutcome {
        new_units,
        disbanded,
    }
}

/// The listed retreat matching `target`. A bare province names the unit's
/// only listed retreat into it, if there is exactly one.
fn destination(unit: &DislodgedUnit, target: &str) -> Option<ProvinceId> {
    let target: ProvinceId = target.parse().ok()?;
    if unit.valid_retreats.contains(&target) {
        return Some(target);
    }
    if target.is_coast_qualified() {
        return None;
    }
    let mut on_base = unit.valid_retreats.iter().filter(|p| p.base_id() == target);
    match (on_base.next(), on_base.next()) {
        (Some(only), None) => Some(only.clone()),
        _ => None,
    }
}
