//! Order normalization.
//!
//! Turns the raw order list into exactly one `Action` per live unit: stale
//! client-side id suffixes are stripped, the last order per unit wins,
//! orders for units that are not on the board are dropped, and units with
//! no order hold.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::board::{Action, Country, MapGraph, RawOrder, TerritoryIdx, Unit, UnitType};

/// A unit taking part in resolution.
#[derive(Debug, Clone, Copy)]
pub struct LiveUnit<'a> {
    /// Index into the caller's unit slice.
    pub input: usize,
    pub id: &'a str,
    pub country: &'a Country,
    pub unit_type: UnitType,
    /// Exact territory (a coast for fleets on split coasts).
    pub location: TerritoryIdx,
    /// Base province of `location`.
    pub province: TerritoryIdx,
}

/// Live units paired with one action each, index-aligned.
#[derive(Debug, Clone)]
pub struct NormalizedOrders<'a> {
    pub units: Vec<LiveUnit<'a>>,
    pub actions: Vec<Action>,
    /// Input indices of units left out of resolution: unknown territory or
    /// a duplicate id.
    pub passthrough: Vec<usize>,
}

/// Strips a trailing temporary suffix (`-123`, `_4`, `:17`, `.2`) from a
/// client-generated unit id. Ids without such a suffix are returned as is.
pub fn clean_unit_id(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() == raw.len() {
        return raw;
    }
    match trimmed.strip_suffix(|c: char| matches!(c, '-' | '_' | ':' | '.')) {
        Some(stem) if !stem.is_empty() => stem,
        _ => raw,
    }
}

/// Builds the live unit table and one action per live unit.
pub fn normalize<'a>(
    graph: &MapGraph,
    units: &'a [Unit],
    orders: &[RawOrder],
) -> NormalizedOrders<'a> {
    let mut live = Vec::with_capacity(units.len());
    let mut passthrough = Vec::new();
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(units.len());

    for (i, unit) in units.iter().enumerate() {
        let location = match graph.lookup_str(&unit.territory) {
            Some(t) => t,
            None => {
                warn!(unit = %unit.id, territory = %unit.territory, "unit on unknown territory takes no part in resolution");
                passthrough.push(i);
                continue;
            }
        };
        if by_id.contains_key(unit.id.as_str()) {
            warn!(unit = %unit.id, "duplicate unit id; keeping the first");
            passthrough.push(i);
            continue;
        }
        let province = graph.base_of(location);
        // Armies never stand on a named coast.
        let location = match unit.unit_type {
            UnitType::Army => province,
            UnitType::Navy => location,
        };
        by_id.insert(unit.id.as_str(), live.len());
        live.push(LiveUnit {
            input: i,
            id: unit.id.as_str(),
            country: &unit.country,
            unit_type: unit.unit_type,
            location,
            province,
        });
    }

    // Last order per unit wins.
    let mut latest: Vec<Option<&RawOrder>> = vec![None; live.len()];
    for order in orders {
        let slot = by_id
            .get(order.unit_id.as_str())
            .or_else(|| by_id.get(clean_unit_id(&order.unit_id)))
            .copied();
        match slot {
            Some(slot) => latest[slot] = Some(order),
            None => warn!(unit = %order.unit_id, "dropping order for unknown unit"),
        }
    }

    let actions = live
        .iter()
        .zip(&latest)
        .map(|(unit, order)| match order {
            None => Action::Hold,
            Some(raw) => Action::from_raw(raw, unit.unit_type, graph).unwrap_or_else(|| {
                trace!(unit = %unit.id, ?raw, "inert order treated as hold");
                Action::Hold
            }),
        })
        .collect::<Vec<_>>();

    debug!(
        live = live.len(),
        passthrough = passthrough.len(),
        submitted = orders.len(),
        "normalized orders"
    );

    NormalizedOrders {
        units: live,
        actions,
        passthrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OrderKind;

    fn graph() -> MapGraph {
        MapGraph::standard().unwrap()
    }

    #[test]
    fn clean_unit_id_strips_numeric_suffix() {
        assert_eq!(clean_unit_id("army-par-1699999"), "army-par");
        assert_eq!(clean_unit_id("u7_3"), "u7");
        assert_eq!(clean_unit_id("fleet:12"), "fleet");
        assert_eq!(clean_unit_id("plain"), "plain");
        assert_eq!(clean_unit_id("u12"), "u12");
        assert_eq!(clean_unit_id("-12"), "-12");
    }

    #[test]
    fn one_action_per_live_unit() {
        let g = graph();
        let units = vec![
            Unit::army("a1", "france", "PAR"),
            Unit::army("a2", "france", "MAR"),
            Unit::navy("f1", "france", "BRE"),
        ];
        let orders = vec![RawOrder::move_to("a1", "BUR")];
        let n = normalize(&g, &units, &orders);
        assert_eq!(n.units.len(), 3);
        assert_eq!(n.actions.len(), 3);
        assert!(matches!(n.actions[0], Action::Move { .. }));
        assert_eq!(n.actions[1], Action::Hold);
        assert_eq!(n.actions[2], Action::Hold);
    }

    #[test]
    fn last_order_wins() {
        let g = graph();
        let units = vec![Unit::army("a1", "france", "PAR")];
        let orders = vec![
            RawOrder::move_to("a1", "BUR"),
            RawOrder::move_to("a1-1700000000", "PIC"),
        ];
        let n = normalize(&g, &units, &orders);
        assert_eq!(
            n.actions[0],
            Action::Move {
                target: g.lookup_str("PIC").unwrap()
            }
        );
    }

    #[test]
    fn exact_id_match_beats_suffix_stripping() {
        let g = graph();
        let units = vec![
            Unit::army("unit", "france", "PAR"),
            Unit::army("unit-2", "france", "MAR"),
        ];
        let orders = vec![RawOrder::move_to("unit-2", "PIE")];
        let n = normalize(&g, &units, &orders);
        assert_eq!(n.actions[0], Action::Hold);
        assert!(matches!(n.actions[1], Action::Move { .. }));
    }

    #[test]
    fn orders_for_unknown_units_are_dropped() {
        let g = graph();
        let units = vec![Unit::army("a1", "france", "PAR")];
        let orders = vec![RawOrder::move_to("ghost", "BUR")];
        let n = normalize(&g, &units, &orders);
        assert_eq!(n.actions, vec![Action::Hold]);
    }

    #[test]
    fn units_on_unknown_territory_pass_through() {
        let g = graph();
        let units = vec![
            Unit::army("a1", "france", "PAR"),
            Unit::army("a2", "france", "ATLANTIS"),
        ];
        let n = normalize(&g, &units, &[]);
        assert_eq!(n.units.len(), 1);
        assert_eq!(n.passthrough, vec![1]);
    }

    #[test]
    fn inert_orders_hold() {
        let g = graph();
        let units = vec![Unit::army("a1", "france", "PAR")];
        let orders = vec![RawOrder {
            action: OrderKind::Support,
            ..RawOrder::hold("a1")
        }];
        let n = normalize(&g, &units, &orders);
        assert_eq!(n.actions, vec![Action::Hold]);
    }

    #[test]
    fn army_on_named_coast_stands_on_base() {
        let g = graph();
        let units = vec![Unit::army("a1", "france", "SPA/nc")];
        let n = normalize(&g, &units, &[]);
        assert_eq!(n.units[0].location, g.lookup_str("SPA").unwrap());
    }
}
