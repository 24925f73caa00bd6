//! Vacate-fill.
//!
//! Combat compares an entrant against the hold strength of a unit that may
//! be leaving. Once the final set of successful moves is known, provinces
//! vacated by successful movers are re-examined and their strongest entrant
//! promoted, repeating until nothing changes. Closed rotations, where every
//! province is vacated only if every other move succeeds, are promoted as a
//! whole.

use tracing::{debug, trace};

use crate::board::TerritoryIdx;

use super::combat::{unique_strongest, Resolution};
use super::convoy::convoy_path_exists;
use super::Context;

/// Promotes entrants into vacated provinces and closed rotations until a
/// fixed point. Returns the number of moves promoted.
pub fn fill_vacated(ctx: &Context<'_>, res: &mut Resolution) -> usize {
    let mut promoted = 0;
    loop {
        let mut changed = false;
        let dislodged = res.dislodged(ctx);
        let mut entered = vec![false; ctx.graph.len()];
        let mut vacated = vec![false; ctx.graph.len()];
        for m in ctx.orders.legal_moves().filter(|m| res.succeeded[m.unit]) {
            entered[m.dest.index()] = true;
            vacated[m.from.index()] = true;
        }

        for dest in ctx.contested() {
            let i = dest.index();
            if !vacated[i] || entered[i] {
                continue;
            }
            let candidates = candidates(ctx, res, &dislodged, dest);
            match unique_strongest(&candidates, &res.attack) {
                Some(winner) => {
                    trace!(unit = %ctx.units[winner].id, into = %ctx.graph.id(dest), "vacate-fill");
                    res.succeeded[winner] = true;
                    res.standoffs[i] = false;
                    entered[i] = true;
                    if let Some(m) = ctx.orders.moves[winner] {
                        vacated[m.from.index()] = true;
                    }
                    promoted += 1;
                    changed = true;
                }
                None if !candidates.is_empty() => res.standoffs[i] = true,
                None => {}
            }
        }

        if !changed {
            match find_rotation(ctx, res, &dislodged, &entered) {
                Some(cycle) => {
                    debug!(len = cycle.len(), "rotation promoted");
                    for &u in &cycle {
                        res.succeeded[u] = true;
                        if let Some(m) = ctx.orders.moves[u] {
                            res.standoffs[m.dest.index()] = false;
                        }
                    }
                    promoted += cycle.len();
                }
                None => break,
            }
        }
    }
    promoted
}

/// Entrants into `dest` still eligible for promotion.
fn candidates(
    ctx: &Context<'_>,
    res: &Resolution,
    dislodged: &[Option<usize>],
    dest: TerritoryIdx,
) -> Vec<usize> {
    ctx.entrants(dest)
        .iter()
        .copied()
        .filter(|&u| !res.succeeded[u] && !res.h2h_failed[u] && path_intact(ctx, dislodged, u))
        .collect()
}

fn path_intact(ctx: &Context<'_>, dislodged: &[Option<usize>], unit: usize) -> bool {
    match ctx.orders.moves[unit] {
        Some(m) if m.via_convoy => convoy_path_exists(ctx.graph, &ctx.orders.convoys, m.from, m.dest, |u| {
            dislodged[u].is_some()
        }),
        Some(_) => true,
        None => false,
    }
}

/// Finds a closed rotation of failed moves, each the unique strongest
/// eligible entrant of a province held by the next member. Two-unit swaps
/// qualify only when convoyed, which happens under DATC rules; every other
/// swap was settled head-to-head.
fn find_rotation(
    ctx: &Context<'_>,
    res: &Resolution,
    dislodged: &[Option<usize>],
    entered: &[bool],
) -> Option<Vec<usize>> {
    let qualifies = |u: usize| -> bool {
        let Some(m) = ctx.orders.moves[u] else {
            return false;
        };
        if entered[m.dest.index()] {
            return false;
        }
        let pool = candidates(ctx, res, dislodged, m.dest);
        unique_strongest(&pool, &res.attack) == Some(u)
    };

    for start in 0..ctx.units.len() {
        if !qualifies(start) {
            continue;
        }
        let mut chain = vec![start];
        let mut current = start;
        loop {
            let Some(m) = ctx.orders.moves[current] else { break };
            let Some(next) = ctx.occupant(m.dest) else { break };
            if next == start {
                let convoyed = chain
                    .iter()
                    .any(|&u| ctx.orders.moves[u].is_some_and(|m| m.via_convoy));
                if chain.len() >= 3 || (chain.len() == 2 && convoyed) {
                    return Some(chain);
                }
                break;
            }
            if chain.contains(&next) || !qualifies(next) {
                break;
            }
            chain.push(next);
            current = next;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{MapGraph, RawOrder, Unit};
    use crate::config::Ruleset;
    use crate::resolve::combat::resolve_combat;
    use crate::resolve::{legality, normalize::normalize};

    fn settle(units: &[Unit], orders: &[RawOrder]) -> Vec<bool> {
        let g = MapGraph::standard().unwrap();
        let n = normalize(&g, units, orders);
        let legal = legality::filter(&g, &n, Ruleset::Classic);
        let ctx = Context::new(&g, &n.units, &legal);
        let mut res = resolve_combat(&ctx, &vec![false; units.len()]);
        fill_vacated(&ctx, &mut res);
        res.succeeded
    }

    #[test]
    fn follows_a_unit_that_moves_away() {
        let units = [
            Unit::army("par", "france", "PAR"),
            Unit::army("bur", "france", "BUR"),
        ];
        let orders = [RawOrder::move_to("par", "BUR"), RawOrder::move_to("bur", "MUN")];
        assert_eq!(settle(&units, &orders), vec![true, true]);
    }

    #[test]
    fn standoff_behind_a_vacated_province() {
        let units = [
            Unit::army("bur", "france", "BUR"),
            Unit::army("par", "france", "PAR"),
            Unit::army("mar", "italy", "MAR"),
        ];
        let orders = [
            RawOrder::move_to("bur", "MUN"),
            RawOrder::move_to("par", "BUR"),
            RawOrder::move_to("mar", "BUR"),
        ];
        assert_eq!(settle(&units, &orders), vec![true, false, false]);
    }

    #[test]
    fn three_way_rotation_succeeds() {
        let units = [
            Unit::navy("ank", "turkey", "ANK"),
            Unit::army("con", "turkey", "CON"),
            Unit::army("smy", "turkey", "SMY"),
        ];
        let orders = [
            RawOrder::move_to("ank", "CON"),
            RawOrder::move_to("con", "SMY"),
            RawOrder::move_to("smy", "ANK"),
        ];
        assert_eq!(settle(&units, &orders), vec![true, true, true]);
    }

    #[test]
    fn rotation_blocked_by_equal_outsider() {
        let units = [
            Unit::navy("ank", "turkey", "ANK"),
            Unit::army("con", "turkey", "CON"),
            Unit::army("smy", "turkey", "SMY"),
            Unit::army("bul", "russia", "BUL"),
        ];
        let orders = [
            RawOrder::move_to("ank", "CON"),
            RawOrder::move_to("con", "SMY"),
            RawOrder::move_to("smy", "ANK"),
            RawOrder::move_to("bul", "CON"),
        ];
        assert_eq!(settle(&units, &orders), vec![false, false, false, false]);
    }
}
