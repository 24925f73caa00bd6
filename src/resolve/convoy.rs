//! Convoy validation.
//!
//! A convoyed army needs an unbroken chain of fleets at sea, each ordered to
//! carry it, none of them dislodged, linked by naval adjacency from a sea
//! bordering the army's origin to a sea bordering its destination.

use std::collections::VecDeque;

use tracing::debug;

use crate::board::{MapGraph, TerritoryIdx};

use super::legality::ConvoyIntent;
use super::Context;

/// Breadth-first search over the seas holding a matching convoy order.
///
/// `blocked(unit)` excludes fleets from the chain (dislodged fleets).
pub fn convoy_path_exists(
    graph: &MapGraph,
    convoys: &[Option<ConvoyIntent>],
    origin: TerritoryIdx,
    dest: TerritoryIdx,
    blocked: impl Fn(usize) -> bool,
) -> bool {
    // An army is only ever carried to land.
    if !graph.category(dest).army_can_stand() {
        return false;
    }
    let carriers: Vec<&ConvoyIntent> = convoys
        .iter()
        .flatten()
        .filter(|c| c.carries(origin, dest) && !blocked(c.unit))
        .collect();
    if carriers.is_empty() {
        return false;
    }

    let mut visited = vec![false; carriers.len()];
    let mut queue = VecDeque::with_capacity(carriers.len());
    for (i, c) in carriers.iter().enumerate() {
        if graph.naval_reaches_base(c.sea, origin) {
            visited[i] = true;
            queue.push_back(i);
        }
    }

    while let Some(current) = queue.pop_front() {
        let sea = carriers[current].sea;
        if graph.naval_reaches_base(sea, dest) {
            return true;
        }
        for (i, c) in carriers.iter().enumerate() {
            if !visited[i] && graph.is_naval_adjacent(sea, c.sea) {
                visited[i] = true;
                queue.push_back(i);
            }
        }
    }

    false
}

/// Revokes every successful convoyed move that no longer has an intact
/// chain. `dislodged[unit]` reports the current provisional dislodgements;
/// the convoyed move's own dislodgement disappears with its success.
pub fn disrupt_convoys(
    ctx: &Context<'_>,
    succeeded: &mut [bool],
    dislodged: &[Option<usize>],
) -> usize {
    let mut disrupted = 0;
    for m in ctx.orders.legal_moves() {
        if !m.via_convoy || !succeeded[m.unit] {
            continue;
        }
        if !convoy_path_exists(ctx.graph, &ctx.orders.convoys, m.from, m.dest, |u| {
            dislodged[u].is_some()
        }) {
            debug!(unit = %ctx.units[m.unit].id, "convoy disrupted");
            succeeded[m.unit] = false;
            disrupted += 1;
        }
    }
    disrupted
}
