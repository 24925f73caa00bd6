//! Combat resolution: head-to-head exchanges first, then every contested
//! province on its own.

use tracing::trace;

use crate::board::TerritoryIdx;
use crate::config::Ruleset;

use super::legality::MoveIntent;
use super::strength::{attack_table, hold_strength};
use super::Context;

/// Provisional outcome of one combat round.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Per live unit: the unit's move currently succeeds.
    pub succeeded: Vec<bool>,
    /// Per live unit: the unit lost or tied a head-to-head exchange. Such a
    /// move can never be promoted later.
    pub h2h_failed: Vec<bool>,
    /// Per territory (base index): a standoff happened there.
    pub standoffs: Vec<bool>,
    /// Per live unit: attack strength of its move this round.
    pub attack: Vec<u32>,
}

impl Resolution {
    /// The attacker that currently dislodges each live unit, if any.
    ///
    /// A unit is dislodged when a successful move enters its base province
    /// and its own move, if it has one, does not succeed.
    pub fn dislodged(&self, ctx: &Context<'_>) -> Vec<Option<usize>> {
        let mut dislodged = vec![None; ctx.units.len()];
        for m in ctx.orders.legal_moves() {
            if !self.succeeded[m.unit] {
                continue;
            }
            if let Some(defender) = ctx.occupant(m.dest) {
                if !self.succeeded[defender] {
                    dislodged[defender] = Some(m.unit);
                }
            }
        }
        dislodged
    }

    pub fn mark_standoff(&mut self, ctx: &Context<'_>, province: TerritoryIdx) {
        self.standoffs[ctx.graph.base_of(province).index()] = true;
    }
}

/// Runs head-to-head detection and simple attacks with the given supports
/// ignored.
///
/// Under [`Ruleset::Classic`] every pair of swapping moves meets
/// head-to-head and the winner's destination is settled there. Under
/// [`Ruleset::Datc`] convoyed moves never meet head-to-head, and the winner
/// still has to be the unique strongest entrant into the province.
pub fn resolve_combat(ctx: &Context<'_>, ignored: &[bool]) -> Resolution {
    let n = ctx.units.len();
    let rules = ctx.rules();
    let attack = attack_table(ctx, ignored);
    let mut res = Resolution {
        succeeded: vec![false; n],
        h2h_failed: vec![false; n],
        standoffs: vec![false; ctx.graph.len()],
        attack,
    };
    let mut h2h_won = vec![false; n];
    let mut settled = vec![false; ctx.graph.len()];
    let counts_h2h = |m: &MoveIntent| rules == Ruleset::Classic || !m.via_convoy;

    for m in ctx.orders.legal_moves().filter(|m| counts_h2h(m)) {
        let Some(other) = ctx.occupant(m.dest) else {
            continue;
        };
        let Some(o) = ctx.orders.moves[other] else {
            continue;
        };
        if !counts_h2h(&o) || o.dest != m.from || other < m.unit {
            continue;
        }
        let (a, b) = (res.attack[m.unit], res.attack[other]);
        if a == b {
            trace!(a = %ctx.units[m.unit].id, b = %ctx.units[other].id, "head-to-head tie");
            res.h2h_failed[m.unit] = true;
            res.h2h_failed[other] = true;
            res.mark_standoff(ctx, m.dest);
            res.mark_standoff(ctx, m.from);
        } else {
            let (winner, loser) = if a > b { (m.unit, other) } else { (other, m.unit) };
            trace!(winner = %ctx.units[winner].id, loser = %ctx.units[loser].id, "head-to-head");
            h2h_won[winner] = true;
            res.h2h_failed[loser] = true;
            if rules == Ruleset::Classic {
                res.succeeded[winner] = true;
                if let Some(w) = ctx.orders.moves[winner] {
                    settled[w.dest.index()] = true;
                }
            }
        }
    }

    for dest in ctx.contested() {
        if settled[dest.index()] {
            continue;
        }
        let contenders: Vec<usize> = ctx
            .entrants(dest)
            .iter()
            .copied()
            .filter(|&u| !res.h2h_failed[u])
            .collect();
        let Some(winner) = unique_strongest(&contenders, &res.attack) else {
            if !contenders.is_empty() {
                res.mark_standoff(ctx, dest);
            }
            continue;
        };

        let defense = ctx
            .occupant(dest)
            .map_or(0, |occupant| hold_strength(ctx, ignored, occupant));
        if h2h_won[winner] || res.attack[winner] > defense {
            res.succeeded[winner] = true;
        } else {
            trace!(unit = %ctx.units[winner].id, defense, "attack held off");
            res.mark_standoff(ctx, dest);
        }
    }

    res
}

/// The single entrant with the highest attack strength, `None` when the
/// list is empty or the maximum is shared.
pub fn unique_strongest(entrants: &[usize], attack: &[u32]) -> Option<usize> {
    let max = entrants.iter().map(|&u| attack[u]).max()?;
    let mut top = entrants.iter().copied().filter(|&u| attack[u] == max);
    match (top.next(), top.next()) {
        (Some(winner), None) => Some(winner),
        _ => None,
    }
}
