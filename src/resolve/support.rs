//! Support cutting.
//!
//! A support is cut by any legal move into the supporter's province made by
//! a unit of another country, whatever becomes of that move. The one
//! exception: a support for a move is not cut by an attack coming from the
//! province the support is aimed at.

use tracing::trace;

use super::Context;

/// Returns, per live unit, whether its support order is cut.
pub fn cut_supports(ctx: &Context<'_>) -> Vec<bool> {
    let mut cut = vec![false; ctx.units.len()];
    for s in ctx.orders.legal_supports() {
        let supporter = &ctx.units[s.unit];
        let cutter = ctx.entrants(s.province).iter().copied().find(|&attacker| {
            let Some(m) = ctx.orders.moves[attacker] else {
                return false;
            };
            if ctx.units[attacker].country == supporter.country {
                return false;
            }
            s.is_hold() || m.from != s.target
        });
        if let Some(attacker) = cutter {
            trace!(supporter = %supporter.id, by = %ctx.units[attacker].id, "support cut");
            cut[s.unit] = true;
        }
    }
    cut
}
