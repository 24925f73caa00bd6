//! Attack and hold strength.

use crate::config::Ruleset;

use super::legality::MoveIntent;
use super::Context;

/// `1 + |counted supports for this exact move|`.
///
/// `ignored[unit]` marks supports that do not count (cut, or given by a
/// dislodged unit).
pub fn attack_strength(ctx: &Context<'_>, ignored: &[bool], m: &MoveIntent) -> u32 {
    let supports = ctx
        .orders
        .legal_supports()
        .filter(|s| !ignored[s.unit] && !s.is_hold() && s.origin == m.from && s.target == m.dest)
        .count();
    1 + supports as u32
}

/// `1 + |counted supports-to-hold on the unit's province|`.
///
/// Under DATC rules support-to-hold only helps a unit that is not itself
/// trying to move.
pub fn hold_strength(ctx: &Context<'_>, ignored: &[bool], unit: usize) -> u32 {
    if ctx.rules() == Ruleset::Datc && ctx.orders.moves[unit].is_some() {
        return 1;
    }
    let province = ctx.units[unit].province;
    let supports = ctx
        .orders
        .legal_supports()
        .filter(|s| !ignored[s.unit] && s.is_hold() && s.target == province)
        .count();
    1 + supports as u32
}

/// Attack strength of every live unit's move, 0 for units not moving.
pub fn attack_table(ctx: &Context<'_>, ignored: &[bool]) -> Vec<u32> {
    ctx.orders
        .moves
        .iter()
        .map(|m| m.as_ref().map_or(0, |m| attack_strength(ctx, ignored, m)))
        .collect()
}
