//! Self-dislodge guard and the dislodged-supporter ignore set.

use tracing::{debug, trace};

use super::combat::Resolution;
use super::Context;

/// Revokes every move that would dislodge a unit of the mover's own
/// country, turning the destination into a standoff. Returns the number of
/// moves revoked.
///
/// Revoking a move can leave its unit behind in a province someone else
/// just entered, so the check repeats until no such dislodgement remains.
pub fn prevent_self_dislodgement(ctx: &Context<'_>, res: &mut Resolution) -> usize {
    let mut revoked = 0;
    loop {
        let dislodged = res.dislodged(ctx);
        let mut changed = false;
        for (defender, attacker) in dislodged.iter().enumerate() {
            let Some(attacker) = *attacker else { continue };
            if ctx.units[attacker].country != ctx.units[defender].country {
                continue;
            }
            trace!(attacker = %ctx.units[attacker].id, defender = %ctx.units[defender].id, "self-dislodgement revoked");
            res.succeeded[attacker] = false;
            res.mark_standoff(ctx, ctx.units[defender].province);
            revoked += 1;
            changed = true;
        }
        if !changed {
            break;
        }
    }
    if revoked > 0 {
        debug!(revoked, "self-dislodge guard");
    }
    revoked
}

/// Adds the supports of currently dislodged units to `ignored`. Returns how
/// many supports were newly ignored.
pub fn ignore_dislodged_supporters(
    ctx: &Context<'_>,
    dislodged: &[Option<usize>],
    ignored: &mut [bool],
) -> usize {
    let mut added = 0;
    for s in ctx.orders.legal_supports() {
        if dislodged[s.unit].is_some() && !ignored[s.unit] {
            trace!(supporter = %ctx.units[s.unit].id, "support from dislodged unit ignored");
            ignored[s.unit] = true;
            added += 1;
        }
    }
    added
}
