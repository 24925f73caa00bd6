//! Movement-phase adjudication.
//!
//! Runs the full pipeline for one phase and assembles the result handed back
//! to the orchestrator. The function is pure: the same board and orders
//! always give the same result.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::board::{MapGraph, OrderKind, ProvinceId, RawOrder, Unit};
use crate::config::AdjudicatorConfig;
use crate::movegen::{valid_retreats, RetreatExclusions};

use super::combat::{resolve_combat, Resolution};
use super::convoy::disrupt_convoys;
use super::guard::{ignore_dislodged_supporters, prevent_self_dislodgement};
use super::legality;
use super::normalize::{normalize, NormalizedOrders};
use super::support::cut_supports;
use super::vacate::fill_vacated;
use super::Context;

/// Per-order outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Succeeded,
    Bounced,
    Cut,
    Void,
    Dislodged,
}

/// Outcome of one live unit's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub unit_id: String,
    /// The order as resolved; inert orders report as `hold`.
    pub order: OrderKind,
    pub outcome: Outcome,
}

/// A unit forced out of its province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DislodgedUnit {
    pub unit: Unit,
    pub from_territory: ProvinceId,
    /// Base province the dislodging attack came from.
    pub attacker_territory: ProvinceId,
    pub valid_retreats: Vec<ProvinceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjudicationResult {
    /// Every input unit, in input order, repositioned where its move succeeded.
    pub new_units: Vec<Unit>,
    pub dislodged_units: Vec<DislodgedUnit>,
    #[serde(default)]
    pub order_results: Vec<OrderReport>,
}

/// Adjudicates one movement phase.
pub fn adjudicate(
    graph: &MapGraph,
    units: &[Unit],
    orders: &[RawOrder],
    config: &AdjudicatorConfig,
) -> AdjudicationResult {
    let span = debug_span!("adjudicate", units = units.len(), orders = orders.len());
    let _enter = span.enter();

    let normalized = normalize(graph, units, orders);
    let legal = legality::filter(graph, &normalized, config.rules);
    let ctx = Context::new(graph, &normalized.units, &legal);

    let cut = cut_supports(&ctx);
    let (mut res, rounds) = reresolve(&ctx, &cut, config);
    debug!(rounds, policy = ?config.reresolution, rules = ?config.rules, "re-resolution done");

    let promoted = fill_vacated(&ctx, &mut res);
    debug!(promoted, "vacate-fill done");

    build_result(&ctx, units, &normalized, &res, &cut)
}

/// Runs the first round, then corrective rounds while supports from
/// dislodged units keep being dropped, up to the configured limit. Returns
/// the last round's resolution and the number of corrective rounds run.
fn reresolve(ctx: &Context<'_>, cut: &[bool], config: &AdjudicatorConfig) -> (Resolution, usize) {
    let mut ignored = cut.to_vec();
    let mut res = run_round(ctx, &ignored);

    let limit = config.round_limit(ctx.units.len());
    let mut rounds = 0;
    while rounds < limit {
        let dislodged = res.dislodged(ctx);
        if ignore_dislodged_supporters(ctx, &dislodged, &mut ignored) == 0 {
            break;
        }
        res = run_round(ctx, &ignored);
        rounds += 1;
    }
    (res, rounds)
}

/// One full round: combat, convoy disruption, then the self-dislodge guard.
fn run_round(ctx: &Context<'_>, ignored: &[bool]) -> Resolution {
    let mut res = resolve_combat(ctx, ignored);
    let dislodged = res.dislodged(ctx);
    let disrupted = disrupt_convoys(ctx, &mut res.succeeded, &dislodged);
    let revoked = prevent_self_dislodgement(ctx, &mut res);
    debug!(
        succeeded = res.succeeded.iter().filter(|s| **s).count(),
        disrupted,
        revoked,
        "combat round"
    );
    res
}

fn build_result(
    ctx: &Context<'_>,
    units: &[Unit],
    normalized: &NormalizedOrders<'_>,
    res: &Resolution,
    cut: &[bool],
) -> AdjudicationResult {
    let graph = ctx.graph;
    let dislodged = res.dislodged(ctx);

    let mut new_units: Vec<Unit> = units.to_vec();
    // Units outside resolution were not dislodged this phase.
    for &i in &normalized.passthrough {
        new_units[i].dislodged = false;
    }
    let mut occupied = vec![false; graph.len()];
    for (i, live) in ctx.units.iter().enumerate() {
        let unit = &mut new_units[live.input];
        unit.dislodged = dislodged[i].is_some();
        match ctx.orders.moves[i] {
            Some(m) if res.succeeded[i] => {
                unit.territory = graph.id(m.landing).to_string();
                occupied[m.dest.index()] = true;
            }
            _ if unit.dislodged => {}
            _ => occupied[live.province.index()] = true,
        }
    }

    let mut dislodged_units = Vec::new();
    for (i, attacker) in dislodged.iter().enumerate() {
        let Some(attacker) = *attacker else { continue };
        let live = &ctx.units[i];
        let attacker_origin = ctx.units[attacker].province;
        let exclusions = RetreatExclusions {
            attacker_origin,
            standoffs: &res.standoffs,
            occupied: &occupied,
        };
        let retreats = valid_retreats(graph, live.unit_type, live.location, &exclusions);
        dislodged_units.push(DislodgedUnit {
            unit: new_units[live.input].clone(),
            from_territory: graph.id(live.location).clone(),
            attacker_territory: graph.id(attacker_origin).clone(),
            valid_retreats: retreats.iter().map(|&t| graph.id(t).clone()).collect(),
        });
    }

    let order_results = ctx
        .units
        .iter()
        .enumerate()
        .map(|(i, live)| OrderReport {
            unit_id: live.id.to_string(),
            order: normalized.actions[i].kind(),
            outcome: outcome(ctx, res, cut, &dislodged, i),
        })
        .collect();

    debug!(dislodged = dislodged_units.len(), "adjudicated");

    AdjudicationResult {
        new_units,
        dislodged_units,
        order_results,
    }
}

fn outcome(
    ctx: &Context<'_>,
    res: &Resolution,
    cut: &[bool],
    dislodged: &[Option<usize>],
    unit: usize,
) -> Outcome {
    if dislodged[unit].is_some() {
        Outcome::Dislodged
    } else if ctx.orders.void[unit] {
        Outcome::Void
    } else if ctx.orders.moves[unit].is_some() {
        if res.succeeded[unit] {
            Outcome::Succeeded
        } else {
            Outcome::Bounced
        }
    } else if cut[unit] {
        Outcome::Cut
    } else {
        Outcome::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Reresolution;

    fn run(units: &[Unit], orders: &[RawOrder]) -> AdjudicationResult {
        let g = MapGraph::standard().unwrap();
        adjudicate(&g, units, orders, &AdjudicatorConfig::default())
    }

    #[test]
    fn new_units_keep_input_order_and_count() {
        let units = vec![
            Unit::army("a", "france", "PAR"),
            Unit::army("x", "france", "ATLANTIS"),
            Unit::navy("f", "france", "BRE"),
        ];
        let result = run(&units, &[RawOrder::move_to("a", "PIC")]);
        let ids: Vec<&str> = result.new_units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "x", "f"]);
        assert_eq!(result.new_units[0].territory, "PIC");
        assert_eq!(result.new_units[1], units[1]);
        assert_eq!(result.order_results.len(), 2);
    }

    #[test]
    fn units_left_out_of_resolution_are_not_dislodged() {
        let stale = Unit {
            dislodged: true,
            ..Unit::army("x", "france", "ATLANTIS")
        };
        let duplicate = Unit {
            dislodged: true,
            ..Unit::army("a", "germany", "BUR")
        };
        let units = vec![Unit::army("a", "france", "PAR"), stale, duplicate];
        let result = run(&units, &[]);
        assert!(result.new_units.iter().all(|u| !u.dislodged));
        assert_eq!(result.new_units[1].territory, "ATLANTIS");
        assert_eq!(result.new_units[2].territory, "BUR");
        assert!(result.dislodged_units.is_empty());
    }

    #[test]
    fn fleet_lands_on_named_coast() {
        let units = vec![Unit::navy("f", "france", "MAO")];
        let result = run(&units, &[RawOrder::move_to("f", "SPA/nc")]);
        assert_eq!(result.new_units[0].territory, "SPA/nc");
    }

    #[test]
    fn order_outcomes_are_reported() {
        let units = vec![
            Unit::army("ser", "austria", "SER"),
            Unit::army("bud", "austria", "BUD"),
            Unit::army("bul", "turkey", "BUL"),
            Unit::navy("tri", "austria", "TRI"),
            Unit::army("vie", "austria", "VIE"),
        ];
        let orders = vec![
            RawOrder::support_move("ser", "BUD", "RUM"),
            RawOrder::move_to("bud", "RUM"),
            RawOrder::move_to("bul", "SER"),
            RawOrder::move_to("tri", "BUD"),
            // No convoy: accepted, then fails when the convoy is checked.
            RawOrder::move_to("vie", "WAR"),
        ];
        let result = run(&units, &orders);
        let outcomes: Vec<Outcome> = result.order_results.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                Outcome::Cut,
                Outcome::Succeeded,
                Outcome::Bounced,
                Outcome::Void,
                Outcome::Bounced
            ]
        );
        assert_eq!(result.new_units[4].territory, "VIE");
    }

    #[test]
    fn dislodged_unit_carries_retreats() {
        let units = vec![
            Unit::army("bur", "france", "BUR"),
            Unit::army("gas", "france", "GAS"),
            Unit::army("par", "germany", "PAR"),
        ];
        let orders = vec![
            RawOrder::move_to("bur", "PAR"),
            RawOrder::support_move("gas", "BUR", "PAR"),
        ];
        let result = run(&units, &orders);
        assert_eq!(result.dislodged_units.len(), 1);
        let d = &result.dislodged_units[0];
        assert_eq!(d.unit.id, "par");
        assert!(d.unit.dislodged);
        assert_eq!(d.from_territory.to_string(), "PAR");
        assert_eq!(d.attacker_territory.to_string(), "BUR");
        let retreats: Vec<String> = d.valid_retreats.iter().map(|p| p.to_string()).collect();
        assert_eq!(retreats, vec!["BRE", "PIC"]);
        assert_eq!(result.order_results[2].outcome, Outcome::Dislodged);
    }

    #[test]
    fn result_serializes_in_camel_case() {
        let units = vec![Unit::army("a", "france", "PAR")];
        let json = serde_json::to_value(run(&units, &[])).unwrap();
        assert!(json.get("newUnits").is_some());
        assert!(json.get("dislodgedUnits").is_some());
        assert_eq!(json["orderResults"][0]["unitId"], "a");
        assert_eq!(json["orderResults"][0]["outcome"], "succeeded");
    }

    fn corrective_rounds(reresolution: Reresolution, units: &[Unit], orders: &[RawOrder]) -> usize {
        let g = MapGraph::standard().unwrap();
        let config = AdjudicatorConfig {
            reresolution,
            ..AdjudicatorConfig::default()
        };
        let normalized = normalize(&g, units, orders);
        let legal = legality::filter(&g, &normalized, config.rules);
        let ctx = Context::new(&g, &normalized.units, &legal);
        let cut = cut_supports(&ctx);
        reresolve(&ctx, &cut, &config).1
    }

    #[test]
    fn fixed_point_settles_after_supports_stop_dropping() {
        // Rumania attacks from the province Budapest supports into, so the
        // support is not cut; only a corrective round drops it.
        let units = vec![
            Unit::army("ser", "austria", "SER"),
            Unit::army("bud", "austria", "BUD"),
            Unit::army("rum", "russia", "RUM"),
            Unit::army("gal", "russia", "GAL"),
        ];
        let orders = vec![
            RawOrder::move_to("ser", "RUM"),
            RawOrder::support_move("bud", "SER", "RUM"),
            RawOrder::move_to("rum", "BUD"),
            RawOrder::support_move("gal", "RUM", "BUD"),
        ];
        assert_eq!(corrective_rounds(Reresolution::SinglePass, &units, &orders), 1);
        assert_eq!(corrective_rounds(Reresolution::FixedPoint, &units, &orders), 1);

        let result = run(&units, &orders);
        assert_eq!(result.new_units[2].territory, "BUD");
        assert!(result.new_units[1].dislodged);
        // Serbia follows into the province Rumania left.
        assert_eq!(result.new_units[0].territory, "RUM");

        assert_eq!(corrective_rounds(Reresolution::FixedPoint, &units, &[]), 0);
    }
}
