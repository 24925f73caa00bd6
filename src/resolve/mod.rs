//! Order resolution.
//!
//! Resolves one movement phase as a straight pipeline of stages:
//! normalization, legality, support cutting, then rounds of
//! strength/combat/convoy/guard, vacate-fill, and finally position
//! application with retreat enumeration. Retreat-phase orders are resolved
//! separately in [`retreat`].

pub mod combat;
pub mod convoy;
pub mod guard;
pub mod legality;
pub mod movement;
pub mod normalize;
pub mod retreat;
pub mod strength;
pub mod support;
pub mod vacate;

pub use movement::{adjudicate, AdjudicationResult, DislodgedUnit, OrderReport, Outcome};
pub use normalize::clean_unit_id;
pub use retreat::{resolve_retreats, RetreatOrder, RetreatOutcome};

use crate::board::{MapGraph, TerritoryIdx};
use crate::config::Ruleset;

use legality::LegalOrders;
use normalize::LiveUnit;

/// Read-only lookup tables shared by the resolution stages.
pub struct Context<'a> {
    pub graph: &'a MapGraph,
    pub units: &'a [LiveUnit<'a>],
    pub orders: &'a LegalOrders,
    /// Live unit standing in each base province, indexed by territory.
    occupant: Vec<Option<usize>>,
    /// Units with a legal move into each base province, indexed by territory.
    entrants: Vec<Vec<usize>>,
}

impl<'a> Context<'a> {
    pub fn new(graph: &'a MapGraph, units: &'a [LiveUnit<'a>], orders: &'a LegalOrders) -> Self {
        let mut occupant = vec![None; graph.len()];
        for (i, u) in units.iter().enumerate() {
            occupant[u.province.index()].get_or_insert(i);
        }
        let mut entrants = vec![Vec::new(); graph.len()];
        for m in orders.legal_moves() {
            entrants[m.dest.index()].push(m.unit);
        }
        Context {
            graph,
            units,
            orders,
            occupant,
            entrants,
        }
    }

    #[inline]
    pub fn rules(&self) -> Ruleset {
        self.orders.rules
    }

    /// The live unit in `province` (compared by base) before movement.
    #[inline]
    pub fn occupant(&self, province: TerritoryIdx) -> Option<usize> {
        self.occupant[self.graph.base_of(province).index()]
    }

    /// Units with a legal move whose destination base is `province`.
    #[inline]
    pub fn entrants(&self, province: TerritoryIdx) -> &[usize] {
        &self.entrants[self.graph.base_of(province).index()]
    }

    /// Base provinces that have at least one entrant, in index order.
    pub fn contested(&self) -> impl Iterator<Item = TerritoryIdx> + '_ {
        self.graph
            .territories()
            .filter(move |(i, _)| !self.entrants[i.index()].is_empty())
            .map(|(i, _)| i)
    }
}
