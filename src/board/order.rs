//! Order types for the movement phase.
//!
//! `RawOrder` is the loosely-typed wire form submitted by players. `Action`
//! is the closed sum type the resolver works with; converting one into the
//! other resolves every province reference against the graph, so an `Action`
//! can never carry a field combination that does not make sense.

use serde::{Deserialize, Serialize};

use super::graph::{MapGraph, TerritoryIdx};
use super::unit::UnitType;

/// The action tag of a wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Hold,
    Move,
    Support,
    Convoy,
    #[serde(other)]
    Unknown,
}

/// A player-submitted order in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOrder {
    pub unit_id: String,
    pub action: OrderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Origin of the supported unit; equal to `target` for support-to-hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_of_support: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convoy_destination: Option<String>,
}

impl RawOrder {
    pub fn hold(unit_id: impl Into<String>) -> Self {
        RawOrder {
            unit_id: unit_id.into(),
            action: OrderKind::Hold,
            target: None,
            target_of_support: None,
            convoy_destination: None,
        }
    }

    pub fn move_to(unit_id: impl Into<String>, target: impl Into<String>) -> Self {
        RawOrder {
            action: OrderKind::Move,
            target: Some(target.into()),
            ..RawOrder::hold(unit_id)
        }
    }

    /// Support for the unit at `supported` moving into `target`.
    pub fn support_move(
        unit_id: impl Into<String>,
        supported: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        RawOrder {
            action: OrderKind::Support,
            target: Some(target.into()),
            target_of_support: Some(supported.into()),
            ..RawOrder::hold(unit_id)
        }
    }

    pub fn support_hold(unit_id: impl Into<String>, supported: impl Into<String>) -> Self {
        let supported = supported.into();
        RawOrder {
            action: OrderKind::Support,
            target: Some(supported.clone()),
            target_of_support: Some(supported),
            ..RawOrder::hold(unit_id)
        }
    }

    pub fn convoy(
        unit_id: impl Into<String>,
        army_origin: impl Into<String>,
        destination: Option<&str>,
    ) -> Self {
        RawOrder {
            action: OrderKind::Convoy,
            target: Some(army_origin.into()),
            convoy_destination: destination.map(str::to_string),
            ..RawOrder::hold(unit_id)
        }
    }
}

/// A resolved order action.
///
/// Move targets are exact territories (a fleet may name a coast); support and
/// convoy references are base provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Hold,
    Move {
        target: TerritoryIdx,
    },
    Support {
        supported_origin: TerritoryIdx,
        supported_target: TerritoryIdx,
    },
    Convoy {
        army_origin: TerritoryIdx,
        destination: Option<TerritoryIdx>,
    },
}

impl Action {
    /// Resolves a wire order against the graph.
    ///
    /// Returns `None` when the order is inert: an unknown action, or a
    /// missing or unresolvable required province. An army's move target is
    /// reduced to its base province since armies never stand on a coast.
    pub fn from_raw(raw: &RawOrder, unit_type: UnitType, graph: &MapGraph) -> Option<Action> {
        let base = |s: &Option<String>| {
            s.as_deref()
                .and_then(|s| graph.lookup_str(s))
                .map(|t| graph.base_of(t))
        };

        match raw.action {
            OrderKind::Hold => Some(Action::Hold),
            OrderKind::Move => {
                let target = graph.lookup_str(raw.target.as_deref()?)?;
                let target = match unit_type {
                    UnitType::Army => graph.base_of(target),
                    UnitType::Navy => target,
                };
                Some(Action::Move { target })
            }
            OrderKind::Support => {
                let supported_target = base(&raw.target)?;
                let supported_origin = match raw.target_of_support {
                    Some(_) => base(&raw.target_of_support)?,
                    None => supported_target,
                };
                Some(Action::Support {
                    supported_origin,
                    supported_target,
                })
            }
            OrderKind::Convoy => {
                let army_origin = base(&raw.target)?;
                let destination = match raw.convoy_destination {
                    Some(_) => Some(base(&raw.convoy_destination)?),
                    None => None,
                };
                Some(Action::Convoy {
                    army_origin,
                    destination,
                })
            }
            OrderKind::Unknown => None,
        }
    }

    pub fn kind(&self) -> OrderKind {
        match self {
            Action::Hold => OrderKind::Hold,
            Action::Move { .. } => OrderKind::Move,
            Action::Support { .. } => OrderKind::Support,
            Action::Convoy { .. } => OrderKind::Convoy,
        }
    }
}
