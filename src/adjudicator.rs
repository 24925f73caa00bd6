//! Adjudicator handle.
//!
//! Holds the immutable map graph and the configuration so callers can resolve
//! any number of phases, from any number of threads, without reloading the
//! map. Nothing is retained between calls.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use crate::board::{MapGraph, RawOrder, Unit};
use crate::config::{AdjudicatorConfig, ConfigError};
use crate::resolve::{self, AdjudicationResult, DislodgedUnit, RetreatOrder, RetreatOutcome};

/// One independent movement phase: the board and the orders submitted for it.
#[derive(Debug, Clone, Default)]
pub struct Phase {
    pub units: Vec<Unit>,
    pub orders: Vec<RawOrder>,
}

#[derive(Debug, Clone)]
pub struct Adjudicator {
    graph: Arc<MapGraph>,
    config: AdjudicatorConfig,
}

impl Adjudicator {
    pub fn new(graph: Arc<MapGraph>, config: AdjudicatorConfig) -> Self {
        Adjudicator { graph, config }
    }

    /// Loads the map named by the config, or the standard map.
    pub fn from_config(config: AdjudicatorConfig) -> Result<Self, ConfigError> {
        let graph = config.load_map()?;
        info!(
            territories = graph.len(),
            map = ?config.map_path,
            rules = ?config.rules,
            reresolution = ?config.reresolution,
            "adjudicator ready"
        );
        Ok(Adjudicator::new(Arc::new(graph), config))
    }

    /// Standard map, default configuration.
    pub fn standard() -> Result<Self, ConfigError> {
        Adjudicator::from_config(AdjudicatorConfig::default())
    }

    pub fn graph(&self) -> &Arc<MapGraph> {
        &self.graph
    }

    pub fn config(&self) -> &AdjudicatorConfig {
        &self.config
    }

    pub fn adjudicate(&self, units: &[Unit], orders: &[RawOrder]) -> AdjudicationResult {
        resolve::adjudicate(&self.graph, units, orders, &self.config)
    }

    /// Adjudicates independent phases in parallel; results keep input order.
    pub fn adjudicate_many(&self, phases: &[Phase]) -> Vec<AdjudicationResult> {
        phases
            .par_iter()
            .map(|p| self.adjudicate(&p.units, &p.orders))
            .collect()
    }

    pub fn resolve_retreats(
        &self,
        board: &[Unit],
        dislodged: &[DislodgedUnit],
        orders: &[RetreatOrder],
    ) -> RetreatOutcome {
        resolve::resolve_retreats(board, dislodged, orders)
    }
}
