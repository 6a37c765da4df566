//! Shared model inputs and the dispatching trait.

use rustc_hash::FxHashMap;

use forest_core::{NodeId, Preferences};
use forest_graph::RoadGraph;

use crate::error::{ModelError, ModelResult};
use crate::flooding::FloodingModel;
use crate::via_edge::ViaEdgeModel;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Everything both models consume.  Immutable after construction; shared by
/// reference across rayon workers.
pub struct ModelInputs<'g> {
    pub graph: &'g RoadGraph,
    /// Forest entry nodes, ascending.  Duplicates (several map features on
    /// one node) are kept and contribute twice.
    pub entries: Vec<NodeId>,
    /// Population per entry node.  Duplicate entries: last writer wins.
    pub populations: FxHashMap<NodeId, f32>,
    /// Duration-tolerance profile, bounds in seconds.
    pub preferences: Preferences,
    /// Maximum tolerated round-trip duration in seconds; bounds every search.
    pub max_cost: i32,
}

impl<'g> ModelInputs<'g> {
    pub fn new(
        graph: &'g RoadGraph,
        entries: &[NodeId],
        populations: &[f32],
        preferences: Preferences,
        max_cost: i32,
    ) -> ModelResult<Self> {
        if entries.len() != populations.len() {
            return Err(ModelError::EntryPopulationMismatch {
                entries: entries.len(),
                populations: populations.len(),
            });
        }
        let population_map: FxHashMap<NodeId, f32> =
            entries.iter().copied().zip(populations.iter().copied()).collect();
        let mut entries = entries.to_vec();
        entries.sort_unstable();
        Ok(Self {
            graph,
            entries,
            populations: population_map,
            preferences,
            max_cost,
        })
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// An attractiveness model producing one value per arc of the input graph.
pub trait AttractivenessModel {
    fn compute(&self) -> ModelResult<Vec<f32>>;
}

/// Model selector as it appears on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Approach {
    Flooding,
    ViaEdge,
}

impl TryFrom<i32> for Approach {
    type Error = ModelError;

    fn try_from(v: i32) -> ModelResult<Approach> {
        match v {
            0 => Ok(Approach::Flooding),
            1 => Ok(Approach::ViaEdge),
            other => Err(ModelError::UnknownApproach(other)),
        }
    }
}

/// Run the selected model over the inputs.
pub fn compute_attractiveness(approach: Approach, inputs: &ModelInputs<'_>) -> ModelResult<Vec<f32>> {
    match approach {
        Approach::Flooding => FloodingModel::new(inputs).compute(),
        Approach::ViaEdge => ViaEdgeModel::new(inputs).compute(),
    }
}
