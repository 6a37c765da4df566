//! The Flooding model.
//!
//! Each entry floods its half-trip radius: a bounded search with cost limit
//! `max_cost / 2` (out and back again), after which every settled node `v`
//! collects
//!
//! ```text
//! nodeWeight(v) · tailShare(2 · cost) / (cost + 60)
//! ```
//!
//! into the entry's contribution row.  Node weights are the maximum scenic
//! weight over all arcs touching the node.  After per-entry normalisation
//! the entry populations are distributed onto nodes, and each arc inherits
//! the attractiveness of its target node.

use forest_core::Progress;
use forest_graph::{Dijkstra, RoadGraph};
use log::info;

use crate::contribution::Contribution;
use crate::error::ModelResult;
use crate::model::{AttractivenessModel, ModelInputs};

pub struct FloodingModel<'m, 'g> {
    inputs: &'m ModelInputs<'g>,
}

impl<'m, 'g> FloodingModel<'m, 'g> {
    pub fn new(inputs: &'m ModelInputs<'g>) -> Self {
        Self { inputs }
    }
}

impl AttractivenessModel for FloodingModel<'_, '_> {
    fn compute(&self) -> ModelResult<Vec<f32>> {
        let inp = self.inputs;
        let graph = inp.graph;
        info!("flooding model: {} entries, max cost {}", inp.entries.len(), inp.max_cost);

        let weights = node_weights(graph);
        let mut contribution = Contribution::new();
        let mut dijkstra = Dijkstra::new(graph);
        dijkstra.set_cost_limit(inp.max_cost / 2); // half way forth and back

        let progress = Progress::new("flooding", inp.entries.len());
        for &entry in &inp.entries {
            dijkstra.run(entry, None);
            for &node in dijkstra.settled_nodes() {
                let cost = dijkstra.cost(node).max(1);
                let share = inp.preferences.tail_share_at(2.0 * cost as f32);
                let gain = weights[node.index()] as f32 * share / (cost as f32 + 60.0);
                if gain > 0.0 {
                    contribution.add(entry, node.0, gain);
                }
            }
            progress.tick();
        }
        progress.finish();

        contribution.normalise();
        let node_attractiveness = contribution.distribute(&inp.populations, graph.num_nodes());

        // Each arc inherits the attractiveness of its target node.
        Ok(graph
            .arcs()
            .iter()
            .map(|arc| node_attractiveness[arc.target.index()])
            .collect())
    }
}

/// Per-node scenic weight: the maximum over all arcs incident to the node,
/// at either endpoint.
fn node_weights(graph: &RoadGraph) -> Vec<i32> {
    let mut weights = vec![0i32; graph.num_nodes()];
    for arc in graph.arcs() {
        weights[arc.source.index()] = weights[arc.source.index()].max(arc.weight);
        weights[arc.target.index()] = weights[arc.target.index()].max(arc.weight);
    }
    weights
}
