//! The Via-Edge model.
//!
//! For every unordered forest edge `{s, t}` the model asks: which
//! entry-to-entry trips would route *through* this edge?  Two bounded
//! searches (from `s` with `t` blocked, from `t` with `s` blocked) give the
//! approach costs on either side; every settled entry pair `(e1, e2)` whose
//! total `cost(e1→s) + c + cost(t→e2)` fits the tolerated maximum adds
//!
//! ```text
//! w · tailShare(C) · dist(e1, e2) / (C + 60)     (round trips: see below)
//! ```
//!
//! to `e1`'s row of the contribution tensor.  Trips returning to their own
//! entry (`e1 == e2`) are discounted by the far-side cost instead of the
//! pairwise distance.
//!
//! # Parallelism
//!
//! The per-edge work is embarrassingly parallel: the graph, the entry list,
//! and the pairwise distance table are immutable after setup, and each
//! worker owns two Dijkstra engines plus a private contribution shard.
//! Shards are merged in chunk order, so results are bit-identical across
//! runs and thread counts.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use forest_core::{ArcId, NodeId, Progress};
use forest_graph::Dijkstra;
use log::info;

use crate::contribution::Contribution;
use crate::error::ModelResult;
use crate::model::{AttractivenessModel, ModelInputs};

/// Unordered edges handed to one worker at a time.
const EDGE_CHUNK: usize = 512;

/// Entries per worker in the distance-table setup.
const ENTRY_CHUNK: usize = 64;

/// Pairwise entry distances, keyed `(min, max)` — distances are symmetric
/// on the bidirectional graphs this model requires.
type DistanceTable = FxHashMap<(u32, u32), i32>;

pub struct ViaEdgeModel<'m, 'g> {
    inputs: &'m ModelInputs<'g>,
}

impl<'m, 'g> ViaEdgeModel<'m, 'g> {
    pub fn new(inputs: &'m ModelInputs<'g>) -> Self {
        Self { inputs }
    }
}

impl AttractivenessModel for ViaEdgeModel<'_, '_> {
    fn compute(&self) -> ModelResult<Vec<f32>> {
        let inp = self.inputs;
        let graph = inp.graph;
        let counterpart = graph.counterpart_map()?;
        let distances = entry_distances(inp);
        info!(
            "via-edge model: {} entries, {} arcs, max cost {}",
            inp.entries.len(),
            graph.num_arcs(),
            inp.max_cost
        );

        // One representative per unordered edge; its counterpart is handled
        // in the same step with the roles of the two searches swapped.
        let representatives: Vec<ArcId> = (0..graph.num_arcs() as u32)
            .map(ArcId)
            .filter(|&id| {
                let arc = graph.arc(id);
                arc.source != arc.target && id.index() <= counterpart[id.index()].index()
            })
            .collect();

        let progress = Progress::new("via-edge", representatives.len());
        let shards: Vec<Contribution> = representatives
            .par_chunks(EDGE_CHUNK)
            .map(|chunk| {
                let mut worker = Worker::new(inp, &distances);
                for &arc_id in chunk {
                    worker.process_edge(arc_id, counterpart[arc_id.index()]);
                    progress.tick();
                }
                worker.contribution
            })
            .collect();
        progress.finish();

        let mut contribution = Contribution::new();
        for shard in shards {
            contribution.merge(shard);
        }
        contribution.normalise();
        Ok(contribution.distribute(&inp.populations, graph.num_arcs()))
    }
}

// ── Distance table setup ──────────────────────────────────────────────────────

/// One bounded search per entry collects the distances to every other entry
/// reachable within the maximum duration.
fn entry_distances(inp: &ModelInputs<'_>) -> DistanceTable {
    let chunks: Vec<Vec<((u32, u32), i32)>> = inp
        .entries
        .par_chunks(ENTRY_CHUNK)
        .map(|chunk| {
            let mut dijkstra = Dijkstra::new(inp.graph);
            dijkstra.set_cost_limit(inp.max_cost);
            let mut local = Vec::new();
            for &e1 in chunk {
                dijkstra.run(e1, None);
                for &e2 in &inp.entries {
                    if e2 >= e1 && dijkstra.is_settled(e2) {
                        local.push(((e1.0, e2.0), dijkstra.cost(e2)));
                    }
                }
            }
            local
        })
        .collect();

    let mut table = DistanceTable::default();
    for chunk in chunks {
        table.extend(chunk);
    }
    table
}

fn distance(table: &DistanceTable, e1: NodeId, e2: NodeId) -> i32 {
    let key = if e1 <= e2 { (e1.0, e2.0) } else { (e2.0, e1.0) };
    match table.get(&key) {
        Some(&d) => d,
        // Both entries were settled within the edge budget, so the direct
        // distance search must have reached them too.
        None => panic!("no pairwise distance for entries {e1} and {e2}"),
    }
}

// ── Per-edge worker ───────────────────────────────────────────────────────────

struct Worker<'m, 'g> {
    inputs: &'m ModelInputs<'g>,
    distances: &'m DistanceTable,
    /// Search rooted at the edge's source, with the target blocked.
    bwd: Dijkstra<'g>,
    /// Search rooted at the edge's target, with the source blocked.
    fwd: Dijkstra<'g>,
    contribution: Contribution,
}

impl<'m, 'g> Worker<'m, 'g> {
    fn new(inputs: &'m ModelInputs<'g>, distances: &'m DistanceTable) -> Self {
        Self {
            inputs,
            distances,
            bwd: Dijkstra::new(inputs.graph),
            fwd: Dijkstra::new(inputs.graph),
            contribution: Contribution::new(),
        }
    }

    /// Run both searches for the unordered edge `{s, t}` and credit the
    /// participating entries for the arc and its counterpart.
    fn process_edge(&mut self, arc_id: ArcId, counterpart_id: ArcId) {
        let graph = self.inputs.graph;
        let arc = *graph.arc(arc_id);
        let reverse = *graph.arc(counterpart_id);
        let (s, t) = (arc.source, arc.target);

        let limit = self.inputs.max_cost - arc.cost;
        self.bwd.set_cost_limit(limit);
        self.fwd.set_cost_limit(limit);
        self.bwd.ignore_node(t);
        self.fwd.ignore_node(s);
        self.bwd.run(s, None);
        self.fwd.run(t, None);

        // Routes e1 ->* s -> t ->* e2 ...
        evaluate(
            self.inputs,
            self.distances,
            arc_id,
            arc.cost,
            arc.weight,
            &self.bwd,
            &self.fwd,
            &mut self.contribution,
        );
        // ... and e1 ->* t -> s ->* e2 over the same two cost vectors.
        evaluate(
            self.inputs,
            self.distances,
            counterpart_id,
            reverse.cost,
            reverse.weight,
            &self.fwd,
            &self.bwd,
            &mut self.contribution,
        );

        self.bwd.unignore_node(t);
        self.fwd.unignore_node(s);
    }
}

/// Credit every settled entry pair routed through the arc.
#[allow(clippy::too_many_arguments)]
fn evaluate(
    inp: &ModelInputs<'_>,
    distances: &DistanceTable,
    arc_id: ArcId,
    arc_cost: i32,
    arc_weight: i32,
    near: &Dijkstra<'_>,
    far: &Dijkstra<'_>,
    out: &mut Contribution,
) {
    for &e1 in &inp.entries {
        if !near.is_settled(e1) {
            continue;
        }
        let near_cost = near.cost(e1);
        for &e2 in &inp.entries {
            if !far.is_settled(e2) {
                continue;
            }
            let far_cost = far.cost(e2);
            let total = near_cost + arc_cost + far_cost;
            if total > inp.max_cost {
                continue;
            }
            let share = inp.preferences.tail_share_at(total as f32);
            let gain = if e1 == e2 {
                // Round trip from one entry: discount by the way back.
                share / (far_cost as f32 + 60.0)
            } else {
                share * distance(distances, e1, e2) as f32 / (total as f32 + 60.0)
            };
            let credited = arc_weight as f32 * gain;
            if credited > 0.0 {
                out.add(e1, arc_id.0, credited);
            }
        }
    }
}
