//! Shared driver plumbing for the two command-line tools.

use rustc_hash::FxHashMap;

use forest_core::Fid;
use forest_graph::RoadGraph;

#[cfg(test)]
mod tests;

/// Unpack per-arc values of a simplified graph back onto original edge ids.
///
/// Every arc writes its value to each original fid it stands for (shortcuts
/// cover their whole chain; untouched arcs cover themselves).  The output
/// is indexed by fid — both directions of an undirected edge share one slot.
pub fn unpack_to_original(
    values: &[f32],
    graph: &RoadGraph,
    provenance: &FxHashMap<Fid, Vec<Fid>>,
) -> Vec<f32> {
    let mut max_fid: Option<u32> = None;
    let mut track = |fid: Fid| {
        max_fid = Some(max_fid.map_or(fid.0, |m| m.max(fid.0)));
    };
    for arc in graph.arcs() {
        match provenance.get(&arc.fid) {
            Some(ids) => ids.iter().copied().for_each(&mut track),
            None => track(arc.fid),
        }
    }

    let mut out = vec![0.0f32; max_fid.map_or(0, |m| m as usize + 1)];
    for (arc, &value) in graph.arcs().iter().zip(values) {
        match provenance.get(&arc.fid) {
            Some(ids) => {
                for id in ids {
                    out[id.index()] = value;
                }
            }
            None => out[arc.fid.index()] = value,
        }
    }
    out
}
