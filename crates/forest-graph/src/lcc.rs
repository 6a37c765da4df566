//! Largest connected component and node-subset restriction.
//!
//! Map dumps regularly contain small disconnected fragments (dead-end
//! service tracks, digitisation artefacts).  Preprocessing reduces the
//! graph to its largest component before anything else runs; the BFS view
//! of connectivity assumes the graph is bidirectional.

use forest_core::NodeId;
use log::info;

use crate::graph::{Arc, RoadGraph};

/// Node ids of the largest connected component, in BFS discovery order.
pub fn largest_connected_component(graph: &RoadGraph) -> Vec<NodeId> {
    let n = graph.num_nodes();
    let mut seen = vec![false; n];
    let mut best: Vec<NodeId> = Vec::new();

    let mut source = 0usize;
    while source < n {
        let mut queue = vec![NodeId(source as u32)];
        seen[source] = true;
        let mut head = 0;
        while head < queue.len() {
            let node = queue[head];
            head += 1;
            for arc in graph.outgoing(node) {
                if !seen[arc.target.index()] {
                    seen[arc.target.index()] = true;
                    queue.push(arc.target);
                }
            }
        }
        if queue.len() > best.len() {
            best = queue;
        }
        while source < n && seen[source] {
            source += 1;
        }
    }
    best
}

/// Restrict `graph` to `keep`, dropping every other node and every arc with
/// a dropped endpoint.  Returns the reindexed graph and the index shift
/// (`new = old - shift[old]` for surviving nodes).
pub fn restrict_to_nodes(graph: &RoadGraph, keep: &[NodeId]) -> (RoadGraph, Vec<u32>) {
    let n = graph.num_nodes();
    let mut removed = vec![true; n];
    for &id in keep {
        removed[id.index()] = false;
    }
    let mut index_shift = vec![0u32; n];
    let mut running = 0u32;
    for i in 0..n {
        running += removed[i] as u32;
        index_shift[i] = running;
    }

    let mut nodes = Vec::with_capacity(keep.len());
    let mut arcs = Vec::new();
    for i in 0..n {
        if removed[i] {
            continue;
        }
        nodes.push(graph.nodes()[i]);
        for arc in graph.outgoing(NodeId(i as u32)) {
            if removed[arc.target.index()] {
                continue;
            }
            arcs.push(Arc::new(
                NodeId(arc.source.0 - index_shift[arc.source.index()]),
                NodeId(arc.target.0 - index_shift[arc.target.index()]),
                arc.cost,
                arc.weight,
                arc.fid,
            ));
        }
    }

    let restricted = match RoadGraph::from_rows(nodes, arcs) {
        Ok(g) => g,
        Err(_) => unreachable!("restricted arcs are reindexed within range"),
    };
    (restricted, index_shift)
}

/// Reduce the graph to its largest connected component.
pub fn reduce_to_lcc(graph: &RoadGraph) -> (RoadGraph, Vec<u32>) {
    let lcc = largest_connected_component(graph);
    let (reduced, shift) = restrict_to_nodes(graph, &lcc);
    info!(
        "largest component keeps {} of {} nodes",
        reduced.num_nodes(),
        graph.num_nodes()
    );
    (reduced, shift)
}
