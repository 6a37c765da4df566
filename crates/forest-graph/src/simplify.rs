//! Degree-2 chain contraction.
//!
//! Long forest tracks digitise into chains of degree-2 nodes; every bounded
//! search pays for each tiny segment.  The simplifier contracts such chains
//! into single shortcut arcs carrying the summed cost and the maximum scenic
//! weight, and records which original edges each shortcut stands for, so
//! per-arc results can later be unpacked back onto the original edge ids.
//!
//! The input must be bidirectional and every arc must carry a valid
//! provenance id.  Contracted nodes' arcs are left in place but never
//! traversed again; the extraction step drops them and reindexes the
//! surviving nodes densely.

use rustc_hash::{FxHashMap, FxHashSet};

use forest_core::{Fid, GeoPos, NodeId};
use log::info;

use crate::graph::{Arc, RoadGraph};

/// Result of a simplification pass.
pub struct SimplifiedGraph {
    /// The contracted graph, densely reindexed.
    pub graph: RoadGraph,
    /// For each **old** node index, the number of contracted nodes at or
    /// before it: `new_index = old_index - index_shift[old_index]` for every
    /// surviving node.
    pub index_shift: Vec<u32>,
    /// `fid -> original fids` for every surviving arc.  Untouched arcs map
    /// to the singleton of their own id; shortcuts map to the ordered
    /// concatenation of the chain they replace.
    pub provenance: FxHashMap<Fid, Vec<Fid>>,
}

impl SimplifiedGraph {
    /// Shifted position of an entity that referenced an old node index.
    /// Only meaningful for nodes that were not contracted (protected
    /// entries always survive).
    pub fn shift_node(&self, old: NodeId) -> NodeId {
        NodeId(old.0 - self.index_shift[old.index()])
    }
}

/// Contract every unprotected node whose non-contracted neighbourhood is a
/// plain through-route (exactly two distinct neighbours).
///
/// # Panics
/// Panics when an arc carries no provenance id, or when a chain arc lacks
/// its reverse (the input is not bidirectional).
pub fn simplify(input: &RoadGraph, protect: &FxHashSet<NodeId>) -> SimplifiedGraph {
    assert!(
        input.arcs().iter().all(|a| a.fid != Fid::INVALID),
        "simplification requires a provenance id on every arc"
    );

    let mut pass = Simplifier::new(input);
    for node in (0..input.num_nodes()).map(|i| NodeId(i as u32)) {
        if protect.contains(&node) {
            continue;
        }
        pass.contracted[node.index()] = pass.try_contract(node);
    }
    let result = pass.extract();
    info!(
        "simplified graph: {} of {} nodes remain, {} arcs",
        result.graph.num_nodes(),
        input.num_nodes(),
        result.graph.num_arcs()
    );
    result
}

// ── Internals ─────────────────────────────────────────────────────────────────

struct Simplifier {
    /// Arcs grouped per source node.  Grows as shortcuts are added.
    adj: Vec<Vec<Arc>>,
    nodes: Vec<GeoPos>,
    contracted: Vec<bool>,
    /// Running arc count; doubles as the next fresh shortcut fid.
    arc_count: u32,
    provenance: FxHashMap<Fid, Vec<Fid>>,
}

impl Simplifier {
    fn new(input: &RoadGraph) -> Self {
        let mut adj: Vec<Vec<Arc>> = vec![Vec::new(); input.num_nodes()];
        let mut provenance = FxHashMap::default();
        for arc in input.arcs() {
            adj[arc.source.index()].push(*arc);
            provenance.insert(arc.fid, vec![arc.fid]);
        }
        Self {
            adj,
            nodes: input.nodes().to_vec(),
            contracted: vec![false; input.num_nodes()],
            arc_count: input.num_arcs() as u32,
            provenance,
        }
    }

    /// First arc `from -> to`, by value.
    fn find_arc(&self, from: NodeId, to: NodeId) -> Arc {
        match self.adj[from.index()].iter().find(|a| a.target == to) {
            Some(arc) => *arc,
            None => panic!("no arc between {from} and {to}; input graph is not bidirectional"),
        }
    }

    /// Contract `node` if its live neighbourhood is exactly two distinct
    /// nodes.  Adds both shortcut directions and subsumes the four incident
    /// arcs' provenance entries.
    fn try_contract(&mut self, node: NodeId) -> bool {
        let live: Vec<NodeId> = self.adj[node.index()]
            .iter()
            .filter(|a| !self.contracted[a.target.index()])
            .map(|a| a.target)
            .collect();
        if live.len() != 2 {
            return false;
        }
        // Two arcs to the same target: contracting would merge parallel
        // edges, so leave the node alone.
        if live[0] == live[1] {
            return false;
        }

        let mut subsumed = Vec::with_capacity(4);
        for (a_nb, b_nb) in [(live[0], live[1]), (live[1], live[0])] {
            //    a         b                 a+b
            // A --> node --> B    becomes  A --> B
            let a = self.find_arc(a_nb, node);
            let b = self.find_arc(node, b_nb);
            let shortcut_fid = Fid(self.arc_count);
            self.arc_count += 1;

            self.adj[a_nb.index()].push(Arc::new(
                a_nb,
                b_nb,
                a.cost + b.cost,
                a.weight.max(b.weight),
                shortcut_fid,
            ));

            let mut ids = self.provenance.get(&a.fid).cloned().unwrap_or_default();
            ids.extend(self.provenance.get(&b.fid).cloned().unwrap_or_default());
            self.provenance.insert(shortcut_fid, ids);
            subsumed.push(a.fid);
            subsumed.push(b.fid);
        }
        for fid in subsumed {
            self.provenance.remove(&fid);
        }
        true
    }

    /// Build the densely reindexed output graph from the uncontracted part.
    fn extract(self) -> SimplifiedGraph {
        let n = self.adj.len();
        let mut index_shift = vec![0u32; n];
        let mut running = 0u32;
        for i in 0..n {
            running += self.contracted[i] as u32;
            index_shift[i] = running;
        }

        let mut nodes = Vec::with_capacity(n - running as usize);
        let mut arcs = Vec::new();
        for i in 0..n {
            if self.contracted[i] {
                continue;
            }
            nodes.push(self.nodes[i]);
            for arc in &self.adj[i] {
                if self.contracted[arc.target.index()] {
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

        let graph = match RoadGraph::from_rows(nodes, arcs) {
            Ok(g) => g,
            Err(_) => unreachable!("extracted arcs are reindexed within range"),
        };
        SimplifiedGraph { graph, index_shift, provenance: self.provenance }
    }
}
