//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph stores its arcs in one contiguous list, stably sorted by
//! `(source, target)`.  A row-pointer vector gives each node's slice:
//!
//! ```text
//! arcs[ offsets[v] .. offsets[v+1] ]
//! ```
//!
//! Iteration over a node's outgoing arcs is therefore a contiguous memory
//! scan — ideal for Dijkstra's inner loop.  Positions in the arc list are
//! stable for the life of the graph and double as [`ArcId`]s.
//!
//! Multi-edges are allowed.  Most input graphs are bidirectional (every
//! `a → b` has a counterpart `b → a`); the type does not enforce this, and
//! algorithms that rely on it check via [`RoadGraph::counterpart_map`] or
//! [`RoadGraph::is_bidirectional`].

use forest_core::{ArcId, Fid, GeoPos, NodeId};

use crate::error::{GraphError, GraphResult};

// ── Arc ───────────────────────────────────────────────────────────────────────

/// A directed arc with travel cost, scenic weight, and provenance id.
///
/// Graphs without scenic data carry `weight == 0`; graphs without an
/// external edge id carry `fid == Fid::INVALID`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arc {
    pub source: NodeId,
    pub target: NodeId,
    /// Travel cost in seconds.
    pub cost: i32,
    /// Scenic weight; larger is more attractive.
    pub weight: i32,
    /// Provenance id of the original map edge.
    pub fid: Fid,
}

impl Arc {
    pub fn new(source: NodeId, target: NodeId, cost: i32, weight: i32, fid: Fid) -> Self {
        Self { source, target, cost, weight, fid }
    }

    /// A cost-only arc (no scenic weight, no provenance).
    pub fn with_cost(source: NodeId, target: NodeId, cost: i32) -> Self {
        Self::new(source, target, cost, 0, Fid::INVALID)
    }

    /// Sort key: arcs are grouped by source, then by target.
    #[inline]
    pub(crate) fn sort_key(&self) -> (u32, u32) {
        (self.source.0, self.target.0)
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Immutable offset-list directed multigraph with per-node geometry.
///
/// Built once via [`RoadGraphBuilder`] or [`RoadGraph::from_rows`], then
/// shared read-only by any number of concurrent [`Dijkstra`](crate::Dijkstra)
/// instances.
pub struct RoadGraph {
    /// Geographic position of each node.  Indexed by `NodeId`.
    nodes: Vec<GeoPos>,
    /// All arcs, stably sorted by `(source, target)`.  Indexed by `ArcId`.
    arcs: Vec<Arc>,
    /// Row pointer.  Outgoing arcs of node `v` are
    /// `arcs[offsets[v] .. offsets[v+1]]`.  Length = `num_nodes + 1`.
    offsets: Vec<u32>,
}

impl RoadGraph {
    /// Build a graph from node geometry and an arc list.
    ///
    /// Arcs may arrive in any order; they are stably sorted by
    /// `(source, target)`.  Every endpoint must be a valid node index.
    pub fn from_rows(nodes: Vec<GeoPos>, mut arcs: Vec<Arc>) -> GraphResult<Self> {
        let n = nodes.len();
        for arc in &arcs {
            if arc.source.index() >= n || arc.target.index() >= n {
                return Err(GraphError::ArcOutOfRange {
                    src_node: arc.source,
                    dst_node: arc.target,
                    num_nodes: n,
                });
            }
        }
        arcs.sort_by_key(Arc::sort_key); // stable: parallel arcs keep input order

        let mut offsets = vec![0u32; n + 1];
        for arc in &arcs {
            offsets[arc.source.index() + 1] += 1;
        }
        for i in 1..=n {
            offsets[i] += offsets[i - 1];
        }
        debug_assert_eq!(offsets[n] as usize, arcs.len());

        Ok(Self { nodes, arcs, offsets })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Access ────────────────────────────────────────────────────────────

    /// The outgoing arcs of `v` as a contiguous slice.
    #[inline]
    pub fn outgoing(&self, v: NodeId) -> &[Arc] {
        let start = self.offsets[v.index()] as usize;
        let end = self.offsets[v.index() + 1] as usize;
        &self.arcs[start..end]
    }

    /// `ArcId` of the first outgoing arc of `v`.
    #[inline]
    pub fn first_arc_id(&self, v: NodeId) -> ArcId {
        ArcId(self.offsets[v.index()])
    }

    /// Out-degree of `v`.
    #[inline]
    pub fn out_degree(&self, v: NodeId) -> usize {
        (self.offsets[v.index() + 1] - self.offsets[v.index()]) as usize
    }

    #[inline]
    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id.index()]
    }

    /// The full arc list in `ArcId` order.
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn nodes(&self) -> &[GeoPos] {
        &self.nodes
    }

    // ── Structure queries ─────────────────────────────────────────────────

    /// `true` when every arc `a → b` has at least one counterpart `b → a`.
    pub fn is_bidirectional(&self) -> bool {
        self.arcs
            .iter()
            .all(|arc| self.outgoing(arc.target).iter().any(|r| r.target == arc.source))
    }

    /// For every arc `a → b`, the `ArcId` of its reverse arc `b → a`.
    ///
    /// Parallel arcs are paired in lockstep: the k-th arc `a → b` maps to
    /// the k-th arc `b → a`.  Fails when any arc lacks a reverse, i.e. the
    /// graph is not bidirectional.
    pub fn counterpart_map(&self) -> GraphResult<Vec<ArcId>> {
        let mut result = vec![ArcId::INVALID; self.arcs.len()];
        let mut i = 0usize;
        while i < self.arcs.len() {
            let (s, t) = (self.arcs[i].source, self.arcs[i].target);
            // Arcs are sorted, so the (s, t) group is contiguous.
            let mut j = i;
            while j < self.arcs.len()
                && self.arcs[j].source == s
                && self.arcs[j].target == t
            {
                j += 1;
            }
            let reverse = self.arc_range(t, s);
            if reverse.len() != j - i {
                return Err(GraphError::NotBidirectional { src_node: s, dst_node: t });
            }
            for k in 0..(j - i) {
                result[i + k] = ArcId((reverse.start + k) as u32);
            }
            i = j;
        }
        Ok(result)
    }

    /// `ArcId` range of the arcs `from → to` (contiguous by sortedness).
    fn arc_range(&self, from: NodeId, to: NodeId) -> std::ops::Range<usize> {
        let base = self.offsets[from.index()] as usize;
        let out = self.outgoing(from);
        let start = base + out.partition_point(|a| a.target < to);
        let end = base + out.partition_point(|a| a.target <= to);
        start..end
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed arcs in any order; `build()`
/// sorts the arcs and computes the row pointer.
pub struct RoadGraphBuilder {
    nodes: Vec<GeoPos>,
    arcs: Vec<Arc>,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), arcs: Vec::new() }
    }

    /// Pre-allocate for the expected graph size to reduce reallocations
    /// when bulk-loading from a dump file.
    pub fn with_capacity(nodes: usize, arcs: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            arcs: Vec::with_capacity(arcs),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPos) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** arc.
    ///
    /// # Panics
    /// Panics when an endpoint was not returned by [`add_node`](Self::add_node).
    pub fn add_arc(&mut self, arc: Arc) {
        assert!(
            arc.source.index() < self.nodes.len() && arc.target.index() < self.nodes.len(),
            "arc {} -> {} references a node that was never added",
            arc.source,
            arc.target
        );
        self.arcs.push(arc);
    }

    /// Convenience: add a cost-only arc in **both directions**.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, cost: i32) {
        self.add_arc(Arc::with_cost(a, b, cost));
        self.add_arc(Arc::with_cost(b, a, cost));
    }

    /// Convenience: add a forest arc (cost, weight, fid) in both directions.
    /// Both directions share the provenance id, as in the map dumps.
    pub fn add_forest_edge(&mut self, a: NodeId, b: NodeId, cost: i32, weight: i32, fid: Fid) {
        self.add_arc(Arc::new(a, b, cost, weight, fid));
        self.add_arc(Arc::new(b, a, cost, weight, fid));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Consume the builder and produce a [`RoadGraph`].
    pub fn build(self) -> RoadGraph {
        // Endpoints were validated in add_arc, so from_rows cannot fail.
        match RoadGraph::from_rows(self.nodes, self.arcs) {
            Ok(g) => g,
            Err(_) => unreachable!("builder arcs are range-checked on insert"),
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
