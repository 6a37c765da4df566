//! Reusable bounded Dijkstra engine.
//!
//! # Reuse pattern
//!
//! Both attractiveness models and the popularity mapper run one bounded
//! search per entry point or per arc — hundreds of thousands of searches on
//! the same graph.  A `Dijkstra` instance therefore owns its scratch vectors
//! and resets them between runs in O(touched) rather than O(nodes): every
//! node whose cost was written during a bounded search is recorded in a
//! dense `touched` list and only those slots are cleared.
//!
//! Unbounded searches skip the touched bookkeeping; they fall back to a full
//! O(n) reset before the next run.
//!
//! # Determinism
//!
//! The heap key is `(cost, insertion sequence, node)`, so entries of equal
//! cost pop in insertion order and every run settles nodes in the same
//! order.  Sharing an instance across threads is not supported; each worker
//! owns its own engine.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use forest_core::NodeId;

use crate::graph::RoadGraph;

/// Cost of an unreached node.
pub const INFINITY: i32 = i32::MAX;

/// Single-source shortest-path engine with cost/hop/target/ignore and
/// must-settle bounds.
///
/// All scratch vectors are sized to the graph at construction; the graph is
/// borrowed read-only for the engine's lifetime.
pub struct Dijkstra<'g> {
    graph: &'g RoadGraph,

    // Per-node search state.
    cost: Vec<i32>,
    origin: Vec<NodeId>,
    hops: Vec<u32>,
    settled: Vec<bool>,

    // Dense undo lists for the O(touched) reset.
    touched: Vec<NodeId>,
    settled_list: Vec<NodeId>,
    num_settled: usize,

    // Bounds, persistent across runs until changed.
    cost_limit: i32,
    /// 0 means unlimited.
    hop_limit: u32,
    ignore: Vec<bool>,
    must_settle: Vec<bool>,
    must_settle_marked: Vec<NodeId>,

    heap: BinaryHeap<Reverse<(i32, u64, u32)>>,
    seq: u64,
    /// Whether the last run recorded touched slots (governs the reset path).
    last_run_bounded: bool,
}

impl<'g> Dijkstra<'g> {
    pub fn new(graph: &'g RoadGraph) -> Self {
        let n = graph.num_nodes();
        Self {
            graph,
            cost: vec![INFINITY; n],
            origin: vec![NodeId::INVALID; n],
            hops: vec![0; n],
            settled: vec![false; n],
            touched: Vec::new(),
            settled_list: Vec::new(),
            num_settled: 0,
            cost_limit: INFINITY,
            hop_limit: 0,
            ignore: vec![false; n],
            must_settle: vec![false; n],
            must_settle_marked: Vec::new(),
            heap: BinaryHeap::new(),
            seq: 0,
            last_run_bounded: true,
        }
    }

    // ── Bounds ────────────────────────────────────────────────────────────

    /// Abort once a queue entry's tentative cost exceeds `limit`.
    /// A negative limit settles nothing.
    pub fn set_cost_limit(&mut self, limit: i32) {
        self.cost_limit = limit;
    }

    pub fn clear_cost_limit(&mut self) {
        self.cost_limit = INFINITY;
    }

    /// Stop expanding nodes more than `limit` arcs from the source set.
    /// 0 disables the bound.
    pub fn set_hop_limit(&mut self, limit: u32) {
        self.hop_limit = limit;
    }

    /// Skip `v` when relaxing arcs — it is never reached nor traversed.
    /// Sources are exempt: an ignored source still settles itself.
    pub fn ignore_node(&mut self, v: NodeId) {
        self.ignore[v.index()] = true;
    }

    pub fn unignore_node(&mut self, v: NodeId) {
        self.ignore[v.index()] = false;
    }

    /// Abort as soon as all `nodes` are settled.  Replaces any previous
    /// must-settle set.
    pub fn set_must_settle(&mut self, nodes: &[NodeId]) {
        self.clear_must_settle();
        for &v in nodes {
            if !self.must_settle[v.index()] {
                self.must_settle[v.index()] = true;
                self.must_settle_marked.push(v);
            }
        }
    }

    pub fn clear_must_settle(&mut self) {
        for &v in &self.must_settle_marked {
            self.must_settle[v.index()] = false;
        }
        self.must_settle_marked.clear();
    }

    fn bounded(&self) -> bool {
        self.cost_limit != INFINITY || self.hop_limit != 0 || !self.must_settle_marked.is_empty()
    }

    // ── Search ────────────────────────────────────────────────────────────

    /// Shortest path from `source`; with a target, returns its cost
    /// ([`INFINITY`] when unreached) and stops early upon settling it.
    pub fn run(&mut self, source: NodeId, target: Option<NodeId>) -> i32 {
        self.run_multi(&[source], target)
    }

    /// Multi-source search: every source starts at cost 0.
    pub fn run_multi(&mut self, sources: &[NodeId], target: Option<NodeId>) -> i32 {
        self.reset();
        let bounded = self.bounded();
        self.last_run_bounded = bounded;

        for &s in sources {
            self.cost[s.index()] = 0;
            self.origin[s.index()] = s;
            self.hops[s.index()] = 0;
            self.heap.push(Reverse((0, self.seq, s.0)));
            self.seq += 1;
            if bounded {
                self.touched.push(s);
            }
        }

        let mut must_remaining = self.must_settle_marked.len();

        while let Some(Reverse((c, _, u))) = self.heap.pop() {
            if c > self.cost_limit {
                break;
            }
            let u = NodeId(u);
            if self.settled[u.index()] {
                continue; // stale heap entry
            }
            self.settled[u.index()] = true;
            if bounded {
                self.settled_list.push(u);
            }
            self.num_settled += 1;

            if must_remaining > 0 && self.must_settle[u.index()] {
                must_remaining -= 1;
                if must_remaining == 0 {
                    break;
                }
            }
            if Some(u) == target {
                break;
            }
            if self.hop_limit > 0 && self.hops[u.index()] >= self.hop_limit {
                continue; // hop budget exhausted, do not expand
            }

            for arc in self.graph.outgoing(u) {
                let v = arc.target;
                if self.ignore[v.index()] || self.settled[v.index()] {
                    continue;
                }
                let g = c.saturating_add(arc.cost);
                if g < self.cost[v.index()] {
                    self.cost[v.index()] = g;
                    self.origin[v.index()] = u;
                    self.hops[v.index()] = self.hops[u.index()] + 1;
                    self.heap.push(Reverse((g, self.seq, v.0)));
                    self.seq += 1;
                    if bounded {
                        self.touched.push(v);
                    }
                }
            }
        }

        match target {
            Some(t) => self.cost[t.index()],
            None => INFINITY,
        }
    }

    /// Clear the previous run's state.
    ///
    /// After a bounded search this walks only the touched slots; after an
    /// unbounded one it reinitialises every vector.  Idempotent: a second
    /// call is a no-op.
    pub fn reset(&mut self) {
        if self.last_run_bounded {
            self.reset_touched();
        } else if self.num_settled > 0 {
            self.reset_full();
        }
        self.num_settled = 0;
        self.heap.clear();
    }

    fn reset_touched(&mut self) {
        for &v in &self.settled_list {
            self.settled[v.index()] = false;
        }
        for &v in &self.touched {
            self.cost[v.index()] = INFINITY;
            self.origin[v.index()] = NodeId::INVALID;
            self.hops[v.index()] = 0;
        }
        self.settled_list.clear();
        self.touched.clear();
    }

    fn reset_full(&mut self) {
        self.cost.fill(INFINITY);
        self.origin.fill(NodeId::INVALID);
        self.hops.fill(0);
        self.settled.fill(false);
        self.settled_list.clear();
        self.touched.clear();
    }

    // ── Results of the last run ───────────────────────────────────────────

    /// Cost of `v`, or [`INFINITY`] when it was never reached.
    /// The value is final only once `v` is settled.
    #[inline]
    pub fn cost(&self, v: NodeId) -> i32 {
        self.cost[v.index()]
    }

    /// Parent of `v` on its shortest path; the source maps to itself.
    #[inline]
    pub fn origin(&self, v: NodeId) -> NodeId {
        self.origin[v.index()]
    }

    #[inline]
    pub fn is_settled(&self, v: NodeId) -> bool {
        self.settled[v.index()]
    }

    pub fn num_settled(&self) -> usize {
        self.num_settled
    }

    /// Nodes settled by the last **bounded** run, in settling order.
    /// Empty after an unbounded run.
    pub fn settled_nodes(&self) -> &[NodeId] {
        &self.settled_list
    }
}
