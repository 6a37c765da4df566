//! R-tree snapping of `(x, y)` positions to graph nodes.
//!
//! Population grid cells and parking lots arrive as raw coordinates; the
//! pipeline needs the nearest graph node for each.  An R-tree over the node
//! positions answers those nearest-neighbour queries in logarithmic time.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use forest_core::{GeoPos, NodeId};

use crate::graph::RoadGraph;

/// Entry stored in the R-tree: a 2-D point with the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in coordinate space.  Sufficient for
    /// nearest-node queries within one region (error < 0.1 % at ≤ 60° lat).
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over a graph's node positions.
pub struct NodeIndex {
    tree: RTree<NodeEntry>,
}

impl NodeIndex {
    /// Bulk-load the index from the graph's node list — O(n log n), faster
    /// than n single inserts.
    pub fn build(graph: &RoadGraph) -> Self {
        let entries: Vec<NodeEntry> = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId(i as u32) })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    /// The `NodeId` nearest to `pos`; `None` only for an empty graph.
    pub fn nearest(&self, pos: GeoPos) -> Option<NodeId> {
        self.tree.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.id)
    }
}

/// Map each position to the closest node of `graph`.
///
/// # Panics
/// Panics when the graph has no nodes.
pub fn map_positions_to_nodes(graph: &RoadGraph, positions: &[GeoPos]) -> Vec<NodeId> {
    assert!(!graph.is_empty(), "cannot snap positions onto an empty graph");
    let index = NodeIndex::build(graph);
    positions
        .iter()
        .map(|&p| match index.nearest(p) {
            Some(id) => id,
            None => unreachable!("non-empty graph always has a nearest node"),
        })
        .collect()
}
