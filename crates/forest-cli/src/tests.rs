//! Unit tests for the driver plumbing, plus whole-pipeline runs over
//! temporary input files.

#[cfg(test)]
mod unpack {
    use rustc_hash::{FxHashMap, FxHashSet};

    use forest_core::{Fid, GeoPos, NodeId};
    use forest_graph::{RoadGraphBuilder, simplify};

    use crate::unpack_to_original;

    #[test]
    fn shortcut_values_cover_their_whole_chain() {
        let mut b = RoadGraphBuilder::new();
        let n: Vec<NodeId> = (0..4).map(|i| b.add_node(GeoPos::new(0.0, i as f32))).collect();
        for i in 0..3 {
            b.add_forest_edge(n[i], n[i + 1], 7, 1, Fid(i as u32));
        }
        let g = b.build();
        let protect: FxHashSet<NodeId> = [n[0], n[3]].into_iter().collect();
        let simplified = simplify(&g, &protect);
        assert_eq!(simplified.graph.num_arcs(), 2);

        let per_arc = vec![5.0f32, 5.0];
        let out = unpack_to_original(&per_arc, &simplified.graph, &simplified.provenance);
        // All three original edges inherit the shortcut's value.
        assert_eq!(out, vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn arcs_without_provenance_rows_write_their_own_fid() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(GeoPos::new(0.0, 0.0));
        let c = b.add_node(GeoPos::new(0.0, 1.0));
        b.add_forest_edge(a, c, 7, 1, Fid(3));
        let g = b.build();

        let out = unpack_to_original(&[2.5, 2.5], &g, &FxHashMap::default());
        assert_eq!(out.len(), 4);
        assert_eq!(out[3], 2.5);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn empty_graph_unpacks_to_nothing() {
        let g = RoadGraphBuilder::new().build();
        let out = unpack_to_original(&[], &g, &FxHashMap::default());
        assert!(out.is_empty());
    }
}

// ── Whole-pipeline runs over temporary files ──────────────────────────────────

#[cfg(test)]
mod pipeline {
    use std::path::PathBuf;

    use rustc_hash::FxHashSet;
    use tempfile::TempDir;

    use forest_core::NodeId;
    use forest_graph::{RoadGraph, simplify};
    use forest_io::{
        dump_vector, read_entries, read_entry_populations, read_populations, read_preferences,
    };
    use forest_model::{Approach, ModelInputs, compute_attractiveness};
    use forest_popularity::{ModeShares, map_population};

    use crate::unpack_to_original;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Forest graph dump: a chain A-B-C-D with an interior degree-2 run,
    /// weight 1 everywhere, one fid per undirected edge.
    const GRAPH: &str = "4\n\
                         6\n\
                         0.0 0.0\n\
                         0.0 1.0\n\
                         0.0 2.0\n\
                         0.0 3.0\n\
                         0 1 7 1 0\n\
                         1 0 7 1 0\n\
                         1 2 7 1 1\n\
                         2 1 7 1 1\n\
                         2 3 7 1 2\n\
                         3 2 7 1 2\n";

    /// Entries file: A and D are forest entries (column 3); no parking.
    const ENTRIES: &str = "0.0 0.0 0 0\n0.0 3.0 3 3\n";

    const PREFERENCES: &str = "2.5 0.5\n5 0.5\n"; // minutes: 150 s and 300 s once scaled

    /// Run the attractiveness driver's pipeline by hand: load, simplify,
    /// model, unpack, dump.
    fn attractiveness(dir: &TempDir, approach: Approach) -> Vec<f32> {
        let graph = RoadGraph::load_from_text(&write(dir, "graph.txt", GRAPH)).unwrap();
        let entries: Vec<NodeId> = read_entries(&write(dir, "entries.txt", ENTRIES))
            .unwrap()
            .iter()
            .map(|r| r.forest_node)
            .collect();
        let populations =
            read_entry_populations(&write(dir, "pops.txt", "100\n12\n")).unwrap();
        let preferences = read_preferences(&write(dir, "prefs.txt", PREFERENCES))
            .unwrap()
            .scaled(60.0);
        let max_cost = preferences.max_bound() as i32;

        let protect: FxHashSet<NodeId> = entries.iter().copied().collect();
        let simplified = simplify(&graph, &protect);
        // The interior B-C run contracts away entirely.
        assert_eq!(simplified.graph.num_nodes(), 2);
        let entries: Vec<NodeId> = entries.iter().map(|&e| simplified.shift_node(e)).collect();

        let inputs =
            ModelInputs::new(&simplified.graph, &entries, &populations, preferences, max_cost)
                .unwrap();
        let per_arc = compute_attractiveness(approach, &inputs).unwrap();
        let values = unpack_to_original(&per_arc, &simplified.graph, &simplified.provenance);

        let out = write(dir, "out.txt", "");
        dump_vector(&values, &out).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written.lines().count(), values.len());
        values
    }

    #[test]
    fn flooding_covers_every_original_edge() {
        let dir = tempfile::tempdir().unwrap();
        let values = attractiveness(&dir, Approach::Flooding);
        // One value per original undirected edge id, all reachable from
        // the populated entries.
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn via_edge_covers_every_original_edge() {
        let dir = tempfile::tempdir().unwrap();
        let values = attractiveness(&dir, Approach::ViaEdge);
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn popularity_tool_flow() {
        use forest_graph::spatial::map_positions_to_nodes;

        let dir = tempfile::tempdir().unwrap();
        // Walking graph: same chain, 300 s per segment.
        let graph_txt = "4\n6\n0.0 0.0\n0.0 1.0\n0.0 2.0\n0.0 3.0\n\
                         0 1 300\n1 0 300\n1 2 300\n2 1 300\n2 3 300\n3 2 300\n";
        let graph = RoadGraph::load_from_text(&write(&dir, "graph.txt", graph_txt)).unwrap();
        let entries: Vec<NodeId> = read_entries(&write(&dir, "entries.txt", ENTRIES))
            .unwrap()
            .iter()
            .map(|r| r.road_node)
            .collect();

        // Two grid cells near the interior nodes.
        let grid = read_populations(&write(&dir, "grid.txt", "0.0 1.1 80\n0.0 1.9 40\n"))
            .unwrap();
        let positions: Vec<_> = grid.iter().map(|r| r.pos).collect();
        let counts: Vec<f32> = grid.iter().map(|r| r.population).collect();
        let nodes = map_positions_to_nodes(&graph, &positions);
        assert_eq!(nodes, vec![NodeId(1), NodeId(2)]);

        let preferences = read_preferences(&write(&dir, "prefs.txt", "15 0.5\n30 0.5\n")).unwrap();
        let shares = ModeShares::survey_default();
        let mapped =
            map_population(&graph, &entries, &nodes, &counts, &preferences, shares).unwrap();

        let total: f64 = mapped.entry_populations.iter().sum();
        let expected = 120.0 * (shares.walking + shares.cycling) as f64;
        assert!((total - expected).abs() < expected * 0.01);

        let out = dir.path().join("popularity.txt");
        dump_vector(&mapped.entry_populations, &out).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap().lines().count(), 2);
    }
}
