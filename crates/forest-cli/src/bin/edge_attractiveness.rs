//! Per-arc attractiveness of forest roads.
//!
//! Reads the forest graph, entry points, entry populations, and the
//! duration-tolerance table; runs the selected model; writes one value per
//! original edge id.  When every arc carries a provenance id the graph is
//! simplified first (entries protected) and the shortcut results are
//! unpacked back onto the original edges.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use log::info;
use rustc_hash::FxHashSet;

use forest_cli::unpack_to_original;
use forest_core::{Fid, NodeId};
use forest_graph::{RoadGraph, simplify};
use forest_io::{dump_vector, read_entries, read_entry_populations, read_preferences};
use forest_model::{Approach, ModelInputs, compute_attractiveness};

#[derive(Parser)]
#[command(name = "edge-attractiveness", about = "Estimate per-edge attractiveness of forest roads")]
struct Args {
    /// Forest road graph dump.
    graph_file: PathBuf,
    /// Forest entries and parking lots: `x y roadNodeIdx forestNodeIdx`.
    entry_positions_file: PathBuf,
    /// Population per entry, one value per line.
    entry_population_file: PathBuf,
    /// Duration tolerance table: `upperBoundMinutes share`.
    preferences_file: PathBuf,
    /// Attractiveness model: 0 = Flooding, 1 = Via-Edge.
    approach: i32,
    /// Output file, one value per line.
    output_file: PathBuf,
}

fn main() {
    env_logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    if let Err(e) = run(args) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    // Trailing token for callers that cannot read the exit code.
    println!();
    println!("OK");
}

fn run(args: Args) -> Result<()> {
    let graph = RoadGraph::load_from_text(&args.graph_file)?;
    let entries: Vec<NodeId> = read_entries(&args.entry_positions_file)?
        .iter()
        .map(|r| r.forest_node)
        .collect();
    ensure!(
        entries.iter().all(|e| e.index() < graph.num_nodes()),
        "entry node index outside the graph"
    );
    let populations = read_entry_populations(&args.entry_population_file)?;
    let preferences = read_preferences(&args.preferences_file)?.scaled(60.0);
    let max_cost = preferences.max_bound() as i32;
    let approach = Approach::try_from(args.approach)?;
    info!(
        "selected {} approach",
        match approach {
            Approach::Flooding => "Flooding",
            Approach::ViaEdge => "Via-Edge",
        }
    );

    // Simplification needs provenance ids on every arc; dumps without them
    // run on the raw graph and the output is per arc instead.
    let has_fids =
        graph.num_arcs() > 0 && graph.arcs().iter().all(|a| a.fid != Fid::INVALID);
    let values = if has_fids {
        let protect: FxHashSet<NodeId> = entries.iter().copied().collect();
        let simplified = simplify(&graph, &protect);
        let entries: Vec<NodeId> = entries.iter().map(|&e| simplified.shift_node(e)).collect();
        let inputs =
            ModelInputs::new(&simplified.graph, &entries, &populations, preferences, max_cost)?;
        let per_arc = compute_attractiveness(approach, &inputs)?;
        unpack_to_original(&per_arc, &simplified.graph, &simplified.provenance)
    } else {
        let inputs = ModelInputs::new(&graph, &entries, &populations, preferences, max_cost)?;
        compute_attractiveness(approach, &inputs)?
    };

    info!("writing the attractivenesses to {}", args.output_file.display());
    dump_vector(&values, &args.output_file)
        .with_context(|| format!("writing {}", args.output_file.display()))?;
    Ok(())
}
