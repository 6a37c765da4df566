//! Popularity of forest entry points.
//!
//! Snaps the population grid onto the walking-time road graph, runs the
//! two-pass reachability mapping, appends the parking-lot populations, and
//! writes one population value per entry per line.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use log::info;

use forest_core::{GeoPos, NodeId};
use forest_graph::RoadGraph;
use forest_graph::spatial::map_positions_to_nodes;
use forest_io::{dump_vector, read_entries, read_parking, read_populations, read_preferences};
use forest_popularity::{ModeShares, map_population};

#[derive(Parser)]
#[command(name = "entry-popularity", about = "Distribute the population grid onto forest entries")]
struct Args {
    /// Road graph dump with walking-time edge costs.
    graph_file: PathBuf,
    /// Forest entries and parking lots: `x y roadNodeIdx forestNodeIdx`.
    /// The trailing rows (one per parking-file line) are the parking lots.
    entries_and_parking_file: PathBuf,
    /// Population grid: `lat lon population`.
    population_file: PathBuf,
    /// Duration tolerance table: `upperBoundMinutes share`.
    preferences_file: PathBuf,
    /// Parking lots: `lat lon rank population`.
    parking_file: PathBuf,
    /// Output file, one population per entry per line.
    output_file: PathBuf,
    /// Optional mode split: walking, cycling, and car share (all three or
    /// none; defaults to the user-study split).
    #[arg(num_args = 0..=3)]
    mode_shares: Vec<f32>,
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
    let shares = match args.mode_shares.as_slice() {
        [] => ModeShares::survey_default(),
        &[walking, cycling, car] => ModeShares::new(walking, cycling, car)?,
        other => anyhow::bail!("expected three mode shares or none, got {}", other.len()),
    };

    let graph = RoadGraph::load_from_text(&args.graph_file)?;
    let parking = read_parking(&args.parking_file)?;

    // The entries file lists the parking lots last; they receive their
    // population from the parking file, not from the grid.
    let records = read_entries(&args.entries_and_parking_file)?;
    ensure!(
        records.len() >= parking.len(),
        "entries file has fewer rows ({}) than the parking file ({})",
        records.len(),
        parking.len()
    );
    let entries: Vec<NodeId> = records[..records.len() - parking.len()]
        .iter()
        .map(|r| r.road_node)
        .collect();
    ensure!(
        entries.iter().all(|e| e.index() < graph.num_nodes()),
        "entry node index outside the graph"
    );

    let grid = read_populations(&args.population_file)?;
    let positions: Vec<GeoPos> = grid.iter().map(|r| r.pos).collect();
    let counts: Vec<f32> = grid.iter().map(|r| r.population).collect();
    let population_nodes = map_positions_to_nodes(&graph, &positions);

    let preferences = read_preferences(&args.preferences_file)?;

    let mapped =
        map_population(&graph, &entries, &population_nodes, &counts, &preferences, shares)?;
    info!("car population: {:.1}", mapped.car_population);

    // Parking lots behave like entries downstream; their population comes
    // straight from the parking file's last column.
    let mut populations = mapped.entry_populations;
    populations.extend(parking.iter().map(|lot| lot.population as f64));

    info!("writing entry point popularity to {}", args.output_file.display());
    dump_vector(&populations, &args.output_file)
        .with_context(|| format!("writing {}", args.output_file.display()))?;
    Ok(())
}
