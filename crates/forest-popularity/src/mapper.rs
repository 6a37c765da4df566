//! The two-pass reachability mapper.
//!
//! # Procedure
//!
//! 1. **Survey pass**: from every entry, one bounded search over the
//!    walking-time graph.  Each reached population point counts the entry
//!    into a duration bucket — against walking bounds when reached within
//!    the walking limit, and against cycling bounds (walking bounds times
//!    [`BIKE_SPEED_FACTOR`]) always.
//! 2. **Likelihood smoothing**: per point and mode, bucket counts are
//!    rewritten into a closeness likelihood (`1 − bound/S` with a quadratic
//!    guard against negatives).
//! 3. **Distribution pass**: the searches are repeated; each reached point
//!    hands `likelihood · tailShare · population` to the entry, separately
//!    per mode.
//! 4. Mode totals are rescaled to the modal quotas, the population that
//!    reaches no entry at all is re-spread proportionally, and the cycling
//!    accumulator folds into the walking one.
//!
//! Both passes parallelise over entries with rayon; every worker owns its
//! Dijkstra scratch, and chunk results merge in a fixed order, so the
//! output is deterministic.
//!
//! Deviations between the mapped totals and the modal quotas are reported
//! as warnings and do not abort the run.

use rayon::prelude::*;

use forest_core::{NodeId, Preferences, Progress, geo::differ};
use forest_graph::{Dijkstra, RoadGraph};
use log::{info, warn};

use crate::error::{PopularityError, PopularityResult};

/// Average cycling speed as a multiple of walking speed.
pub const BIKE_SPEED_FACTOR: f32 = 4.0;

/// Entries handed to one worker at a time.
const ENTRY_CHUNK: usize = 16;

/// Relative tolerance of the post-mapping plausibility checks.
const DEVIATION: f64 = 0.01;

// ── Mode shares ───────────────────────────────────────────────────────────────

/// Global share of visitors per means of transport.
#[derive(Copy, Clone, Debug)]
pub struct ModeShares {
    pub walking: f32,
    pub cycling: f32,
    pub car: f32,
}

impl ModeShares {
    /// The user-study split: 71 of 124 respondents walk, 13 cycle, the
    /// rest drive.
    pub fn survey_default() -> Self {
        let walking = 71.0 / 124.0;
        let cycling = 13.0 / 124.0;
        Self { walking, cycling, car: 1.0 - walking - cycling }
    }

    /// Validate a user-supplied split.
    pub fn new(walking: f32, cycling: f32, car: f32) -> PopularityResult<Self> {
        let sum = walking + cycling + car;
        let valid = (0.0..=1.0).contains(&walking)
            && (0.0..=1.0).contains(&cycling)
            && (0.0..=1.0).contains(&car)
            && (sum - 1.0).abs() <= 1e-3;
        if !valid {
            return Err(PopularityError::InvalidModeShares { walking, cycling, car });
        }
        Ok(Self { walking, cycling, car })
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

/// Output of [`map_population`].
pub struct MappedPopulation {
    /// Walking + cycling population imputed to each entry, in input order.
    pub entry_populations: Vec<f64>,
    /// The car-borne share of the total population; distributed over
    /// parking lots by the caller.
    pub car_population: f64,
}

// ── Mapper ────────────────────────────────────────────────────────────────────

/// Distribute `populations` (already snapped to `population_nodes`) onto the
/// forest `entries` of a walking-time graph.
///
/// `preferences` carries upper bounds in **minutes**, as loaded; bucket
/// bounds in seconds are derived here for both modes.
pub fn map_population(
    graph: &RoadGraph,
    entries: &[NodeId],
    population_nodes: &[NodeId],
    populations: &[f32],
    preferences: &Preferences,
    shares: ModeShares,
) -> PopularityResult<MappedPopulation> {
    if population_nodes.len() != populations.len() {
        return Err(PopularityError::PopulationMismatch {
            points: population_nodes.len(),
            values: populations.len(),
        });
    }

    let total_population: f64 = populations.iter().map(|&p| p as f64).sum();
    info!(
        "mapping {:.0} people at {} grid points onto {} entries",
        total_population,
        populations.len(),
        entries.len()
    );

    let buckets = Buckets::from_preferences(preferences);
    let mut survey = survey_pass(graph, entries, population_nodes, &buckets);
    survey.smooth(&buckets);
    let second = distribution_pass(
        graph,
        entries,
        population_nodes,
        populations,
        &buckets,
        &survey,
        preferences.tail_shares(),
    );

    Ok(finalise(second, populations, total_population, shares, entries.len()))
}

// ── Buckets ───────────────────────────────────────────────────────────────────

/// Duration bucket bounds in seconds, per mode, plus the search limits.
struct Buckets {
    walk: Vec<i32>,
    bike: Vec<i32>,
    walk_limit: i32,
    bike_limit: i32,
}

impl Buckets {
    fn from_preferences(preferences: &Preferences) -> Self {
        let walk: Vec<i32> = preferences.upper_bounds().iter().map(|&m| (60.0 * m) as i32).collect();
        let bike: Vec<i32> = walk.iter().map(|&s| (BIKE_SPEED_FACTOR * s as f32) as i32).collect();
        let walk_limit = *walk.last().unwrap_or(&0);
        let bike_limit = *bike.last().unwrap_or(&0);
        Self { walk, bike, walk_limit, bike_limit }
    }

    fn len(&self) -> usize {
        self.walk.len()
    }
}

/// First bucket whose bound is at least `cost`.
///
/// # Panics
/// Panics when `cost` exceeds every bound — the search limit guarantees it
/// cannot, so an overrun means corrupt state.
fn bucket_index(cost: i32, bounds: &[i32]) -> usize {
    let b = bounds.partition_point(|&bound| bound < cost);
    assert!(b < bounds.len(), "cost {cost} beyond the last bucket bound");
    b
}

// ── Pass 1: survey ────────────────────────────────────────────────────────────

/// Per-point bucket matrices, flattened `[point * num_buckets + bucket]`.
struct Survey {
    walk: Vec<f32>,
    bike: Vec<f32>,
}

fn survey_pass(
    graph: &RoadGraph,
    entries: &[NodeId],
    population_nodes: &[NodeId],
    buckets: &Buckets,
) -> Survey {
    let nb = buckets.len();
    let cells = population_nodes.len() * nb;
    let progress = Progress::new("reachability survey", entries.len());

    let partials: Vec<(Vec<f32>, Vec<f32>)> = entries
        .par_chunks(ENTRY_CHUNK)
        .map(|chunk| {
            let mut dijkstra = Dijkstra::new(graph);
            dijkstra.set_cost_limit(buckets.bike_limit);
            let mut walk = vec![0.0f32; cells];
            let mut bike = vec![0.0f32; cells];
            for &entry in chunk {
                dijkstra.run(entry, None);
                for (i, &point) in population_nodes.iter().enumerate() {
                    if !dijkstra.is_settled(point) {
                        continue;
                    }
                    let cost = dijkstra.cost(point);
                    // Cycling: the bounds already carry the speed factor.
                    bike[i * nb + bucket_index(cost, &buckets.bike)] += 1.0;
                    if cost <= buckets.walk_limit {
                        walk[i * nb + bucket_index(cost, &buckets.walk)] += 1.0;
                    }
                }
                progress.tick();
            }
            (walk, bike)
        })
        .collect();

    let mut survey = Survey { walk: vec![0.0; cells], bike: vec![0.0; cells] };
    for (walk, bike) in partials {
        for (acc, v) in survey.walk.iter_mut().zip(walk) {
            *acc += v;
        }
        for (acc, v) in survey.bike.iter_mut().zip(bike) {
            *acc += v;
        }
    }
    survey
}

impl Survey {
    /// Rewrite the bucket counts into likelihoods, in place.
    ///
    /// `S = Σ_b count[b] · bound[b]` measures how much close-by forest a
    /// point has; buckets below `S` become `1 − bound/S`, the rest fall
    /// back to `1/(b+1)²` to stay positive.
    fn smooth(&mut self, buckets: &Buckets) {
        smooth_mode(&mut self.walk, &buckets.walk);
        smooth_mode(&mut self.bike, &buckets.bike);
    }
}

fn smooth_mode(counts: &mut [f32], bounds: &[i32]) {
    let nb = bounds.len();
    for row in counts.chunks_mut(nb) {
        let s: f32 = row.iter().zip(bounds).map(|(&c, &b)| c * b as f32).sum();
        if s <= 0.0 {
            continue;
        }
        for (b, value) in row.iter_mut().enumerate() {
            let bound = bounds[b] as f32;
            *value = if bound < s {
                1.0 - bound / s
            } else {
                1.0 / ((b + 1) * (b + 1)) as f32
            };
        }
    }
}

// ── Pass 2: distribution ──────────────────────────────────────────────────────

struct Distribution {
    /// Walking population per entry.
    walk: Vec<f64>,
    /// Cycling population per entry.
    bike: Vec<f64>,
    /// Whether each point reaches any entry at all, per mode.
    walk_reached: Vec<bool>,
    bike_reached: Vec<bool>,
}

#[allow(clippy::too_many_arguments)]
fn distribution_pass(
    graph: &RoadGraph,
    entries: &[NodeId],
    population_nodes: &[NodeId],
    populations: &[f32],
    buckets: &Buckets,
    survey: &Survey,
    tail_shares: &[f32],
) -> Distribution {
    let nb = buckets.len();
    let progress = Progress::new("population distribution", entries.len());

    let indexed: Vec<(usize, NodeId)> = entries.iter().copied().enumerate().collect();
    let partials: Vec<(Vec<(usize, f64, f64)>, Vec<bool>, Vec<bool>)> = indexed
        .par_chunks(ENTRY_CHUNK)
        .map(|chunk| {
            let mut dijkstra = Dijkstra::new(graph);
            dijkstra.set_cost_limit(buckets.bike_limit);
            let mut per_entry = Vec::with_capacity(chunk.len());
            let mut walk_reached = vec![false; population_nodes.len()];
            let mut bike_reached = vec![false; population_nodes.len()];
            for &(idx, entry) in chunk {
                dijkstra.run(entry, None);
                let mut walk_sum = 0.0f64;
                let mut bike_sum = 0.0f64;
                for (j, &point) in population_nodes.iter().enumerate() {
                    if !dijkstra.is_settled(point) {
                        continue;
                    }
                    let cost = dijkstra.cost(point);
                    let b = bucket_index(cost, &buckets.bike);
                    bike_sum += (survey.bike[j * nb + b] * tail_shares[b] * populations[j]) as f64;
                    bike_reached[j] = true;
                    if cost < buckets.walk_limit {
                        let bb = bucket_index(cost, &buckets.walk);
                        walk_sum +=
                            (survey.walk[j * nb + bb] * tail_shares[bb] * populations[j]) as f64;
                        walk_reached[j] = true;
                    }
                }
                per_entry.push((idx, walk_sum, bike_sum));
                progress.tick();
            }
            (per_entry, walk_reached, bike_reached)
        })
        .collect();

    let mut out = Distribution {
        walk: vec![0.0; entries.len()],
        bike: vec![0.0; entries.len()],
        walk_reached: vec![false; population_nodes.len()],
        bike_reached: vec![false; population_nodes.len()],
    };
    for (per_entry, walk_reached, bike_reached) in partials {
        for (idx, walk, bike) in per_entry {
            out.walk[idx] += walk;
            out.bike[idx] += bike;
        }
        for (acc, v) in out.walk_reached.iter_mut().zip(walk_reached) {
            *acc |= v;
        }
        for (acc, v) in out.bike_reached.iter_mut().zip(bike_reached) {
            *acc |= v;
        }
    }
    out
}

// ── Normalisation and redistribution ──────────────────────────────────────────

fn finalise(
    mut dist: Distribution,
    populations: &[f32],
    total_population: f64,
    shares: ModeShares,
    num_entries: usize,
) -> MappedPopulation {
    // Scale each mode so its total matches the quota of the population that
    // actually reaches the forest by that mode.
    let mapped_walk = rescale_mode(&mut dist.walk, &dist.walk_reached, populations, shares.walking);
    let mapped_bike = rescale_mode(&mut dist.bike, &dist.bike_reached, populations, shares.cycling);

    // People who reach no entry by a mode still visit somewhere: spread
    // them over all entries proportional to the entries' current pull.
    let unmapped: f64 = populations
        .iter()
        .enumerate()
        .map(|(j, &p)| {
            let w = if dist.walk_reached[j] { 0.0 } else { shares.walking as f64 };
            let b = if dist.bike_reached[j] { 0.0 } else { shares.cycling as f64 };
            (w + b) * p as f64
        })
        .sum();
    let mapped = mapped_walk + mapped_bike;
    let mut entry_populations = vec![0.0f64; num_entries];
    for i in 0..num_entries {
        let mut value = dist.walk[i];
        if mapped > 0.0 {
            value += (dist.walk[i] + dist.bike[i]) / mapped * unmapped;
        }
        value += dist.bike[i];
        entry_populations[i] = value;
    }

    // Plausibility checks; deviations are reported, not fatal.
    let non_motorised = (shares.walking + shares.cycling) as f64;
    let remaining = total_population - (mapped + unmapped);
    if differ((1.0 - non_motorised) * total_population, remaining, DEVIATION) {
        warn!(
            "remaining unmapped population differs from quota: {:.1} vs. {:.1}",
            (1.0 - non_motorised) * total_population,
            remaining
        );
    }
    if differ(non_motorised * total_population, mapped + unmapped, DEVIATION) {
        warn!(
            "mapped walking and cycling population differs from quota: {:.1} vs. {:.1}",
            non_motorised * total_population,
            mapped + unmapped
        );
    }

    let car_population = shares.car as f64 * total_population;
    MappedPopulation { entry_populations, car_population }
}

/// Rescale one mode's accumulator so it totals the reached population times
/// the mode share; returns that target total.  Zero totals stay untouched.
fn rescale_mode(
    accumulator: &mut [f64],
    reached: &[bool],
    populations: &[f32],
    mode_share: f32,
) -> f64 {
    let mapped: f64 = populations
        .iter()
        .zip(reached)
        .filter(|&(_, &r)| r)
        .map(|(&p, _)| p as f64)
        .sum::<f64>()
        * mode_share as f64;
    let sum: f64 = accumulator.iter().sum();
    if sum > 0.0 && mapped > 0.0 {
        let scale = mapped / sum;
        for v in accumulator.iter_mut() {
            *v *= scale;
        }
    }
    mapped
}
