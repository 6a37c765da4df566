//! Rank-proportional distribution of the car population onto parking lots.

use forest_core::geo::differ;
use log::warn;

/// Split `car_population` over parking lots proportional to their rank.
///
/// A rank sum of zero distributes nothing rather than dividing by zero.
/// A mapped total deviating more than 1 % from the input is reported as a
/// warning.
pub fn distribute_car_population(car_population: f64, ranks: &[f32]) -> Vec<f32> {
    let mut rank_sum: f64 = ranks.iter().map(|&r| r as f64).sum();
    if rank_sum == 0.0 {
        rank_sum = 1.0;
    }
    let populations: Vec<f32> = ranks
        .iter()
        .map(|&r| (car_population * r as f64 / rank_sum) as f32)
        .collect();

    let mapped: f64 = populations.iter().map(|&p| p as f64).sum();
    if differ(car_population, mapped, 0.01) {
        warn!(
            "input car population differs from the mapped parking population: {car_population:.1} vs. {mapped:.1}"
        );
    }
    populations
}
