//! `forest-popularity` — distribute a spatial population grid onto forest
//! entry points.
//!
//! Two bounded-search passes over the walking-time road graph: the first
//! surveys which duration bucket each population point falls into per entry
//! (walking and cycling separately), the second distributes the population
//! weighted by a per-point likelihood derived from those buckets.  Car
//! visitors bypass the grid entirely and arrive via ranked parking lots.
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`mapper`]  | `ModeShares`, `map_population`, `MappedPopulation`    |
//! | [`parking`] | Rank-proportional car-population distribution         |
//! | [`error`]   | `PopularityError`, `PopularityResult<T>`              |

pub mod error;
pub mod mapper;
pub mod parking;

#[cfg(test)]
mod tests;

pub use error::{PopularityError, PopularityResult};
pub use mapper::{BIKE_SPEED_FACTOR, MappedPopulation, ModeShares, map_population};
pub use parking::distribute_car_population;
