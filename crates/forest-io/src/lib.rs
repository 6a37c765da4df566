//! `forest-io` — the pipeline's tabular file formats.
//!
//! Every input besides the graph dump is a whitespace-delimited ASCII table
//! with a fixed column count:
//!
//! | File        | Columns                                   |
//! |-------------|-------------------------------------------|
//! | entries     | `x y roadNodeIdx forestNodeIdx`           |
//! | population  | `lat lon population`                      |
//! | preferences | `upperBoundMinutes share`                 |
//! | parking     | `lat lon rank population`                 |
//!
//! Outputs are one value per line.
//!
//! | Module      | Contents                                        |
//! |-------------|-------------------------------------------------|
//! | [`columns`] | Generic column reader, `dump_vector`            |
//! | [`records`] | Typed loaders for the four input tables         |
//! | [`error`]   | `IoError`, `IoResult<T>`                        |

pub mod columns;
pub mod error;
pub mod records;

#[cfg(test)]
mod tests;

pub use columns::{dump_vector, read_column_file};
pub use error::{IoError, IoResult};
pub use records::{
    EntryRecord, ParkingRecord, PopulationRecord, read_entries, read_entry_populations,
    read_parking, read_populations, read_preferences,
};
