//! Typed loaders for the four input tables.
//!
//! All of them sit on [`read_column_file`](crate::read_column_file); node
//! indices are read as floats (the upstream exporter writes them that way)
//! and truncated.

use std::path::Path;

use forest_core::{GeoPos, NodeId, Preferences};

use crate::columns::read_column_file;
use crate::error::{IoError, IoResult};

/// One line of the entries-and-parking file: a position plus the matched
/// node in the road graph and in the forest graph.
#[derive(Copy, Clone, Debug)]
pub struct EntryRecord {
    pub pos: GeoPos,
    pub road_node: NodeId,
    pub forest_node: NodeId,
}

/// One population grid cell.
#[derive(Copy, Clone, Debug)]
pub struct PopulationRecord {
    pub pos: GeoPos,
    pub population: f32,
}

/// One parking lot with its attractiveness rank and optional pre-assigned
/// population.
#[derive(Copy, Clone, Debug)]
pub struct ParkingRecord {
    pub pos: GeoPos,
    pub rank: f32,
    pub population: f32,
}

fn check_columns(path: &Path, columns: &[Vec<f32>], expected: usize) -> IoResult<()> {
    if columns.len() != expected {
        return Err(IoError::ColumnMismatch {
            path: path.display().to_string(),
            line: 1,
            expected,
            found: columns.len(),
        });
    }
    Ok(())
}

/// Read `x y roadNodeIdx forestNodeIdx` lines.
pub fn read_entries(path: &Path) -> IoResult<Vec<EntryRecord>> {
    let columns = read_column_file(path)?;
    check_columns(path, &columns, 4)?;
    Ok((0..columns[0].len())
        .map(|i| EntryRecord {
            pos: GeoPos::new(columns[0][i], columns[1][i]),
            road_node: NodeId(columns[2][i] as u32),
            forest_node: NodeId(columns[3][i] as u32),
        })
        .collect())
}

/// Read `lat lon population` lines.
pub fn read_populations(path: &Path) -> IoResult<Vec<PopulationRecord>> {
    let columns = read_column_file(path)?;
    check_columns(path, &columns, 3)?;
    Ok((0..columns[0].len())
        .map(|i| PopulationRecord {
            pos: GeoPos::new(columns[0][i], columns[1][i]),
            population: columns[2][i],
        })
        .collect())
}

/// Read `lat lon rank population` lines.
pub fn read_parking(path: &Path) -> IoResult<Vec<ParkingRecord>> {
    let columns = read_column_file(path)?;
    check_columns(path, &columns, 4)?;
    Ok((0..columns[0].len())
        .map(|i| ParkingRecord {
            pos: GeoPos::new(columns[0][i], columns[1][i]),
            rank: columns[2][i],
            population: columns[3][i],
        })
        .collect())
}

/// Read and validate `upperBoundMinutes share` lines.  Bounds stay in
/// minutes; callers scale to the unit they need.
pub fn read_preferences(path: &Path) -> IoResult<Preferences> {
    let mut columns = read_column_file(path)?;
    check_columns(path, &columns, 2)?;
    let shares = columns.pop().unwrap_or_default();
    let bounds = columns.pop().unwrap_or_default();
    Preferences::new(bounds, shares).map_err(|source| IoError::Invalid {
        path: path.display().to_string(),
        source,
    })
}

/// Read a single-column file of per-entry populations.
pub fn read_entry_populations(path: &Path) -> IoResult<Vec<f32>> {
    let mut columns = read_column_file(path)?;
    if columns.len() != 1 {
        return Err(IoError::ColumnMismatch {
            path: path.display().to_string(),
            line: 1,
            expected: 1,
            found: columns.len(),
        });
    }
    Ok(columns.pop().unwrap_or_default())
}
