//! Generic whitespace-delimited column reader and per-line vector dump.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::{IoError, IoResult};

/// Read a table of N rows and M columns; returns M vectors of N values.
///
/// The column count is fixed by the first non-empty line; any row with a
/// different field count is a fatal format error.  Blank lines are skipped.
pub fn read_column_file(path: &Path) -> IoResult<Vec<Vec<f32>>> {
    let file = File::open(path).map_err(|e| {
        IoError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    })?;
    let reader = BufReader::new(file);

    let mut columns: Vec<Vec<f32>> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if columns.is_empty() {
            columns = vec![Vec::new(); fields.len()];
        } else if fields.len() != columns.len() {
            return Err(IoError::ColumnMismatch {
                path: path.display().to_string(),
                line: line_no,
                expected: columns.len(),
                found: fields.len(),
            });
        }
        for (column, field) in columns.iter_mut().zip(&fields) {
            let value: f32 = field.parse().map_err(|_| IoError::Parse {
                path: path.display().to_string(),
                line: line_no,
                what: format!("cannot parse number `{field}`"),
            })?;
            column.push(value);
        }
    }
    if columns.is_empty() {
        return Err(IoError::Empty { path: path.display().to_string() });
    }
    Ok(columns)
}

/// Write one value per line.
pub fn dump_vector<T: Display>(values: &[T], path: &Path) -> IoResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for value in values {
        writeln!(out, "{value}")?;
    }
    out.flush()?;
    info!("wrote {} values to {}", values.len(), path.display());
    Ok(())
}
