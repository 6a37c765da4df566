//! Whitespace-delimited graph dump reader/writer.
//!
//! # File format
//!
//! ```text
//! <numNodes>
//! <numArcs>
//! <x0> <y0>
//! ...
//! <source> <target> <cost> [<weight> [<fid>]]
//! ...
//! ```
//!
//! Nodes come first in index order; arcs follow one per line.  Costs and
//! weights may be written with a decimal point (`10.0`) and are truncated
//! to integer seconds.  Unknown trailing fields on an arc line are ignored.
//! The reader asserts the header counts against the actual line counts.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use forest_core::{Fid, GeoPos, NodeId};
use log::info;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Arc, RoadGraph};

impl RoadGraph {
    /// Read a graph dump, sort the arcs, and build the offset list.
    pub fn load_from_text(path: &Path) -> GraphResult<Self> {
        let file = File::open(path).map_err(|e| {
            GraphError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        })?;
        let mut reader = BufReader::new(file);
        let mut line_no = 0usize;

        let num_nodes = read_count(&mut reader, &mut line_no, path, "node count")?;
        let num_arcs = read_count(&mut reader, &mut line_no, path, "arc count")?;
        info!(
            "loading graph: {num_nodes} nodes, {num_arcs} arcs from {}",
            path.display()
        );

        let mut nodes = Vec::with_capacity(num_nodes);
        for _ in 0..num_nodes {
            let (no, line) = read_record(&mut reader, &mut line_no, path, "node", num_nodes, nodes.len())?;
            let mut fields = line.split_whitespace();
            let x = parse_f32(path, no, fields.next())?;
            let y = parse_f32(path, no, fields.next())?;
            nodes.push(GeoPos::new(x, y));
        }

        let mut arcs = Vec::with_capacity(num_arcs);
        for _ in 0..num_arcs {
            let (no, line) = read_record(&mut reader, &mut line_no, path, "arc", num_arcs, arcs.len())?;
            let mut fields = line.split_whitespace();
            let source = NodeId(parse_u32(path, no, fields.next())?);
            let target = NodeId(parse_u32(path, no, fields.next())?);
            let cost = parse_f32(path, no, fields.next())? as i32;
            let weight = match fields.next() {
                Some(f) => parse_f32(path, no, Some(f))? as i32,
                None => 0,
            };
            let fid = match fields.next() {
                Some(f) => Fid(parse_u32(path, no, Some(f))?),
                None => Fid::INVALID,
            };
            // Any further fields on the line are ignored.
            arcs.push(Arc::new(source, target, cost, weight, fid));
        }

        RoadGraph::from_rows(nodes, arcs)
    }

    /// Write the graph in the dump format; reloading yields an isomorphic
    /// graph (same offsets, same arc payloads).
    pub fn dump_to_text(&self, path: &Path) -> GraphResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{}", self.num_nodes())?;
        writeln!(out, "{}", self.num_arcs())?;
        for node in self.nodes() {
            writeln!(out, "{} {}", node.x, node.y)?;
        }
        for arc in self.arcs() {
            // Omit trailing default fields so cost-only dumps stay three columns.
            if arc.fid != Fid::INVALID {
                writeln!(
                    out,
                    "{} {} {} {} {}",
                    arc.source.0, arc.target.0, arc.cost, arc.weight, arc.fid.0
                )?;
            } else if arc.weight != 0 {
                writeln!(out, "{} {} {} {}", arc.source.0, arc.target.0, arc.cost, arc.weight)?;
            } else {
                writeln!(out, "{} {} {}", arc.source.0, arc.target.0, arc.cost)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

// ── Line scanning helpers ─────────────────────────────────────────────────────

/// Next non-empty line (trimmed, owned); `Ok(None)` at end of file.
fn next_line<R: BufRead>(
    reader: &mut R,
    line_no: &mut usize,
) -> GraphResult<Option<(usize, String)>> {
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        *line_no += 1;
        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            return Ok(Some((*line_no, trimmed.to_string())));
        }
    }
}

/// Parse a header line holding a single count.
fn read_count<R: BufRead>(
    reader: &mut R,
    line_no: &mut usize,
    path: &Path,
    what: &str,
) -> GraphResult<usize> {
    match next_line(reader, line_no)? {
        Some((no, line)) => line
            .split_whitespace()
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| parse_err(path, no, &format!("cannot parse {what}"))),
        None => Err(parse_err(path, *line_no, &format!("missing {what}"))),
    }
}

/// Next record line, or the count-mismatch error when the file ends early.
fn read_record<R: BufRead>(
    reader: &mut R,
    line_no: &mut usize,
    path: &Path,
    kind: &'static str,
    expected: usize,
    found: usize,
) -> GraphResult<(usize, String)> {
    next_line(reader, line_no)?.ok_or_else(|| GraphError::CountMismatch {
        path: path.display().to_string(),
        kind,
        expected,
        found,
    })
}

fn parse_err(path: &Path, line: usize, what: &str) -> GraphError {
    GraphError::Parse {
        path: path.display().to_string(),
        line,
        what: what.to_string(),
    }
}

fn parse_f32(path: &Path, line: usize, field: Option<&str>) -> GraphResult<f32> {
    let field = field.ok_or_else(|| parse_err(path, line, "missing field"))?;
    field
        .parse()
        .map_err(|_| parse_err(path, line, &format!("cannot parse number `{field}`")))
}

fn parse_u32(path: &Path, line: usize, field: Option<&str>) -> GraphResult<u32> {
    let field = field.ok_or_else(|| parse_err(path, line, "missing field"))?;
    field
        .parse()
        .map_err(|_| parse_err(path, line, &format!("cannot parse index `{field}`")))
}
