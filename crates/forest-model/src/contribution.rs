//! Sparse per-entry contribution accumulator.
//!
//! Keys are dense indices (node or arc positions, depending on the model);
//! rows are keyed by entry node.  Workers accumulate into private instances
//! and the shards are merged afterwards in a fixed order, so the final sums
//! are deterministic for a given input.

use rustc_hash::FxHashMap;

use forest_core::NodeId;

/// Two-level sparse map `entry -> index -> value`.
#[derive(Debug, Default)]
pub struct Contribution {
    rows: FxHashMap<NodeId, FxHashMap<u32, f32>>,
}

impl Contribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `value` onto `(entry, key)`.
    pub fn add(&mut self, entry: NodeId, key: u32, value: f32) {
        *self.rows.entry(entry).or_default().entry(key).or_insert(0.0) += value;
    }

    /// Pairwise-sum another shard into this one.
    pub fn merge(&mut self, other: Contribution) {
        for (entry, row) in other.rows {
            let target = self.rows.entry(entry).or_default();
            for (key, value) in row {
                *target.entry(key).or_insert(0.0) += value;
            }
        }
    }

    /// Scale each entry's row so its maximum becomes 1.
    ///
    /// Rows whose maximum is zero (or empty rows) are left untouched —
    /// never divide by zero.
    pub fn normalise(&mut self) {
        for row in self.rows.values_mut() {
            let max = row.values().fold(0.0f32, |m, &v| m.max(v));
            if max > 0.0 {
                for value in row.values_mut() {
                    *value /= max;
                }
            }
        }
    }

    /// Weight the rows by entry population and sum them into a dense vector
    /// of length `len`.  Entries without a population contribute nothing.
    pub fn distribute(&self, populations: &FxHashMap<NodeId, f32>, len: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; len];
        // Sort rows by entry so the floating-point summation order is fixed.
        let mut entries: Vec<NodeId> = self.rows.keys().copied().collect();
        entries.sort_unstable();
        for entry in entries {
            let Some(&population) = populations.get(&entry) else {
                continue;
            };
            let row = &self.rows[&entry];
            let mut keys: Vec<u32> = row.keys().copied().collect();
            keys.sort_unstable();
            for key in keys {
                out[key as usize] += population * row[&key];
            }
        }
        out
    }

    pub fn row(&self, entry: NodeId) -> Option<&FxHashMap<u32, f32>> {
        self.rows.get(&entry)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
