//! User duration preferences.
//!
//! # Model
//!
//! A survey gives, for each duration interval, the share of visitors whose
//! preferred round-trip duration falls into that interval.  The table is a
//! right-continuous step function over strictly increasing upper bounds:
//! `share_at(t)` reads the bucket containing `t`, and `tail_share_at(t)`
//! sums every bucket at or past `t` — the fraction of visitors still happy
//! with a trip of duration `t` or longer.
//!
//! The last upper bound doubles as the search radius of every bounded
//! shortest-path query, so a lookup past it indicates corrupt input or a
//! broken cost limit and panics.

use crate::error::{CoreError, CoreResult};

/// Tolerance when checking that the shares sum to at most 1.
const SHARE_SUM_EPS: f32 = 1e-6;

/// Piecewise-constant user-share-by-duration function.
///
/// Construction validates the table once; lookups are then panic-on-overrun
/// binary searches.
#[derive(Debug, Clone)]
pub struct Preferences {
    /// Strictly increasing interval upper bounds.
    upper_bounds: Vec<f32>,
    /// Per-bucket user share, each in `[0, 1]`, summing to at most 1.
    shares: Vec<f32>,
    /// Suffix sums of `shares`: `tail[i] = shares[i..].sum()`.
    tail: Vec<f32>,
}

impl Preferences {
    /// Build and validate a preference table.
    pub fn new(upper_bounds: Vec<f32>, shares: Vec<f32>) -> CoreResult<Self> {
        if upper_bounds.is_empty() {
            return Err(CoreError::EmptyPreferences);
        }
        if upper_bounds.len() != shares.len() {
            return Err(CoreError::ColumnMismatch {
                bounds: upper_bounds.len(),
                shares: shares.len(),
            });
        }
        for w in upper_bounds.windows(2) {
            if w[1] <= w[0] {
                return Err(CoreError::BoundsNotIncreasing(w[1], w[0]));
            }
        }
        let mut sum = 0.0f32;
        for &s in &shares {
            if !(0.0..=1.0).contains(&s) {
                return Err(CoreError::ShareOutOfRange(s));
            }
            sum += s;
        }
        if sum > 1.0 + SHARE_SUM_EPS {
            return Err(CoreError::ShareSumExceedsOne(sum));
        }

        let mut tail = shares.clone();
        for i in (0..tail.len().saturating_sub(1)).rev() {
            tail[i] += tail[i + 1];
        }
        Ok(Self { upper_bounds, shares, tail })
    }

    /// Return a copy with every upper bound multiplied by `factor`.
    ///
    /// Input tables carry bounds in minutes; the pipeline works in seconds
    /// (`scaled(60.0)`), and cycling bounds are walking bounds times the
    /// speed factor.
    pub fn scaled(&self, factor: f32) -> Preferences {
        Preferences {
            upper_bounds: self.upper_bounds.iter().map(|b| b * factor).collect(),
            shares: self.shares.clone(),
            tail: self.tail.clone(),
        }
    }

    /// Index of the bucket containing duration `t`.
    ///
    /// # Panics
    /// Panics when `t` exceeds the last upper bound.
    #[inline]
    pub fn bucket_of(&self, t: f32) -> usize {
        assert!(
            t <= self.max_bound(),
            "duration {t} beyond preference table (max {})",
            self.max_bound()
        );
        self.upper_bounds.partition_point(|&b| b < t)
    }

    /// Share of users whose preferred duration falls in `t`'s bucket.
    #[inline]
    pub fn share_at(&self, t: f32) -> f32 {
        self.shares[self.bucket_of(t)]
    }

    /// Share of users happy with a duration of `t` or longer.
    ///
    /// Non-increasing in `t`; `tail_share_at(0.0)` is the total share.
    #[inline]
    pub fn tail_share_at(&self, t: f32) -> f32 {
        self.tail[self.bucket_of(t)]
    }

    pub fn num_buckets(&self) -> usize {
        self.upper_bounds.len()
    }

    pub fn upper_bounds(&self) -> &[f32] {
        &self.upper_bounds
    }

    pub fn shares(&self) -> &[f32] {
        &self.shares
    }

    /// Suffix sums of the shares, indexed by bucket.
    pub fn tail_shares(&self) -> &[f32] {
        &self.tail
    }

    /// The last upper bound — the maximum tolerated duration, and therefore
    /// the cost limit of every bounded search.  The table is never empty.
    #[inline]
    pub fn max_bound(&self) -> f32 {
        self.upper_bounds[self.upper_bounds.len() - 1]
    }
}
