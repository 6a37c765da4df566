//! `forest-core` — foundational types for the forest recreation analytics
//! pipeline.
//!
//! This crate is a dependency of every other `forest-*` crate.  It
//! intentionally has no `forest-*` dependencies and minimal external ones
//! (only `log` and `thiserror`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `ArcId`, `Fid`                               |
//! | [`geo`]      | `GeoPos`, great-circle distance                        |
//! | [`prefs`]    | `Preferences` — the duration-tolerance step function   |
//! | [`progress`] | `Progress` — rate-limited progress reporting           |
//! | [`error`]    | `CoreError`, `CoreResult`                              |

pub mod error;
pub mod geo;
pub mod ids;
pub mod prefs;
pub mod progress;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPos;
pub use ids::{ArcId, Fid, NodeId};
pub use prefs::Preferences;
pub use progress::Progress;
