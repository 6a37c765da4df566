//! `forest-model` — per-arc attractiveness models.
//!
//! Two models turn entry-point popularity into per-arc attractiveness:
//!
//! - **Flooding** ([`FloodingModel`]): one bounded search per entry spreads
//!   the entry's visitors over every reachable node, discounted by distance
//!   and the duration-tolerance profile.
//! - **Via-Edge** ([`ViaEdgeModel`]): for every unordered forest edge, two
//!   bounded searches enumerate the entry-to-entry round trips passing
//!   through that edge.  The expensive one, parallelised with rayon.
//!
//! Both accumulate a sparse [`Contribution`] tensor, normalise it per entry,
//! and weight it with the entry populations.
//!
//! | Module         | Contents                                             |
//! |----------------|------------------------------------------------------|
//! | [`model`]      | `AttractivenessModel` trait, `ModelInputs`, dispatch |
//! | [`contribution`] | Sparse entry-major accumulator                     |
//! | [`flooding`]   | The Flooding model                                   |
//! | [`via_edge`]   | The Via-Edge model                                   |
//! | [`error`]      | `ModelError`, `ModelResult<T>`                       |

pub mod contribution;
pub mod error;
pub mod flooding;
pub mod model;
pub mod via_edge;


pub use contribution::Contribution;
pub use error::{ModelError, ModelResult};
pub use flooding::FloodingModel;
pub use model::{Approach, AttractivenessModel, ModelInputs, compute_attractiveness};
pub use via_edge::ViaEdgeModel;
