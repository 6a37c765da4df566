//! `forest-graph` — road network representation and search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`graph`]    | `RoadGraph` (offset list), `RoadGraphBuilder`, `Arc`      |
//! | [`text`]     | Whitespace-delimited graph file reader/writer             |
//! | [`search`]   | `Dijkstra` — reusable bounded single-source searches      |
//! | [`simplify`] | Degree-2 chain contraction with provenance tracking       |
//! | [`spatial`]  | R-tree snapping of `(x, y)` positions to node ids         |
//! | [`lcc`]      | Largest connected component, node-subset restriction      |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                            |

pub mod error;
pub mod graph;
pub mod lcc;
pub mod search;
pub mod simplify;
pub mod spatial;
pub mod text;


pub use error::{GraphError, GraphResult};
pub use graph::{Arc, RoadGraph, RoadGraphBuilder};
pub use search::{Dijkstra, INFINITY};
pub use simplify::{SimplifiedGraph, simplify};
pub use spatial::NodeIndex;
