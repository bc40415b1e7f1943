//! Graph abstraction consumed by every calculator.
//!
//! - [`model`]: the [`Graph`] container, identities and adjacency queries.
//! - [`duplicates`]: duplicate-edge and self-loop detection.
//! - [`dense`]: dense `0..V` vertex remapping with flat adjacency lists.
//! - [`subgraph`]: induced subgraphs as new, independently owned graphs.

pub mod dense;
pub mod duplicates;
pub mod model;
pub mod subgraph;

pub use dense::DenseIndex;
pub use duplicates::{DuplicateEdgeReport, EdgeKey};
pub use model::{Directedness, Edge, EdgeId, Graph, GraphId, VertexId};
