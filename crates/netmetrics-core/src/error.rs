use std::fmt;

use thiserror::Error;

use crate::graph::{Directedness, EdgeId, GraphId, VertexId};

/// Machine-readable error codes for callers that map failures onto their own
/// user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ForeignVertex,
    VertexNotFound,
    EdgeNotFound,
    DirectednessMismatch,
    ConfigParseError,
    WorkerSpawnFailed,
    WorkerPanicked,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ForeignVertex => "E1001",
            Self::VertexNotFound => "E1002",
            Self::EdgeNotFound => "E1003",
            Self::DirectednessMismatch => "E1004",
            Self::ConfigParseError => "E2001",
            Self::WorkerSpawnFailed => "E3001",
            Self::WorkerPanicked => "E3002",
        }
    }

    /// Short human-facing summary for logs.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ForeignVertex => "Vertex belongs to another graph",
            Self::VertexNotFound => "Vertex not found",
            Self::EdgeNotFound => "Edge not found",
            Self::DirectednessMismatch => "Edge directedness does not match graph",
            Self::ConfigParseError => "Metrics config parse error",
            Self::WorkerSpawnFailed => "Metrics worker could not be started",
            Self::WorkerPanicked => "Metrics worker panicked",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ForeignVertex => {
                Some("Add the vertex to this graph first; vertex IDs are not portable.")
            }
            Self::DirectednessMismatch => {
                Some("Use a mixed graph to combine directed and undirected edges.")
            }
            Self::ConfigParseError => Some("Fix the TOML syntax in the metrics config and retry."),
            Self::WorkerPanicked => Some("Retry once. If persistent, report a bug with logs."),
            Self::VertexNotFound | Self::EdgeNotFound | Self::WorkerSpawnFailed => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structural errors raised while building or mutating a [`crate::Graph`].
///
/// These are rejected before any calculator runs, so calculators can assume
/// a well-formed graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {vertex} belongs to graph {owner}, not graph {graph}")]
    ForeignVertex {
        vertex: VertexId,
        owner: GraphId,
        graph: GraphId,
    },

    #[error("vertex {0} is not in the graph")]
    VertexNotFound(VertexId),

    #[error("edge {0} is not in the graph")]
    EdgeNotFound(EdgeId),

    #[error("cannot add {} edge to {graph} graph", edge_kind(*directed))]
    DirectednessMismatch { graph: Directedness, directed: bool },
}

const fn edge_kind(directed: bool) -> &'static str {
    if directed { "directed" } else { "undirected" }
}

impl GraphError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ForeignVertex { .. } => ErrorCode::ForeignVertex,
            Self::VertexNotFound(_) => ErrorCode::VertexNotFound,
            Self::EdgeNotFound(_) => ErrorCode::EdgeNotFound,
            Self::DirectednessMismatch { .. } => ErrorCode::DirectednessMismatch,
        }
    }
}
