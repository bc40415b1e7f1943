//! Duplicate-edge and self-loop detection.
//!
//! Two edges are duplicates when they connect the same vertices the same
//! way: directed edges match on the ordered `(vertex1, vertex2)` pair,
//! undirected edges on the unordered pair. A directed and an undirected
//! edge between the same vertices are never duplicates of each other.
//!
//! The report is computed once per run and shared read-only by every
//! calculator that needs to flag its output as suspect.

use std::collections::HashMap;

use tracing::instrument;

use super::model::{Edge, EdgeId, Graph, VertexId};

/// Key identifying a set of mutually duplicate edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub low: VertexId,
    pub high: VertexId,
    pub directed: bool,
}

impl EdgeKey {
    /// Build the duplicate-detection key for `edge`.
    #[must_use]
    pub fn of(edge: &Edge) -> Self {
        if edge.directed || edge.vertex1 <= edge.vertex2 {
            Self {
                low: edge.vertex1,
                high: edge.vertex2,
                directed: edge.directed,
            }
        } else {
            Self {
                low: edge.vertex2,
                high: edge.vertex1,
                directed: false,
            }
        }
    }
}

/// Duplicate-edge and self-loop counts for one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateEdgeReport {
    /// Edges that share their key with no other edge.
    pub unique_edges: usize,
    /// Edges that share their key with at least one other edge.
    pub edges_with_duplicates: usize,
    /// Number of distinct keys (the edge count after merging duplicates).
    pub distinct_edges: usize,
    /// Edges whose endpoints are the same vertex.
    pub self_loops: usize,
    duplicated: Vec<EdgeId>,
}

impl DuplicateEdgeReport {
    /// Scan every edge of `graph` once.
    #[must_use]
    #[instrument(skip(graph), fields(edges = graph.edge_count()))]
    pub fn detect<V, E>(graph: &Graph<V, E>) -> Self {
        let mut groups: HashMap<EdgeKey, Vec<EdgeId>> = HashMap::new();
        let mut self_loops = 0;

        for edge in graph.edges() {
            if edge.is_self_loop() {
                self_loops += 1;
            }
            groups.entry(EdgeKey::of(&edge)).or_default().push(edge.id);
        }

        let mut unique_edges = 0;
        let mut duplicated = Vec::new();
        for members in groups.values() {
            if members.len() == 1 {
                unique_edges += 1;
            } else {
                duplicated.extend_from_slice(members);
            }
        }
        duplicated.sort_unstable();

        Self {
            unique_edges,
            edges_with_duplicates: duplicated.len(),
            distinct_edges: groups.len(),
            self_loops,
            duplicated,
        }
    }

    /// `true` when at least one pair of duplicate edges exists.
    #[must_use]
    pub const fn has_duplicates(&self) -> bool {
        self.edges_with_duplicates > 0
    }

    /// Total edges counted by this report.
    #[must_use]
    pub const fn total_edges(&self) -> usize {
        self.unique_edges + self.edges_with_duplicates
    }

    /// Whether `edge` has at least one duplicate.
    #[must_use]
    pub fn is_duplicated(&self, edge: EdgeId) -> bool {
        self.duplicated.binary_search(&edge).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
