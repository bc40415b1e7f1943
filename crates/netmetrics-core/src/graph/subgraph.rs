//! Induced subgraphs.
//!
//! An induced subgraph keeps a subset of vertices and only the edges whose
//! endpoints are both in that subset. The result is a new, independently
//! owned [`Graph`] whose vertex and edge tags are the parent's IDs, so
//! results computed on the subgraph map straight back to the parent.

use std::collections::HashMap;

use tracing::instrument;

use super::model::{EdgeId, Graph, VertexId};

impl<V, E> Graph<V, E> {
    /// Build the subgraph induced by `members`.
    ///
    /// Members that are not part of this graph are skipped. Vertices are
    /// inserted in ascending parent-ID order, so the subgraph's own IDs
    /// preserve the parent's relative order.
    #[must_use]
    #[instrument(skip(self, members), fields(members = members.len()))]
    pub fn induced_subgraph(&self, members: &[VertexId]) -> Graph<VertexId, EdgeId> {
        let mut kept: Vec<VertexId> = members
            .iter()
            .copied()
            .filter(|&v| self.contains_vertex(v))
            .collect();
        kept.sort_unstable();
        kept.dedup();

        let mut sub = Graph::with_capacity(self.directedness(), kept.len(), 0);
        let mut mapping: HashMap<VertexId, VertexId> = HashMap::with_capacity(kept.len());
        for &v in &kept {
            mapping.insert(v, sub.add_vertex(v));
        }

        for edge in self.edges() {
            let (Some(&a), Some(&b)) = (mapping.get(&edge.vertex1), mapping.get(&edge.vertex2))
            else {
                continue;
            };
            let added = sub.add_edge_with_direction(a, b, edge.directed, edge.id);
            debug_assert!(added.is_ok(), "subgraph endpoints are always local");
        }

        sub
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
