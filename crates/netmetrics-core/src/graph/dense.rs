//! Dense `0..V` remapping of vertex identity.
//!
//! Calculators keep their scratch state (distances, path counts, scores) in
//! flat `Vec`s indexed by a vertex's dense position instead of hash maps
//! keyed by [`VertexId`]. [`DenseIndex`] owns that remapping plus flat
//! adjacency lists, built once per run:
//!
//! - `successors[i]`: positions reachable over one edge leaving `i`
//!   (undirected edges count both ways).
//! - `predecessors[i]`: positions with an edge leading into `i`.
//! - `neighbors[i]`: positions sharing any edge with `i`, ignoring
//!   direction.
//!
//! All lists are sorted, deduplicated, and exclude `i` itself, so parallel
//! edges and self-loops never reach the traversal code.

use tracing::instrument;

use super::model::{Graph, VertexId};

/// Dense vertex positions and flat adjacency for one graph snapshot.
#[derive(Debug, Clone, Default)]
pub struct DenseIndex {
    vertices: Vec<VertexId>,
    slots: Vec<Option<usize>>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    neighbors: Vec<Vec<usize>>,
    directed_edges: usize,
}

impl DenseIndex {
    /// Build the index for `graph`.
    #[must_use]
    #[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn build<V, E>(graph: &Graph<V, E>) -> Self {
        let vertices: Vec<VertexId> = graph.vertices().collect();
        let n = vertices.len();

        let slot_bound = vertices
            .iter()
            .map(|v| v.index() as usize + 1)
            .max()
            .unwrap_or(0);
        let mut slots = vec![None; slot_bound];
        for (pos, v) in vertices.iter().enumerate() {
            slots[v.index() as usize] = Some(pos);
        }

        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        let mut neighbors = vec![Vec::new(); n];
        let mut directed_edges = 0;

        for edge in graph.edges() {
            if edge.is_self_loop() {
                continue;
            }
            let (Some(p1), Some(p2)) = (
                slots[edge.vertex1.index() as usize],
                slots[edge.vertex2.index() as usize],
            ) else {
                continue;
            };

            successors[p1].push(p2);
            predecessors[p2].push(p1);
            if edge.directed {
                directed_edges += 1;
            } else {
                successors[p2].push(p1);
                predecessors[p1].push(p2);
            }
            neighbors[p1].push(p2);
            neighbors[p2].push(p1);
        }

        for list in successors
            .iter_mut()
            .chain(predecessors.iter_mut())
            .chain(neighbors.iter_mut())
        {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            vertices,
            slots,
            successors,
            predecessors,
            neighbors,
            directed_edges,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex at dense position `pos`.
    #[must_use]
    pub fn vertex(&self, pos: usize) -> VertexId {
        self.vertices[pos]
    }

    /// All vertices in dense order.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Dense position of `vertex`, if it was present when the index was built.
    #[must_use]
    pub fn position(&self, vertex: VertexId) -> Option<usize> {
        self.slots
            .get(vertex.index() as usize)
            .copied()
            .flatten()
            .filter(|&pos| self.vertices[pos] == vertex)
    }

    #[must_use]
    pub fn successors(&self, pos: usize) -> &[usize] {
        &self.successors[pos]
    }

    #[must_use]
    pub fn predecessors(&self, pos: usize) -> &[usize] {
        &self.predecessors[pos]
    }

    #[must_use]
    pub fn neighbors(&self, pos: usize) -> &[usize] {
        &self.neighbors[pos]
    }

    /// `true` when no non-loop edge is directed, so `successors` and
    /// `predecessors` both equal `neighbors`.
    #[must_use]
    pub const fn is_symmetric(&self) -> bool {
        self.directed_edges == 0
    }

    /// Whether `from` has an edge leading to `to`.
    #[must_use]
    pub fn leads(&self, from: usize, to: usize) -> bool {
        self.successors[from].binary_search(&to).is_ok()
    }

    /// Whether `a` and `b` share an edge in either direction.
    #[must_use]
    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].binary_search(&b).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
