//! In-memory graph with stable vertex/edge identities.
//!
//! # Overview
//!
//! [`Graph`] wraps a [`petgraph`] `StableDiGraph` so vertex and edge indices
//! stay valid across removals. Every edge is stored as `vertex1 → vertex2`;
//! undirected edges carry `directed = false` and are traversed both ways by
//! the adjacency queries.
//!
//! ## Identity
//!
//! Each graph instance draws a process-unique [`GraphId`]. Vertex and edge
//! IDs embed it, so handing a vertex from one graph to another is rejected
//! with [`GraphError::ForeignVertex`].
//!
//! `StableDiGraph` hands freed slots to later insertions. Each slot carries a
//! generation that is bumped when its occupant is removed, and IDs record the
//! generation they were issued under. A stale ID therefore never names the
//! vertex or edge that took over its slot: lookups report it as missing.
//!
//! ## Tags
//!
//! Vertices carry a caller-owned tag `V` and edges a tag `E`. The metrics
//! code never looks inside them; they exist so callers can correlate results
//! with their own rows.

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::{
    Direction,
    stable_graph::{EdgeIndex, NodeIndex, StableDiGraph},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Process-unique identity of one [`Graph`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Stable vertex identity, unique within its owning graph.
///
/// Ordering follows slot order within one graph. Without removals that is
/// insertion order; a vertex that reuses a freed slot sorts by that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    graph: GraphId,
    index: u32,
    generation: u32,
}

impl VertexId {
    /// The graph this vertex belongs to.
    #[must_use]
    pub const fn graph(self) -> GraphId {
        self.graph
    }

    /// Raw slot number inside the owning graph.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    fn node(self) -> NodeIndex {
        NodeIndex::new(self.index as usize)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.index)
    }
}

/// Stable edge identity, unique within its owning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    graph: GraphId,
    index: u32,
    generation: u32,
}

impl EdgeId {
    /// Raw slot number inside the owning graph.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    fn edge(self) -> EdgeIndex {
        EdgeIndex::new(self.index as usize)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.index)
    }
}

// ---------------------------------------------------------------------------
// Directedness
// ---------------------------------------------------------------------------

/// Directedness of a whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directedness {
    /// Every edge is undirected.
    Undirected,
    /// Every edge is directed.
    Directed,
    /// Each edge carries its own directed flag.
    Mixed,
}

impl Directedness {
    /// Whether an edge with the given flag may be added to a graph of this kind.
    #[must_use]
    pub const fn accepts(self, directed: bool) -> bool {
        match self {
            Self::Undirected => !directed,
            Self::Directed => directed,
            Self::Mixed => true,
        }
    }
}

impl fmt::Display for Directedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undirected => "undirected",
            Self::Directed => "directed",
            Self::Mixed => "mixed",
        })
    }
}

// ---------------------------------------------------------------------------
// Edge view
// ---------------------------------------------------------------------------

/// A snapshot of one edge's endpoints and direction.
///
/// For directed edges `vertex1` is the back (source) vertex and `vertex2`
/// the front (destination) vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub id: EdgeId,
    pub vertex1: VertexId,
    pub vertex2: VertexId,
    pub directed: bool,
}

impl Edge {
    /// `true` when both endpoints are the same vertex.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.vertex1 == self.vertex2
    }

    /// The endpoint opposite `v`. For a self-loop this is `v` itself.
    #[must_use]
    pub fn other(&self, v: VertexId) -> VertexId {
        if self.vertex1 == v {
            self.vertex2
        } else {
            self.vertex1
        }
    }

    /// Whether this edge can be followed from `from` to `to`.
    #[must_use]
    pub fn leads(&self, from: VertexId, to: VertexId) -> bool {
        (self.vertex1 == from && self.vertex2 == to)
            || (!self.directed && self.vertex2 == from && self.vertex1 == to)
    }
}

#[derive(Debug, Clone)]
struct EdgeData<E> {
    directed: bool,
    tag: E,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An in-memory graph that may contain self-loops and parallel edges.
///
/// Owned and mutated by the caller; calculators only borrow it.
#[derive(Debug)]
pub struct Graph<V = (), E = ()> {
    id: GraphId,
    directedness: Directedness,
    inner: StableDiGraph<V, EdgeData<E>>,
    // Per-slot generation counters, indexed like `inner`'s node and edge slots.
    vertex_generations: Vec<u32>,
    edge_generations: Vec<u32>,
}

impl<V, E> Graph<V, E> {
    /// Create an empty graph.
    #[must_use]
    pub fn new(directedness: Directedness) -> Self {
        Self::with_capacity(directedness, 0, 0)
    }

    /// Create an empty graph with room for `vertices` and `edges`.
    #[must_use]
    pub fn with_capacity(directedness: Directedness, vertices: usize, edges: usize) -> Self {
        Self {
            id: GraphId::next(),
            directedness,
            inner: StableDiGraph::with_capacity(vertices, edges),
            vertex_generations: Vec::with_capacity(vertices),
            edge_generations: Vec::with_capacity(edges),
        }
    }

    #[must_use]
    pub const fn id(&self) -> GraphId {
        self.id
    }

    #[must_use]
    pub const fn directedness(&self) -> Directedness {
        self.directedness
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    // -- mutation -----------------------------------------------------------

    /// Insert a vertex carrying `tag` and return its new ID.
    pub fn add_vertex(&mut self, tag: V) -> VertexId {
        let node = self.inner.add_node(tag);
        claim_slot(&mut self.vertex_generations, node.index());
        self.vertex_id(node)
    }

    /// Connect two vertices using the graph's natural direction.
    ///
    /// Directed graphs get a directed edge; undirected and mixed graphs get
    /// an undirected one. Use [`Graph::add_edge_with_direction`] to add a
    /// directed edge to a mixed graph.
    ///
    /// # Errors
    ///
    /// Fails if either vertex belongs to a different graph or is no longer
    /// present.
    pub fn add_edge(
        &mut self,
        vertex1: VertexId,
        vertex2: VertexId,
        tag: E,
    ) -> Result<EdgeId, GraphError> {
        let directed = self.directedness == Directedness::Directed;
        self.add_edge_with_direction(vertex1, vertex2, directed, tag)
    }

    /// Connect two vertices with an explicit directed flag.
    ///
    /// # Errors
    ///
    /// Fails on a foreign or missing vertex, or when `directed` conflicts
    /// with the graph's [`Directedness`].
    pub fn add_edge_with_direction(
        &mut self,
        vertex1: VertexId,
        vertex2: VertexId,
        directed: bool,
        tag: E,
    ) -> Result<EdgeId, GraphError> {
        self.check_vertex(vertex1)?;
        self.check_vertex(vertex2)?;
        if !self.directedness.accepts(directed) {
            return Err(GraphError::DirectednessMismatch {
                graph: self.directedness,
                directed,
            });
        }
        let edge = self
            .inner
            .add_edge(vertex1.node(), vertex2.node(), EdgeData { directed, tag });
        claim_slot(&mut self.edge_generations, edge.index());
        Ok(self.edge_id(edge))
    }

    /// Remove a vertex and every edge incident to it, returning its tag.
    ///
    /// # Errors
    ///
    /// Fails on a foreign or missing vertex.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<V, GraphError> {
        self.check_vertex(vertex)?;
        let incident: Vec<EdgeIndex> = self
            .inner
            .edges_directed(vertex.node(), Direction::Outgoing)
            .chain(self.inner.edges_directed(vertex.node(), Direction::Incoming))
            .map(|e| e.id())
            .collect();
        let tag = self
            .inner
            .remove_node(vertex.node())
            .ok_or(GraphError::VertexNotFound(vertex))?;
        retire_slot(&mut self.vertex_generations, vertex.node().index());
        for edge in incident {
            retire_slot(&mut self.edge_generations, edge.index());
        }
        Ok(tag)
    }

    /// Remove a single edge, returning its tag.
    ///
    /// # Errors
    ///
    /// Fails when the edge is not part of this graph.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<E, GraphError> {
        if !self.is_current_edge(edge) {
            return Err(GraphError::EdgeNotFound(edge));
        }
        let tag = self
            .inner
            .remove_edge(edge.edge())
            .map(|data| data.tag)
            .ok_or(GraphError::EdgeNotFound(edge))?;
        retire_slot(&mut self.edge_generations, edge.edge().index());
        Ok(tag)
    }

    // -- lookup -------------------------------------------------------------

    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        vertex.graph == self.id
            && self.inner.contains_node(vertex.node())
            && generation_of(&self.vertex_generations, vertex.node().index()) == vertex.generation
    }

    #[must_use]
    pub fn vertex_tag(&self, vertex: VertexId) -> Option<&V> {
        if !self.contains_vertex(vertex) {
            return None;
        }
        self.inner.node_weight(vertex.node())
    }

    pub fn vertex_tag_mut(&mut self, vertex: VertexId) -> Option<&mut V> {
        if !self.contains_vertex(vertex) {
            return None;
        }
        self.inner.node_weight_mut(vertex.node())
    }

    #[must_use]
    pub fn edge_tag(&self, edge: EdgeId) -> Option<&E> {
        if !self.is_current_edge(edge) {
            return None;
        }
        self.inner.edge_weight(edge.edge()).map(|data| &data.tag)
    }

    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<Edge> {
        if !self.is_current_edge(edge) {
            return None;
        }
        self.edge_at(edge.edge())
    }

    /// All vertices in slot order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.inner.node_indices().map(|node| self.vertex_id(node))
    }

    /// All edges in slot order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.inner.edge_indices().filter_map(|edge| self.edge_at(edge))
    }

    // -- adjacency ----------------------------------------------------------

    /// Every edge touching `vertex`. A self-loop appears once.
    pub fn incident_edges(&self, vertex: VertexId) -> impl Iterator<Item = Edge> + '_ {
        let node = if self.contains_vertex(vertex) {
            vertex.node()
        } else {
            NodeIndex::end()
        };
        let outgoing = self.inner.edges_directed(node, Direction::Outgoing);
        let incoming = self
            .inner
            .edges_directed(node, Direction::Incoming)
            .filter(|e| e.source() != e.target());
        outgoing
            .chain(incoming)
            .filter_map(|e| self.edge_at(e.id()))
    }

    /// Edges that can be followed away from `vertex`: directed edges whose
    /// back vertex is `vertex`, plus every incident undirected edge.
    pub fn outgoing_edges(&self, vertex: VertexId) -> impl Iterator<Item = Edge> + '_ {
        self.incident_edges(vertex)
            .filter(move |e| !e.directed || e.vertex1 == vertex)
    }

    /// Edges that can be followed into `vertex`: directed edges whose front
    /// vertex is `vertex`, plus every incident undirected edge.
    pub fn incoming_edges(&self, vertex: VertexId) -> impl Iterator<Item = Edge> + '_ {
        self.incident_edges(vertex)
            .filter(move |e| !e.directed || e.vertex2 == vertex)
    }

    /// Distinct vertices reachable over one outgoing edge (sorted).
    #[must_use]
    pub fn successor_vertices(&self, vertex: VertexId) -> Vec<VertexId> {
        collect_distinct(self.outgoing_edges(vertex).map(|e| e.other(vertex)))
    }

    /// Distinct vertices with an edge leading into `vertex` (sorted).
    #[must_use]
    pub fn predecessor_vertices(&self, vertex: VertexId) -> Vec<VertexId> {
        collect_distinct(self.incoming_edges(vertex).map(|e| e.other(vertex)))
    }

    /// Distinct vertices sharing any edge with `vertex`, regardless of
    /// direction (sorted). Includes `vertex` itself if it has a self-loop.
    #[must_use]
    pub fn adjacent_vertices(&self, vertex: VertexId) -> Vec<VertexId> {
        collect_distinct(self.incident_edges(vertex).map(|e| e.other(vertex)))
    }

    /// Number of incident edges. A self-loop counts once.
    #[must_use]
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.incident_edges(vertex).count()
    }

    // -- internals ----------------------------------------------------------

    fn check_vertex(&self, vertex: VertexId) -> Result<(), GraphError> {
        if vertex.graph != self.id {
            return Err(GraphError::ForeignVertex {
                vertex,
                owner: vertex.graph,
                graph: self.id,
            });
        }
        if !self.contains_vertex(vertex) {
            return Err(GraphError::VertexNotFound(vertex));
        }
        Ok(())
    }

    fn is_current_edge(&self, edge: EdgeId) -> bool {
        edge.graph == self.id
            && generation_of(&self.edge_generations, edge.edge().index()) == edge.generation
    }

    fn vertex_id(&self, node: NodeIndex) -> VertexId {
        VertexId {
            graph: self.id,
            index: slot(node.index()),
            generation: generation_of(&self.vertex_generations, node.index()),
        }
    }

    fn edge_id(&self, edge: EdgeIndex) -> EdgeId {
        EdgeId {
            graph: self.id,
            index: slot(edge.index()),
            generation: generation_of(&self.edge_generations, edge.index()),
        }
    }

    fn edge_at(&self, edge: EdgeIndex) -> Option<Edge> {
        let (a, b) = self.inner.edge_endpoints(edge)?;
        let data = self.inner.edge_weight(edge)?;
        Some(Edge {
            id: self.edge_id(edge),
            vertex1: self.vertex_id(a),
            vertex2: self.vertex_id(b),
            directed: data.directed,
        })
    }
}

// petgraph's default index type is u32, so slot numbers always fit.
#[allow(clippy::cast_possible_truncation)]
const fn slot(index: usize) -> u32 {
    index as u32
}

fn generation_of(generations: &[u32], index: usize) -> u32 {
    generations.get(index).copied().unwrap_or(0)
}

/// Give slot `index` a counter once petgraph hands it out.
fn claim_slot(generations: &mut Vec<u32>, index: usize) {
    if generations.len() <= index {
        generations.resize(index + 1, 0);
    }
}

fn retire_slot(generations: &mut [u32], index: usize) {
    if let Some(generation) = generations.get_mut(index) {
        *generation = generation.wrapping_add(1);
    }
}

fn collect_distinct(iter: impl Iterator<Item = VertexId>) -> Vec<VertexId> {
    let mut out: Vec<VertexId> = iter.collect();
    out.sort_unstable();
    out.dedup();
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
