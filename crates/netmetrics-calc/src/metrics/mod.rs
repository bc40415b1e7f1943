//! Per-vertex and whole-graph metric calculators.
//!
//! # Overview
//!
//! Each submodule pairs a typed free function (scores keyed by
//! [`VertexId`](netmetrics_core::VertexId)) with a calculator that turns
//! those scores into named columns:
//!
//! - **Brandes** (`brandes`): betweenness and closeness centrality.
//! - **Clustering coefficient** (`clustering`): how close each vertex's
//!   neighborhood is to a clique.
//! - **Eigenvector centrality** (`eigenvector`) and **PageRank**
//!   (`pagerank`): power-iteration importance scores.
//! - **Degree** (`degree`): in-, out- and total degree.
//! - **Reciprocity** (`reciprocity`): mutual links in directed graphs.
//! - **Components** (`components`): weak and strong partitions.
//! - **Overall** (`overall`): vertex/edge counts, density, component and
//!   geodesic summaries.
//!
//! Traversal-based metrics read the context's
//! [`DenseIndex`](netmetrics_core::DenseIndex), so self-loops and parallel
//! edges never affect path structure. Counting metrics (degree, overall)
//! walk the raw edges.

pub mod brandes;
pub mod clustering;
pub mod components;
pub mod degree;
pub mod eigenvector;
pub mod geodesic;
pub mod overall;
pub mod pagerank;
pub mod paths;
pub mod reciprocity;
