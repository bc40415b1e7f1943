//! Single-source shortest-path trees over unweighted adjacency.
//!
//! Brandes centrality, geodesic distances and Girvan-Newman edge betweenness
//! all start from the same breadth-first search: distances, shortest-path
//! counts and predecessor lists from one source, plus the order in which
//! vertices were settled. [`ShortestPathTree`] owns that scratch state so
//! one allocation serves every source of a run.

use std::collections::VecDeque;

use netmetrics_core::DenseIndex;

/// Anything that can list the dense positions one hop out of a position.
pub trait Adjacency {
    fn vertex_count(&self) -> usize;
    fn successors(&self, pos: usize) -> &[usize];
}

impl Adjacency for DenseIndex {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn successors(&self, pos: usize) -> &[usize] {
        Self::successors(self, pos)
    }
}

impl Adjacency for [Vec<usize>] {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn successors(&self, pos: usize) -> &[usize] {
        &self[pos]
    }
}

const UNREACHED: u32 = u32::MAX;

/// BFS scratch reused across sources.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    dist: Vec<u32>,
    sigma: Vec<f64>,
    predecessors: Vec<Vec<usize>>,
    order: Vec<usize>,
    queue: VecDeque<usize>,
}

impl ShortestPathTree {
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            dist: vec![UNREACHED; n],
            sigma: vec![0.0; n],
            predecessors: vec![Vec::new(); n],
            order: Vec::with_capacity(n),
            queue: VecDeque::with_capacity(n),
        }
    }

    /// Replace the current tree with the one rooted at `source`.
    pub fn grow(&mut self, adjacency: &(impl Adjacency + ?Sized), source: usize) {
        // Only vertices touched by the previous search need resetting.
        for &v in &self.order {
            self.dist[v] = UNREACHED;
            self.sigma[v] = 0.0;
            self.predecessors[v].clear();
        }
        self.order.clear();
        self.queue.clear();

        self.dist[source] = 0;
        self.sigma[source] = 1.0;
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            self.order.push(v);
            let next = self.dist[v] + 1;
            for &w in adjacency.successors(v) {
                if self.dist[w] == UNREACHED {
                    self.dist[w] = next;
                    self.queue.push_back(w);
                }
                if self.dist[w] == next {
                    self.sigma[w] += self.sigma[v];
                    self.predecessors[w].push(v);
                }
            }
        }
    }

    /// Vertices reached from the source, in non-decreasing distance order.
    /// The source comes first.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn distance(&self, v: usize) -> Option<u32> {
        (self.dist[v] != UNREACHED).then_some(self.dist[v])
    }

    /// Number of distinct shortest paths from the source to `v`.
    #[must_use]
    pub fn path_count(&self, v: usize) -> f64 {
        self.sigma[v]
    }

    #[must_use]
    pub fn predecessors(&self, v: usize) -> &[usize] {
        &self.predecessors[v]
    }

    /// Sum of distances to every reached vertex.
    #[must_use]
    pub fn total_distance(&self) -> u64 {
        self.order.iter().map(|&v| u64::from(self.dist[v])).sum()
    }

    /// Distance to the farthest reached vertex.
    #[must_use]
    pub fn eccentricity(&self) -> u32 {
        self.order.last().map_or(0, |&v| self.dist[v])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
