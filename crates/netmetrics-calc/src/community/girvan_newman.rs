//! Divisive community detection by edge betweenness.
//!
//! # Algorithm
//!
//! Girvan & Newman (2002), made greedy on modularity:
//!
//! 1. Start from the weakly connected components.
//! 2. For a community, build its induced subgraph and repeatedly remove the
//!    edge with the highest betweenness until the subgraph falls apart.
//! 3. Keep the split if it raises the modularity of the whole partition and
//!    try to split both halves again; otherwise the community is final.
//!
//! Edges are read without direction, parallel edges collapse and
//! self-loops are ignored. Each removal recomputes edge betweenness from
//! scratch, so this is O(m^2 n) per split and meant for small graphs.

use std::collections::BTreeMap;

use netmetrics_core::{CalculationContext, DenseIndex, Graph, Outcome, VertexId};
use tracing::{debug, instrument};

use super::modularity::modularity;
use crate::metrics::components::connected_components;
use crate::metrics::paths::ShortestPathTree;

const LABEL: &str = "Calculating clusters";

/// Gains smaller than this are treated as no gain.
const MIN_GAIN: f64 = 1e-12;

/// Community label for every dense position of the context's graph.
#[instrument(skip(graph, ctx), fields(graph = %graph.id()))]
pub fn girvan_newman<V, E>(
    graph: &Graph<V, E>,
    ctx: &CalculationContext<'_>,
) -> Outcome<Vec<usize>> {
    let index = ctx.index();
    let n = index.len();
    let edge_budget: usize = (0..n).map(|v| index.neighbors(v).len()).sum::<usize>() / 2;

    let mut labels = vec![0usize; n];
    let components = connected_components(index);
    for (label, members) in components.iter().enumerate() {
        for &v in members {
            if let Some(pos) = index.position(v) {
                labels[pos] = label;
            }
        }
    }
    let mut next_label = components.len();
    let mut pending: Vec<usize> = (0..components.len()).rev().collect();
    let mut current = modularity(index, &labels);
    let mut removals = 0usize;

    while let Some(label) = pending.pop() {
        let members: Vec<VertexId> = (0..n)
            .filter(|&v| labels[v] == label)
            .map(|v| index.vertex(v))
            .collect();
        if members.len() < 2 {
            continue;
        }

        let sub = graph.induced_subgraph(&members);
        let sub_index = DenseIndex::build(&sub);
        let split = netmetrics_core::completed_or_return!(split_once(
            &sub_index,
            ctx,
            &mut removals,
            edge_budget
        ));
        let Some(detached) = split else {
            continue;
        };

        let mut trial = labels.clone();
        for pos in detached {
            let parent = sub
                .vertex_tag(sub_index.vertex(pos))
                .and_then(|&v| index.position(v));
            if let Some(parent) = parent {
                trial[parent] = next_label;
            }
        }

        let q = modularity(index, &trial);
        if q > current + MIN_GAIN {
            debug!(label, new_label = next_label, modularity = q, "accepted split");
            labels = trial;
            current = q;
            pending.push(next_label);
            pending.push(label);
            next_label += 1;
        }
    }

    Outcome::Completed(labels)
}

/// Remove highest-betweenness edges from a connected graph until it splits.
///
/// Returns the positions that ended up apart from position 0, or `None` if
/// the graph has no edges to remove.
fn split_once(
    index: &DenseIndex,
    ctx: &CalculationContext<'_>,
    removals: &mut usize,
    budget: usize,
) -> Outcome<Option<Vec<usize>>> {
    let n = index.len();
    let mut adjacency: Vec<Vec<usize>> = (0..n).map(|v| index.neighbors(v).to_vec()).collect();
    let mut tree = ShortestPathTree::new(n);

    loop {
        if ctx.step_checkpoint(*removals, budget, LABEL) {
            return Outcome::Cancelled;
        }
        let Some((a, b)) = busiest_edge(&adjacency, &mut tree) else {
            return Outcome::Completed(None);
        };
        adjacency[a].retain(|&x| x != b);
        adjacency[b].retain(|&x| x != a);
        *removals += 1;

        tree.grow(adjacency.as_slice(), 0);
        if tree.order().len() < n {
            let mut reached = vec![false; n];
            for &v in tree.order() {
                reached[v] = true;
            }
            let detached = (0..n).filter(|&v| !reached[v]).collect();
            return Outcome::Completed(Some(detached));
        }
    }
}

/// The edge with the highest shortest-path betweenness, as `(low, high)`.
/// Ties go to the lowest pair.
fn busiest_edge(
    adjacency: &[Vec<usize>],
    tree: &mut ShortestPathTree,
) -> Option<(usize, usize)> {
    let n = adjacency.len();
    let mut betweenness: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut delta = vec![0.0_f64; n];

    for s in 0..n {
        tree.grow(adjacency, s);
        for &v in tree.order() {
            delta[v] = 0.0;
        }
        for &w in tree.order().iter().rev() {
            let coefficient = (1.0 + delta[w]) / tree.path_count(w);
            for &v in tree.predecessors(w) {
                let flow = tree.path_count(v) * coefficient;
                *betweenness.entry((v.min(w), v.max(w))).or_default() += flow;
                delta[v] += flow;
            }
        }
    }

    let mut best: Option<(f64, (usize, usize))> = None;
    for (&edge, &score) in &betweenness {
        if best.is_none_or(|(top, _)| score > top + MIN_GAIN) {
            best = Some((score, edge));
        }
    }
    best.map(|(_, edge)| edge)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
