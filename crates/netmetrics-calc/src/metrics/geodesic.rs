//! Geodesic (shortest-path) distance statistics.
//!
//! A BFS from every vertex, following edge direction, yields the longest
//! shortest path (the diameter of the reachable part of the graph) and the
//! mean distance over all ordered pairs `(s, t)` with `s != t` and `t`
//! reachable from `s`.

use netmetrics_core::{CalculationContext, Outcome};
use tracing::instrument;

use super::paths::ShortestPathTree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicStats {
    /// `None` for a graph without vertices.
    pub max: Option<u32>,
    /// `None` when no vertex reaches another.
    pub average: Option<f64>,
}

#[instrument(skip(ctx), fields(graph = %ctx.graph_id()))]
pub fn geodesic_distances(ctx: &CalculationContext<'_>) -> Outcome<GeodesicStats> {
    let index = ctx.index();
    let n = index.len();
    if n == 0 {
        return Outcome::Completed(GeodesicStats {
            max: None,
            average: None,
        });
    }

    let mut tree = ShortestPathTree::new(n);
    let mut max = 0u32;
    let mut total = 0u64;
    let mut pairs = 0u64;

    for s in 0..n {
        if ctx.checkpoint(s, n, "Calculating geodesic distances") {
            return Outcome::Cancelled;
        }
        tree.grow(index, s);
        max = max.max(tree.eccentricity());
        total += tree.total_distance();
        pairs += (tree.order().len() - 1) as u64;
    }

    Outcome::Completed(GeodesicStats {
        max: Some(max),
        average: (pairs > 0).then(|| total as f64 / pairs as f64),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
