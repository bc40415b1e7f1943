//! Betweenness and closeness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness measures how often a vertex lies on shortest paths between
//! other pairs of vertices. Closeness measures how near a vertex is to
//! everything it can reach. Both fall out of the same per-source BFS, so
//! they are computed together.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs:
//!
//! 1. For each source `s`, grow a [`ShortestPathTree`] over outgoing
//!    adjacency (undirected edges count both ways).
//! 2. Accumulate dependencies in reverse BFS order:
//!    `delta[v] += sigma[v] / sigma[w] * (1 + delta[w])` for each
//!    predecessor `v` of `w`.
//! 3. Add `delta[w]` to `w`'s score for every `w != s`.
//!
//! Every ordered source/target pair is visited, so on an undirected graph
//! each unordered pair is counted twice and raw scores are halved.
//!
//! Complexity: O(V * E).
//!
//! # Output
//!
//! - Betweenness is divided by the largest raw score so the maximum is
//!   exactly 1.0. If every score is zero, nothing is divided.
//! - Closeness for `s` is `reachable / sum_of_distances`, where `reachable`
//!   counts vertices other than `s` that `s` can reach. A vertex that
//!   reaches nothing scores 0.0.

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, Graph, MetricColumns, MetricFlags, MetricKind, Outcome, VertexId,
};
use tracing::instrument;

use super::paths::ShortestPathTree;
use crate::calculator::{GraphMetricCalculator, double_column};

const LABEL: &str = "Calculating betweenness and closeness centralities";

/// Betweenness and closeness for every vertex.
#[derive(Debug, Clone, Default)]
pub struct BrandesCentralities {
    /// Betweenness scaled so the largest score is 1.0.
    pub betweenness: BTreeMap<VertexId, f64>,
    /// Betweenness before max-normalization (already halved for undirected
    /// graphs).
    pub raw_betweenness: BTreeMap<VertexId, f64>,
    pub closeness: BTreeMap<VertexId, f64>,
}

/// Compute betweenness and closeness for every vertex of the context's
/// graph.
///
/// Checks for cancellation once per source vertex, on the context's
/// checkpoint cadence.
#[instrument(skip(ctx), fields(graph = %ctx.graph_id()))]
pub fn brandes_centralities(ctx: &CalculationContext<'_>) -> Outcome<BrandesCentralities> {
    let index = ctx.index();
    let n = index.len();

    let mut cb = vec![0.0_f64; n];
    let mut closeness = vec![0.0_f64; n];
    let mut delta = vec![0.0_f64; n];
    let mut tree = ShortestPathTree::new(n);

    for s in 0..n {
        if ctx.checkpoint(s, n, LABEL) {
            return Outcome::Cancelled;
        }

        tree.grow(index, s);

        let reachable = tree.order().len() - 1;
        let total = tree.total_distance();
        if total > 0 {
            closeness[s] = reachable as f64 / total as f64;
        }

        for &v in tree.order() {
            delta[v] = 0.0;
        }
        for &w in tree.order().iter().rev() {
            let coefficient = (1.0 + delta[w]) / tree.path_count(w);
            for &v in tree.predecessors(w) {
                delta[v] += tree.path_count(v) * coefficient;
            }
            if w != s {
                cb[w] += delta[w];
            }
        }
    }

    if index.is_symmetric() {
        for score in &mut cb {
            *score /= 2.0;
        }
    }

    let max = cb.iter().copied().fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { max } else { 1.0 };

    let mut result = BrandesCentralities::default();
    for (pos, &v) in index.vertices().iter().enumerate() {
        result.raw_betweenness.insert(v, cb[pos]);
        result.betweenness.insert(v, cb[pos] / scale);
        result.closeness.insert(v, closeness[pos]);
    }
    Outcome::Completed(result)
}

/// Produces the `betweenness_centrality` and `closeness_centrality` columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandesCalculator;

impl<V, E> GraphMetricCalculator<V, E> for BrandesCalculator {
    fn name(&self) -> &'static str {
        "betweenness and closeness centralities"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.betweenness || flags.closeness
    }

    fn calculate(
        &self,
        _graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        let result = netmetrics_core::completed_or_return!(brandes_centralities(ctx));

        let mut columns = MetricColumns::new();
        if ctx.flags().betweenness {
            columns.push(double_column(
                MetricKind::BetweennessCentrality,
                &result.betweenness,
            ));
        }
        if ctx.flags().closeness {
            columns.push(double_column(
                MetricKind::ClosenessCentrality,
                &result.closeness,
            ));
        }
        Outcome::Completed(columns)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_close, build, path, with_cancelled, with_ctx};
    use netmetrics_core::{Directedness, Graph};

    fn centralities(g: &Graph) -> BrandesCentralities {
        with_ctx(g, |ctx| brandes_centralities(ctx))
            .completed()
            .expect("not cancelled")
    }

    #[test]
    fn empty_graph_returns_empty() {
        let g: Graph = Graph::new(Directedness::Undirected);
        let c = centralities(&g);
        assert!(c.betweenness.is_empty());
        assert!(c.closeness.is_empty());
    }

    #[test]
    fn single_vertex_scores_zero() {
        let (g, vs) = build(Directedness::Undirected, 1, &[]);
        let c = centralities(&g);
        assert_close(c.betweenness[&vs[0]], 0.0, "betweenness");
        assert_close(c.closeness[&vs[0]], 0.0, "closeness");
    }

    #[test]
    fn undirected_path_middle_vertex_is_the_bridge() {
        // A - B - C: B is on the only A..C path. Raw score 1 after halving.
        let (g, vs) = path(3);
        let c = centralities(&g);

        assert_close(c.raw_betweenness[&vs[1]], 1.0, "raw B");
        assert_close(c.betweenness[&vs[0]], 0.0, "A");
        assert_close(c.betweenness[&vs[1]], 1.0, "B");
        assert_close(c.betweenness[&vs[2]], 0.0, "C");

        // B reaches two vertices at distance 1; A reaches two at total 3.
        assert_close(c.closeness[&vs[1]], 1.0, "closeness B");
        assert_close(c.closeness[&vs[0]], 2.0 / 3.0, "closeness A");
    }

    #[test]
    fn directed_diamond_splits_betweenness() {
        // A -> B -> D, A -> C -> D: two shortest A..D paths.
        let (g, vs) = build(
            Directedness::Directed,
            4,
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
        );
        let c = centralities(&g);

        assert_close(c.raw_betweenness[&vs[1]], 0.5, "raw B");
        assert_close(c.raw_betweenness[&vs[2]], 0.5, "raw C");
        assert_close(c.betweenness[&vs[1]], 1.0, "normalized B");
        assert_close(c.betweenness[&vs[3]], 0.0, "sink D");
    }

    #[test]
    fn directed_chain_of_four() {
        // A -> B -> C -> D: B on A..C and A..D, C on A..D and B..D.
        let (g, vs) = build(Directedness::Directed, 4, &[(0, 1), (1, 2), (2, 3)]);
        let c = centralities(&g);
        assert_close(c.raw_betweenness[&vs[1]], 2.0, "B");
        assert_close(c.raw_betweenness[&vs[2]], 2.0, "C");
        assert_close(c.closeness[&vs[3]], 0.0, "sink reaches nothing");
    }

    #[test]
    fn star_centre_carries_all_pairs() {
        // Centre 0 with 4 leaves: C(4,2) = 6 leaf pairs route through it.
        let (g, vs) = build(
            Directedness::Undirected,
            5,
            &[(0, 1), (0, 2), (0, 3), (0, 4)],
        );
        let c = centralities(&g);
        assert_close(c.raw_betweenness[&vs[0]], 6.0, "centre");
        for leaf in &vs[1..] {
            assert_close(c.betweenness[leaf], 0.0, "leaf");
        }
    }

    #[test]
    fn parallel_edges_do_not_change_scores() {
        let (mut g, vs) = path(3);
        g.add_edge(vs[0], vs[1], ()).expect("duplicate");
        let c = centralities(&g);
        assert_close(c.raw_betweenness[&vs[1]], 1.0, "B");
    }

    #[test]
    fn cancelled_before_first_source() {
        let (g, _) = path(4);
        let out = with_cancelled(&g, |ctx| brandes_centralities(ctx));
        assert!(out.is_cancelled());
    }

    #[test]
    fn calculator_respects_individual_flags() {
        let (g, _) = path(3);
        let mut config = netmetrics_core::MetricsConfig::default();
        config.metrics.closeness = false;
        let columns = crate::test_support::with_config(&g, &config, |ctx| {
            BrandesCalculator.attempt(&g, ctx)
        })
        .completed()
        .expect("not cancelled");
        assert_eq!(columns.kinds(), vec![MetricKind::BetweennessCentrality]);
    }
}
