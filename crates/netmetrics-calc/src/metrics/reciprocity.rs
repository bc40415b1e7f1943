//! Reciprocity for directed graphs.
//!
//! Two adjacent vertices form a reciprocated pair when each has an edge
//! leading to the other. Per vertex, the reciprocated vertex pair ratio is
//! the share of its distinct neighbors it is reciprocated with. Whole-graph
//! figures:
//!
//! - reciprocated vertex pair ratio: `R / P`, with `P` the number of
//!   adjacent vertex pairs and `R` the reciprocated ones;
//! - reciprocated edge ratio: `2R / (P + R)`, the share of distinct
//!   directed links that have a partner pointing back.
//!
//! Parallel edges collapse and self-loops are ignored. On undirected graphs
//! every pair is trivially reciprocated, so nothing is produced there.

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, DenseIndex, Directedness, Graph, MetricColumns, MetricFlags, MetricKind,
    Outcome, VertexId,
};

use crate::calculator::{GraphMetricCalculator, optional_column};

/// Number of distinct neighbors of `v` that `v` is reciprocated with.
fn reciprocated_neighbors(index: &DenseIndex, v: usize) -> usize {
    index
        .neighbors(v)
        .iter()
        .filter(|&&a| index.leads(v, a) && index.leads(a, v))
        .count()
}

/// Per-vertex ratio; `None` for vertices without neighbors.
#[must_use]
pub fn reciprocated_vertex_pair_ratios(index: &DenseIndex) -> BTreeMap<VertexId, Option<f64>> {
    (0..index.len())
        .map(|v| {
            let degree = index.neighbors(v).len();
            let ratio = (degree > 0)
                .then(|| reciprocated_neighbors(index, v) as f64 / degree as f64);
            (index.vertex(v), ratio)
        })
        .collect()
}

/// Whole-graph reciprocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reciprocity {
    pub vertex_pair_ratio: Option<f64>,
    pub edge_ratio: Option<f64>,
}

/// Both ratios are `None` when the graph has no adjacent pairs.
#[must_use]
pub fn overall_reciprocity(index: &DenseIndex) -> Reciprocity {
    let mut adjacent = 0usize;
    let mut reciprocated = 0usize;
    for v in 0..index.len() {
        adjacent += index.neighbors(v).len();
        reciprocated += reciprocated_neighbors(index, v);
    }
    // Each pair was seen from both ends.
    let pairs = adjacent / 2;
    let mutual = reciprocated / 2;

    if pairs == 0 {
        return Reciprocity {
            vertex_pair_ratio: None,
            edge_ratio: None,
        };
    }
    Reciprocity {
        vertex_pair_ratio: Some(mutual as f64 / pairs as f64),
        edge_ratio: Some(2.0 * mutual as f64 / (pairs + mutual) as f64),
    }
}

/// Produces the per-vertex `reciprocated_vertex_pair_ratio` column on
/// directed and mixed graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReciprocityCalculator;

impl<V, E> GraphMetricCalculator<V, E> for ReciprocityCalculator {
    fn name(&self) -> &'static str {
        "reciprocated vertex pair ratios"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.reciprocated_vertex_pair_ratio
    }

    fn calculate(
        &self,
        graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        if graph.directedness() == Directedness::Undirected {
            return Outcome::Completed(MetricColumns::new());
        }
        let ratios = reciprocated_vertex_pair_ratios(ctx.index());
        Outcome::Completed(
            vec![optional_column(
                MetricKind::ReciprocatedVertexPairRatio,
                &ratios,
            )]
            .into(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_close, build, path, with_ctx};

    #[test]
    fn one_mutual_pair_of_two() {
        // 0 <-> 1, 1 -> 2
        let (g, vs) = build(Directedness::Directed, 3, &[(0, 1), (1, 0), (1, 2)]);
        let index = DenseIndex::build(&g);

        let per_vertex = reciprocated_vertex_pair_ratios(&index);
        assert_close(per_vertex[&vs[0]].expect("has neighbors"), 1.0, "0");
        assert_close(per_vertex[&vs[1]].expect("has neighbors"), 0.5, "1");
        assert_close(per_vertex[&vs[2]].expect("has neighbors"), 0.0, "2");

        let overall = overall_reciprocity(&index);
        assert_close(overall.vertex_pair_ratio.expect("pairs"), 0.5, "pairs");
        // Three distinct links, two of them reciprocated.
        assert_close(overall.edge_ratio.expect("pairs"), 2.0 / 3.0, "edges");
    }

    #[test]
    fn isolated_vertex_has_no_ratio() {
        let (g, vs) = build(Directedness::Directed, 1, &[]);
        let index = DenseIndex::build(&g);
        assert_eq!(reciprocated_vertex_pair_ratios(&index)[&vs[0]], None);
        assert_eq!(overall_reciprocity(&index).edge_ratio, None);
    }

    #[test]
    fn undirected_graph_produces_nothing() {
        let (g, _) = path(3);
        let columns = with_ctx(&g, |ctx| ReciprocityCalculator.attempt(&g, ctx))
            .completed()
            .expect("not cancelled");
        assert!(columns.is_empty());
    }
}
