//! PageRank via the power method.
//!
//! # Algorithm
//!
//! ```text
//! PR(v) = (1 - d) / N + d * (sum of PR(u) / out_degree(u) for u -> v
//!                            + sum of PR(u) / N for dangling u)
//! ```
//!
//! `d` is the damping factor. Undirected edges are followed both ways,
//! parallel edges collapse and self-loops are ignored. A vertex with no
//! outgoing edge is dangling: its rank is spread evenly over every vertex so
//! the total stays 1.
//!
//! Iteration stops once the L1 norm of the rank delta drops below the
//! configured tolerance, or after `max_iter` steps.

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, Graph, MetricColumns, MetricFlags, MetricKind, Outcome, VertexId,
};
use tracing::{instrument, warn};

use crate::calculator::{GraphMetricCalculator, double_column};

const LABEL: &str = "Calculating PageRank";

/// Result of a PageRank computation.
#[derive(Debug, Clone, Default)]
pub struct PageRankResult {
    pub scores: BTreeMap<VertexId, f64>,
    pub iterations: usize,
    pub converged: bool,
}

#[instrument(skip(ctx), fields(graph = %ctx.graph_id()))]
pub fn pagerank(ctx: &CalculationContext<'_>) -> Outcome<PageRankResult> {
    let index = ctx.index();
    let config = &ctx.config().pagerank;
    let n = index.len();

    if n == 0 {
        return Outcome::Completed(PageRankResult {
            converged: true,
            ..PageRankResult::default()
        });
    }

    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];
    let mut iterations = 0;
    let mut converged = false;

    for step in 0..config.max_iter {
        if ctx.step_checkpoint(step, config.max_iter, LABEL) {
            return Outcome::Cancelled;
        }
        iterations = step + 1;

        let dangling: f64 = (0..n)
            .filter(|&v| index.successors(v).is_empty())
            .map(|v| ranks[v])
            .sum();
        let floor = base + config.damping * dangling / n_f64;
        new_ranks.fill(floor);

        for (v, &rank) in ranks.iter().enumerate() {
            let out = index.successors(v);
            if out.is_empty() {
                continue;
            }
            let share = config.damping * rank / out.len() as f64;
            for &w in out {
                new_ranks[w] += share;
            }
        }

        let delta: f64 = ranks
            .iter()
            .zip(&new_ranks)
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(iterations, "PageRank did not converge");
    }

    Outcome::Completed(PageRankResult {
        scores: index.vertices().iter().copied().zip(ranks).collect(),
        iterations,
        converged,
    })
}

/// Produces the `pagerank` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRankCalculator;

impl<V, E> GraphMetricCalculator<V, E> for PageRankCalculator {
    fn name(&self) -> &'static str {
        "PageRank"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.pagerank
    }

    fn calculate(
        &self,
        _graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        pagerank(ctx)
            .map(|result| vec![double_column(MetricKind::PageRank, &result.scores)].into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
