//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! A vertex scores highly when its neighbors score highly: the score vector
//! is the dominant eigenvector of the adjacency matrix.
//!
//! # Algorithm
//!
//! Edges are read without direction, parallel edges collapse and self-loops
//! are ignored, so the matrix `A` is symmetric with a zero diagonal.
//! Iteration uses the shifted matrix `A + I`:
//!
//! 1. Start every vertex at `1 / V`.
//! 2. `next(v) = x(v) + sum of x(u) for each neighbor u`.
//! 3. Scale `next` to unit L2 norm.
//! 4. Stop once the L2 distance between successive vectors drops below the
//!    configured tolerance, or after `max_iter` steps.
//!
//! `A + I` has the same eigenvectors as `A`, but its dominant eigenvalue is
//! strictly largest in magnitude, so bipartite graphs (paths, stars, even
//! cycles) converge instead of oscillating.
//!
//! # Output
//!
//! Scores have unit L2 norm. An edgeless graph keeps its uniform start.

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, Graph, MetricColumns, MetricFlags, MetricKind, Outcome, VertexId,
};
use tracing::{debug, instrument, warn};

use crate::calculator::{GraphMetricCalculator, double_column};

const LABEL: &str = "Calculating eigenvector centrality";

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone, Default)]
pub struct EigenvectorResult {
    pub scores: BTreeMap<VertexId, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the tolerance was met within `max_iter`.
    pub converged: bool,
}

/// Eigenvector centrality starting from the uniform vector.
#[instrument(skip(ctx), fields(graph = %ctx.graph_id()))]
pub fn eigenvector_centrality(ctx: &CalculationContext<'_>) -> Outcome<EigenvectorResult> {
    let n = ctx.index().len();
    let initial = vec![1.0 / n.max(1) as f64; n];
    eigenvector_centrality_from(ctx, &initial)
}

/// Eigenvector centrality starting from `initial`, indexed by dense
/// position.
///
/// Any positive rescaling of `initial` gives the same result. An all-zero
/// or wrongly sized start falls back to the uniform vector.
pub fn eigenvector_centrality_from(
    ctx: &CalculationContext<'_>,
    initial: &[f64],
) -> Outcome<EigenvectorResult> {
    let index = ctx.index();
    let n = index.len();
    let config = &ctx.config().eigenvector;

    if n == 0 {
        return Outcome::Completed(EigenvectorResult {
            converged: true,
            ..EigenvectorResult::default()
        });
    }

    let mut scores = if initial.len() == n && l2_norm(initial) > 0.0 {
        initial.to_vec()
    } else {
        vec![1.0; n]
    };
    normalize(&mut scores);

    let mut next = vec![0.0_f64; n];
    let mut iterations = 0;
    let mut converged = false;

    for step in 0..config.max_iter {
        if ctx.step_checkpoint(step, config.max_iter, LABEL) {
            return Outcome::Cancelled;
        }
        iterations = step + 1;

        for v in 0..n {
            next[v] = scores[v]
                + index
                    .neighbors(v)
                    .iter()
                    .map(|&u| scores[u])
                    .sum::<f64>();
        }
        normalize(&mut next);

        let diff = scores
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt();

        std::mem::swap(&mut scores, &mut next);

        if diff < config.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(iterations, "eigenvector centrality converged");
    } else {
        warn!(
            iterations,
            tolerance = config.tolerance,
            "eigenvector centrality did not converge"
        );
    }

    Outcome::Completed(EigenvectorResult {
        scores: index.vertices().iter().copied().zip(scores).collect(),
        iterations,
        converged,
    })
}

fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn normalize(values: &mut [f64]) {
    let norm = l2_norm(values);
    if norm > 0.0 {
        for x in values.iter_mut() {
            *x /= norm;
        }
    }
}

/// Produces the `eigenvector_centrality` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct EigenvectorCalculator;

impl<V, E> GraphMetricCalculator<V, E> for EigenvectorCalculator {
    fn name(&self) -> &'static str {
        "eigenvector centrality"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.eigenvector
    }

    fn calculate(
        &self,
        _graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        eigenvector_centrality(ctx).map(|result| {
            vec![double_column(
                MetricKind::EigenvectorCentrality,
                &result.scores,
            )]
            .into()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
