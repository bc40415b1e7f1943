//! Local clustering coefficient.
//!
//! For a vertex with `k` distinct neighbors (itself excluded, parallel
//! edges collapsed), the coefficient is the fraction of possible links
//! among those neighbors that actually exist:
//!
//! - undirected: `links / (k * (k - 1) / 2)`, each neighbor pair counted
//!   once;
//! - directed or mixed: `links / (k * (k - 1))`, each ordered pair counted
//!   once, so an undirected edge among neighbors contributes two links.
//!
//! Vertices with fewer than two neighbors have no defined coefficient.

use std::collections::BTreeMap;

use fixedbitset::FixedBitSet;
use netmetrics_core::{
    CalculationContext, Graph, MetricColumns, MetricFlags, MetricKind, Outcome, VertexId,
};
use tracing::{debug, instrument};

use crate::calculator::{GraphMetricCalculator, optional_column};

const LABEL: &str = "Calculating clustering coefficients";

#[derive(Debug, Clone, Default)]
pub struct ClusteringCoefficients {
    /// `None` where the vertex has fewer than two neighbors.
    pub values: BTreeMap<VertexId, Option<f64>>,
    /// The graph has duplicate edges.
    pub suspect: bool,
}

#[instrument(skip(ctx), fields(graph = %ctx.graph_id()))]
pub fn clustering_coefficients(ctx: &CalculationContext<'_>) -> Outcome<ClusteringCoefficients> {
    let index = ctx.index();
    let n = index.len();
    let symmetric = index.is_symmetric();

    let mut marked = FixedBitSet::with_capacity(n);
    let mut result = ClusteringCoefficients {
        values: BTreeMap::new(),
        suspect: ctx.duplicates().has_duplicates(),
    };

    for v in 0..n {
        if ctx.checkpoint(v, n, LABEL) {
            return Outcome::Cancelled;
        }

        let neighbors = index.neighbors(v);
        let k = neighbors.len();
        if k < 2 {
            result.values.insert(index.vertex(v), None);
            continue;
        }

        for &a in neighbors {
            marked.insert(a);
        }

        // Undirected: each neighbor pair is seen from both ends. Directed:
        // each followable ordered pair is seen once, from its tail.
        let mut links = 0usize;
        for &a in neighbors {
            links += index
                .successors(a)
                .iter()
                .filter(|&&b| marked.contains(b))
                .count();
        }
        for &a in neighbors {
            marked.set(a, false);
        }

        let possible = (k * (k - 1)) as f64;
        let coefficient = if symmetric {
            (links / 2) as f64 / (possible / 2.0)
        } else {
            links as f64 / possible
        };
        result.values.insert(index.vertex(v), Some(coefficient));
    }

    Outcome::Completed(result)
}

/// Produces the `clustering_coefficient` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusteringCoefficientCalculator;

impl<V, E> GraphMetricCalculator<V, E> for ClusteringCoefficientCalculator {
    fn name(&self) -> &'static str {
        "clustering coefficients"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.clustering_coefficient
    }

    fn calculate(
        &self,
        _graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        let result = netmetrics_core::completed_or_return!(clustering_coefficients(ctx));
        if result.suspect {
            debug!(
                duplicates = ctx.duplicates().edges_with_duplicates,
                "clustering coefficients computed on a graph with duplicate edges"
            );
        }
        let column = optional_column(MetricKind::ClusteringCoefficient, &result.values)
            .suspect(result.suspect);
        Outcome::Completed(vec![column].into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
