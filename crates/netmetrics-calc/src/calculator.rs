//! The contract every metric calculator implements.
//!
//! A calculator reads one graph through a shared [`CalculationContext`] and
//! produces a set of named [`MetricColumns`]. It never mutates the graph,
//! never returns partial output, and reports cancellation as
//! [`Outcome::Cancelled`] rather than as an error.

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, Graph, MetricColumn, MetricColumns, MetricFlags, MetricKind, MetricValue,
    Outcome, VertexId,
};
use tracing::{debug, info};

/// One metric family.
pub trait GraphMetricCalculator<V, E> {
    /// Human-readable name, used in progress descriptions and logs.
    fn name(&self) -> &'static str;

    /// Whether `flags` ask for anything this calculator produces.
    fn is_enabled(&self, flags: &MetricFlags) -> bool;

    /// Compute the columns unconditionally.
    fn calculate(&self, graph: &Graph<V, E>, ctx: &CalculationContext<'_>)
    -> Outcome<MetricColumns>;

    /// Compute the columns if enabled.
    ///
    /// A disabled calculator completes immediately with no columns.
    fn attempt(&self, graph: &Graph<V, E>, ctx: &CalculationContext<'_>) -> Outcome<MetricColumns> {
        if !self.is_enabled(ctx.flags()) {
            debug!(calculator = self.name(), "disabled, skipping");
            return Outcome::Completed(MetricColumns::new());
        }

        ctx.report(0, 1, &progress_label(self.name()));
        let outcome = self.calculate(graph, ctx);
        match &outcome {
            Outcome::Completed(columns) => {
                debug!(calculator = self.name(), columns = columns.len(), "finished");
            }
            Outcome::Cancelled => info!(calculator = self.name(), "cancelled"),
        }
        outcome
    }
}

/// "Calculating <name>".
#[must_use]
pub fn progress_label(name: &str) -> String {
    format!("Calculating {name}")
}

pub(crate) fn double_column(kind: MetricKind, values: &BTreeMap<VertexId, f64>) -> MetricColumn {
    MetricColumn::per_vertex(
        kind,
        values
            .iter()
            .map(|(&v, &x)| (v, MetricValue::Double(x)))
            .collect(),
    )
}

pub(crate) fn optional_column(
    kind: MetricKind,
    values: &BTreeMap<VertexId, Option<f64>>,
) -> MetricColumn {
    MetricColumn::per_vertex(
        kind,
        values
            .iter()
            .map(|(&v, &x)| (v, MetricValue::from_option(x)))
            .collect(),
    )
}

pub(crate) fn count_column(kind: MetricKind, values: &BTreeMap<VertexId, usize>) -> MetricColumn {
    MetricColumn::per_vertex(
        kind,
        values
            .iter()
            .map(|(&v, &n)| (v, MetricValue::count(n)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build, with_config};
    use netmetrics_core::{ColumnValues, Directedness, MetricsConfig, ProgressLog};

    struct Counting;

    impl GraphMetricCalculator<(), ()> for Counting {
        fn name(&self) -> &'static str {
            "vertex count"
        }

        fn is_enabled(&self, flags: &MetricFlags) -> bool {
            flags.overall
        }

        fn calculate(
            &self,
            graph: &Graph,
            _ctx: &CalculationContext<'_>,
        ) -> Outcome<MetricColumns> {
            let mut columns = MetricColumns::new();
            columns.push(MetricColumn::scalar(
                MetricKind::VertexCount,
                MetricValue::count(graph.vertex_count()),
            ));
            Outcome::Completed(columns)
        }
    }

    #[test]
    fn disabled_calculator_yields_no_columns() {
        let (g, _) = build(Directedness::Undirected, 3, &[(0, 1)]);
        let mut config = MetricsConfig::default();
        config.metrics.overall = false;

        let out = with_config(&g, &config, |ctx| Counting.attempt(&g, ctx));
        assert_eq!(out, Outcome::Completed(MetricColumns::new()));
    }

    #[test]
    fn enabled_calculator_reports_its_name() {
        let (g, _) = build(Directedness::Undirected, 3, &[(0, 1)]);
        let config = MetricsConfig::default();
        let token = netmetrics_core::CancellationToken::new();
        let log = ProgressLog::new();
        let ctx = CalculationContext::new(&g, &config, &token, &log);

        let columns = Counting.attempt(&g, &ctx).completed().expect("not cancelled");
        assert_eq!(columns.scalar(MetricKind::VertexCount), Some(&MetricValue::Int(3)));
        assert_eq!(log.entries()[0].description, "Calculating vertex count");
    }

    #[test]
    fn optional_values_become_not_applicable() {
        let (_, vs) = build(Directedness::Undirected, 2, &[]);
        let values: BTreeMap<VertexId, Option<f64>> =
            [(vs[0], Some(0.5)), (vs[1], None)].into_iter().collect();
        let column = optional_column(MetricKind::ClusteringCoefficient, &values);
        let ColumnValues::PerVertex(map) = &column.values else {
            panic!("expected per-vertex column");
        };
        assert_eq!(map[&vs[0]], MetricValue::Double(0.5));
        assert_eq!(map[&vs[1]], MetricValue::NotApplicable);
    }
}
