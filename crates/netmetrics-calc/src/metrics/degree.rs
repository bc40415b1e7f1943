//! In-degree, out-degree and degree in one pass over the edges.
//!
//! Counting rules, per edge:
//!
//! - directed `a -> b`: `out(a)`, `in(b)`, `degree(a)` and `degree(b)` each
//!   gain one;
//! - undirected `a - b`: `in`, `out` and `degree` of both endpoints gain
//!   one;
//! - self-loop on `a`: `in(a)`, `out(a)` and `degree(a)` gain one each, so a
//!   loop counts once, not twice.
//!
//! Parallel edges are counted individually. All three maps are always
//! filled; callers keep the subset they want.

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, Directedness, Graph, MetricColumns, MetricFlags, MetricKind, Outcome,
    VertexId,
};
use tracing::instrument;

use crate::calculator::{GraphMetricCalculator, count_column};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexDegrees {
    pub in_degree: BTreeMap<VertexId, usize>,
    pub out_degree: BTreeMap<VertexId, usize>,
    pub degree: BTreeMap<VertexId, usize>,
}

#[must_use]
#[instrument(skip(graph), fields(graph = %graph.id()))]
pub fn vertex_degrees<V, E>(graph: &Graph<V, E>) -> VertexDegrees {
    let zeroes: BTreeMap<VertexId, usize> = graph.vertices().map(|v| (v, 0)).collect();
    let mut degrees = VertexDegrees {
        in_degree: zeroes.clone(),
        out_degree: zeroes.clone(),
        degree: zeroes,
    };

    for edge in graph.edges() {
        let (a, b) = (edge.vertex1, edge.vertex2);
        if edge.is_self_loop() {
            bump(&mut degrees.in_degree, a);
            bump(&mut degrees.out_degree, a);
            bump(&mut degrees.degree, a);
        } else if edge.directed {
            bump(&mut degrees.out_degree, a);
            bump(&mut degrees.in_degree, b);
            bump(&mut degrees.degree, a);
            bump(&mut degrees.degree, b);
        } else {
            for v in [a, b] {
                bump(&mut degrees.in_degree, v);
                bump(&mut degrees.out_degree, v);
                bump(&mut degrees.degree, v);
            }
        }
    }

    degrees
}

fn bump(map: &mut BTreeMap<VertexId, usize>, v: VertexId) {
    if let Some(count) = map.get_mut(&v) {
        *count += 1;
    }
}

/// Produces `degree` for undirected graphs and `in_degree`/`out_degree`
/// otherwise, each subject to its flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeCalculator;

impl<V, E> GraphMetricCalculator<V, E> for DegreeCalculator {
    fn name(&self) -> &'static str {
        "vertex degree"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.any_degree()
    }

    fn calculate(
        &self,
        graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        let degrees = vertex_degrees(graph);
        let flags = ctx.flags();

        let mut columns = MetricColumns::new();
        if graph.directedness() == Directedness::Undirected {
            if flags.degree {
                columns.push(count_column(MetricKind::Degree, &degrees.degree));
            }
        } else {
            if flags.in_degree {
                columns.push(count_column(MetricKind::InDegree, &degrees.in_degree));
            }
            if flags.out_degree {
                columns.push(count_column(MetricKind::OutDegree, &degrees.out_degree));
            }
        }
        Outcome::Completed(columns)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
