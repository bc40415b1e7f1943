//! Whole-graph aggregate metrics.
//!
//! # Density
//!
//! `E` counts every non-loop edge, duplicates included:
//!
//! - undirected: `2E / (V * (V - 1))`;
//! - directed or mixed: `E / (V * (V - 1))`.
//!
//! Undefined for fewer than two vertices. Duplicate edges can push the raw
//! ratio past 1.0, so the value is flagged suspect whenever duplicates
//! exist; it is never negative.
//!
//! # Components
//!
//! Component figures use the weakly connected partition from
//! [`connected_components`]. Edge counts per component include duplicates
//! and self-loops.

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, Directedness, Graph, MetricColumn, MetricColumns, MetricFlags, MetricKind,
    MetricValue, Outcome,
};
use tracing::{debug, instrument};

use super::components::{component_numbers, connected_components};
use super::geodesic::geodesic_distances;
use super::reciprocity::overall_reciprocity;
use crate::calculator::GraphMetricCalculator;

#[derive(Debug, Clone, PartialEq)]
pub struct OverallMetrics {
    pub directedness: Directedness,
    pub vertices: usize,
    pub unique_edges: usize,
    pub edges_with_duplicates: usize,
    pub total_edges: usize,
    pub self_loops: usize,
    pub density: Option<f64>,
    pub connected_components: usize,
    pub single_vertex_components: usize,
    pub max_component_vertices: usize,
    pub max_component_edges: usize,
    pub max_geodesic_distance: Option<u32>,
    pub average_geodesic_distance: Option<f64>,
    /// Directed and mixed graphs only.
    pub reciprocated_vertex_pair_ratio: Option<f64>,
    /// Directed and mixed graphs only.
    pub reciprocated_edge_ratio: Option<f64>,
    /// Duplicate edges make `density` unreliable.
    pub suspect: bool,
}

/// Graph density; see the module docs.
#[must_use]
pub fn graph_density(directedness: Directedness, vertices: usize, edges: usize) -> Option<f64> {
    if vertices < 2 {
        return None;
    }
    let possible = (vertices * (vertices - 1)) as f64;
    let links = match directedness {
        Directedness::Undirected => 2 * edges,
        Directedness::Directed | Directedness::Mixed => edges,
    };
    Some((links as f64 / possible).max(0.0))
}

#[instrument(skip(graph, ctx), fields(graph = %graph.id()))]
pub fn overall_metrics<V, E>(
    graph: &Graph<V, E>,
    ctx: &CalculationContext<'_>,
) -> Outcome<OverallMetrics> {
    let index = ctx.index();
    let duplicates = ctx.duplicates();
    let directedness = graph.directedness();
    let total_edges = duplicates.total_edges();

    let components = connected_components(index);
    let numbers = component_numbers(&components);
    let mut edges_per_component: BTreeMap<u32, usize> = BTreeMap::new();
    for edge in graph.edges() {
        if let Some(&number) = numbers.get(&edge.vertex1) {
            *edges_per_component.entry(number).or_default() += 1;
        }
    }

    let geodesics = netmetrics_core::completed_or_return!(geodesic_distances(ctx));

    let reciprocity =
        (directedness != Directedness::Undirected).then(|| overall_reciprocity(index));

    Outcome::Completed(OverallMetrics {
        directedness,
        vertices: index.len(),
        unique_edges: duplicates.unique_edges,
        edges_with_duplicates: duplicates.edges_with_duplicates,
        total_edges,
        self_loops: duplicates.self_loops,
        density: graph_density(
            directedness,
            index.len(),
            total_edges - duplicates.self_loops,
        ),
        connected_components: components.len(),
        single_vertex_components: components.iter().filter(|c| c.len() == 1).count(),
        max_component_vertices: components.first().map_or(0, Vec::len),
        max_component_edges: edges_per_component.values().copied().max().unwrap_or(0),
        max_geodesic_distance: geodesics.max,
        average_geodesic_distance: geodesics.average,
        reciprocated_vertex_pair_ratio: reciprocity.and_then(|r| r.vertex_pair_ratio),
        reciprocated_edge_ratio: reciprocity.and_then(|r| r.edge_ratio),
        suspect: duplicates.has_duplicates(),
    })
}

impl OverallMetrics {
    /// One single-row column per figure.
    #[must_use]
    pub fn to_columns(&self) -> MetricColumns {
        let mut columns: MetricColumns = vec![
            MetricColumn::scalar(MetricKind::VertexCount, MetricValue::count(self.vertices)),
            MetricColumn::scalar(MetricKind::UniqueEdges, MetricValue::count(self.unique_edges)),
            MetricColumn::scalar(
                MetricKind::EdgesWithDuplicates,
                MetricValue::count(self.edges_with_duplicates),
            ),
            MetricColumn::scalar(MetricKind::TotalEdges, MetricValue::count(self.total_edges)),
            MetricColumn::scalar(MetricKind::SelfLoops, MetricValue::count(self.self_loops)),
            MetricColumn::scalar(MetricKind::Density, MetricValue::from_option(self.density))
                .suspect(self.suspect),
            MetricColumn::scalar(
                MetricKind::ConnectedComponents,
                MetricValue::count(self.connected_components),
            ),
            MetricColumn::scalar(
                MetricKind::SingleVertexComponents,
                MetricValue::count(self.single_vertex_components),
            ),
            MetricColumn::scalar(
                MetricKind::MaxComponentVertices,
                MetricValue::count(self.max_component_vertices),
            ),
            MetricColumn::scalar(
                MetricKind::MaxComponentEdges,
                MetricValue::count(self.max_component_edges),
            ),
            MetricColumn::scalar(
                MetricKind::MaxGeodesicDistance,
                self.max_geodesic_distance
                    .map_or(MetricValue::NotApplicable, |d| MetricValue::count(d as usize)),
            ),
            MetricColumn::scalar(
                MetricKind::AverageGeodesicDistance,
                MetricValue::from_option(self.average_geodesic_distance),
            ),
        ]
        .into();

        if self.directedness != Directedness::Undirected {
            columns.push(MetricColumn::scalar(
                MetricKind::OverallReciprocatedVertexPairRatio,
                MetricValue::from_option(self.reciprocated_vertex_pair_ratio),
            ));
            columns.push(MetricColumn::scalar(
                MetricKind::ReciprocatedEdgeRatio,
                MetricValue::from_option(self.reciprocated_edge_ratio),
            ));
        }
        columns
    }
}

/// Produces the whole-graph columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverallMetricCalculator;

impl<V, E> GraphMetricCalculator<V, E> for OverallMetricCalculator {
    fn name(&self) -> &'static str {
        "overall metrics"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.overall
    }

    fn calculate(
        &self,
        graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        overall_metrics(graph, ctx).map(|metrics| {
            if metrics.suspect {
                debug!(
                    duplicates = metrics.edges_with_duplicates,
                    "graph density computed with duplicate edges"
                );
            }
            metrics.to_columns()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_close, build, complete, path, with_cancelled, with_ctx};

    fn metrics(g: &Graph) -> OverallMetrics {
        with_ctx(g, |ctx| overall_metrics(g, ctx))
            .completed()
            .expect("not cancelled")
    }

    #[test]
    fn path_of_three() {
        let (g, _) = path(3);
        let m = metrics(&g);
        assert_eq!(m.vertices, 3);
        assert_eq!(m.total_edges, 2);
        assert_close(m.density.expect("defined"), 2.0 / 3.0, "density");
        assert_eq!(m.connected_components, 1);
        assert_eq!(m.max_component_vertices, 3);
        assert_eq!(m.max_component_edges, 2);
        assert_eq!(m.max_geodesic_distance, Some(2));
        assert_eq!(m.reciprocated_edge_ratio, None);
        assert!(!m.suspect);
    }

    #[test]
    fn complete_graph_density_is_exactly_one() {
        for n in 2..8 {
            let (g, _) = complete(n);
            assert_eq!(metrics(&g).density, Some(1.0), "K{n}");
        }
    }

    #[test]
    fn edgeless_density_is_zero() {
        let (g, _) = build(Directedness::Undirected, 4, &[]);
        let m = metrics(&g);
        assert_eq!(m.density, Some(0.0));
        assert_eq!(m.single_vertex_components, 4);
    }

    #[test]
    fn tiny_graphs_have_no_density() {
        let (g, _) = build(Directedness::Undirected, 1, &[(0, 0)]);
        let m = metrics(&g);
        assert_eq!(m.density, None);
        assert_eq!(m.self_loops, 1);
    }

    #[test]
    fn duplicates_mark_density_suspect() {
        let (g, _) = build(Directedness::Undirected, 2, &[(0, 1), (1, 0), (0, 1)]);
        let m = metrics(&g);
        assert!(m.suspect);
        assert_eq!(m.edges_with_duplicates, 3);
        assert_eq!(m.unique_edges, 0);
        // Three parallel edges between two vertices: raw ratio 3.0.
        assert_close(m.density.expect("defined"), 3.0, "density");

        let columns = m.to_columns();
        assert!(columns.get(MetricKind::Density).is_some_and(|c| c.suspect));
    }

    #[test]
    fn directed_density_and_reciprocity() {
        let (g, _) = build(Directedness::Directed, 3, &[(0, 1), (1, 0), (1, 2)]);
        let m = metrics(&g);
        assert_close(m.density.expect("defined"), 3.0 / 6.0, "density");
        assert_close(m.reciprocated_vertex_pair_ratio.expect("pairs"), 0.5, "pairs");
        let columns = m.to_columns();
        assert!(columns.get(MetricKind::ReciprocatedEdgeRatio).is_some());
    }

    #[test]
    fn cancelled_overall_run() {
        let (g, _) = path(3);
        assert!(with_cancelled(&g, |ctx| overall_metrics(&g, ctx)).is_cancelled());
    }
}
