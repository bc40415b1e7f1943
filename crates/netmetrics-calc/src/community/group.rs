//! Per-community ("group") metrics.
//!
//! Each community's induced subgraph is measured like a whole graph:
//! vertex and edge counts, duplicates, self-loops, density, connected
//! components and the longest geodesic inside the group. Only edges with
//! both endpoints in the community count.

use netmetrics_core::{
    CalculationContext, Graph, MetricColumn, MetricColumns, MetricFlags, MetricKind, MetricValue,
    Outcome, RowKey,
};
use tracing::instrument;

use super::Partition;
use crate::calculator::GraphMetricCalculator;
use crate::metrics::overall::overall_metrics;

const LABEL: &str = "Calculating group metrics";

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMetrics {
    pub community: u32,
    pub vertices: usize,
    pub unique_edges: usize,
    pub edges_with_duplicates: usize,
    pub total_edges: usize,
    pub self_loops: usize,
    pub density: Option<f64>,
    pub connected_components: usize,
    pub max_geodesic_distance: Option<u32>,
    pub suspect: bool,
}

#[instrument(skip(graph, partition, ctx), fields(communities = partition.len()))]
pub fn group_metrics<V, E>(
    graph: &Graph<V, E>,
    partition: &Partition,
    ctx: &CalculationContext<'_>,
) -> Outcome<Vec<GroupMetrics>> {
    let count = partition.len();
    let mut groups = Vec::with_capacity(count);

    for (i, community) in partition.communities.iter().enumerate() {
        if ctx.checkpoint(i, count, LABEL) {
            return Outcome::Cancelled;
        }
        let sub = graph.induced_subgraph(&community.members);
        let sub_ctx = ctx.derive(&sub);
        let overall = netmetrics_core::completed_or_return!(overall_metrics(&sub, &sub_ctx));

        groups.push(GroupMetrics {
            community: community.id,
            vertices: overall.vertices,
            unique_edges: overall.unique_edges,
            edges_with_duplicates: overall.edges_with_duplicates,
            total_edges: overall.total_edges,
            self_loops: overall.self_loops,
            density: overall.density,
            connected_components: overall.connected_components,
            max_geodesic_distance: overall.max_geodesic_distance,
            suspect: overall.suspect,
        });
    }

    Outcome::Completed(groups)
}

/// Row-keyed columns, one row per community.
#[must_use]
pub fn group_columns(groups: &[GroupMetrics]) -> MetricColumns {
    let rows = |value: fn(&GroupMetrics) -> MetricValue| -> Vec<(RowKey, MetricValue)> {
        groups
            .iter()
            .map(|g| (RowKey::Community(g.community), value(g)))
            .collect()
    };
    let any_suspect = groups.iter().any(|g| g.suspect);

    vec![
        MetricColumn::rows(MetricKind::GroupVertices, rows(|g| MetricValue::count(g.vertices))),
        MetricColumn::rows(
            MetricKind::GroupUniqueEdges,
            rows(|g| MetricValue::count(g.unique_edges)),
        ),
        MetricColumn::rows(
            MetricKind::GroupEdgesWithDuplicates,
            rows(|g| MetricValue::count(g.edges_with_duplicates)),
        ),
        MetricColumn::rows(
            MetricKind::GroupTotalEdges,
            rows(|g| MetricValue::count(g.total_edges)),
        ),
        MetricColumn::rows(
            MetricKind::GroupSelfLoops,
            rows(|g| MetricValue::count(g.self_loops)),
        ),
        MetricColumn::rows(
            MetricKind::GroupDensity,
            rows(|g| MetricValue::from_option(g.density)),
        )
        .suspect(any_suspect),
        MetricColumn::rows(
            MetricKind::GroupConnectedComponents,
            rows(|g| MetricValue::count(g.connected_components)),
        ),
        MetricColumn::rows(
            MetricKind::GroupMaxGeodesicDistance,
            rows(|g| {
                g.max_geodesic_distance
                    .map_or(MetricValue::NotApplicable, |d| MetricValue::count(d as usize))
            }),
        ),
    ]
    .into()
}

/// Measures each community of an already computed partition.
#[derive(Debug, Clone)]
pub struct GroupMetricCalculator {
    partition: Partition,
}

impl GroupMetricCalculator {
    #[must_use]
    pub const fn new(partition: Partition) -> Self {
        Self { partition }
    }
}

impl<V, E> GraphMetricCalculator<V, E> for GroupMetricCalculator {
    fn name(&self) -> &'static str {
        "group metrics"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.group_metrics
    }

    fn calculate(
        &self,
        graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        group_metrics(graph, &self.partition, ctx).map(|groups| group_columns(&groups))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::detect_communities;
    use crate::test_support::{assert_close, build, with_cancelled, with_ctx};
    use netmetrics_core::Directedness;

    fn barbell_with_loop() -> Graph {
        let (mut g, vs) = build(
            Directedness::Undirected,
            6,
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)],
        );
        g.add_edge(vs[4], vs[4], ()).expect("loop");
        g
    }

    #[test]
    fn each_triangle_is_measured_alone() {
        let g = barbell_with_loop();
        let groups = with_ctx(&g, |ctx| {
            detect_communities(&g, ctx).and_then(|partition| group_metrics(&g, &partition, ctx))
        })
        .completed()
        .expect("not cancelled");

        assert_eq!(groups.len(), 2);
        let first = &groups[0];
        assert_eq!(first.community, 1);
        assert_eq!(first.vertices, 3);
        assert_eq!(first.total_edges, 3);
        assert_close(first.density.expect("defined"), 1.0, "triangle density");
        assert_eq!(first.connected_components, 1);
        assert_eq!(first.max_geodesic_distance, Some(1));

        let second = &groups[1];
        assert_eq!(second.self_loops, 1);
        assert_eq!(second.total_edges, 4);
        // The bridge 2-3 belongs to neither group.
        assert_eq!(groups.iter().map(|g| g.total_edges).sum::<usize>(), 7);
    }

    #[test]
    fn columns_are_keyed_by_community() {
        let g = barbell_with_loop();
        let columns = with_ctx(&g, |ctx| {
            detect_communities(&g, ctx).and_then(|partition| {
                GroupMetricCalculator::new(partition).attempt(&g, ctx)
            })
        })
        .completed()
        .expect("not cancelled");

        let vertices = columns.get(MetricKind::GroupVertices).expect("group vertices");
        assert_eq!(vertices.row(RowKey::Community(2)), Some(&MetricValue::Int(3)));
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn cancellation_stops_group_pass() {
        let g = barbell_with_loop();
        let partition = with_ctx(&g, |ctx| detect_communities(&g, ctx))
            .completed()
            .expect("not cancelled");
        let out = with_cancelled(&g, |ctx| group_metrics(&g, &partition, ctx));
        assert!(out.is_cancelled());
    }
}
