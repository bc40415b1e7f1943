//! Connected components.
//!
//! "Connected" means reachable with edge direction ignored (weak
//! connectivity): a depth-first walk from each unvisited vertex over
//! direction-free adjacency collects one component. The pass is cheap
//! compared to the other calculators and does not poll for cancellation.
//!
//! Strongly connected components, which respect edge direction, are
//! available separately via [`strongly_connected_components`].
//!
//! Both partitions list components largest first, ties broken by the
//! smallest member; members within a component are in ascending order.

use std::collections::BTreeMap;

use fixedbitset::FixedBitSet;
use netmetrics_core::{
    CalculationContext, DenseIndex, Graph, MetricColumn, MetricColumns, MetricFlags, MetricKind,
    MetricValue, Outcome, VertexId,
};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::instrument;

use crate::calculator::GraphMetricCalculator;

/// Partition every vertex into weakly connected components.
#[must_use]
#[instrument(skip(index), fields(vertices = index.len()))]
pub fn connected_components(index: &DenseIndex) -> Vec<Vec<VertexId>> {
    let n = index.len();
    let mut visited = FixedBitSet::with_capacity(n);
    let mut stack = Vec::new();
    let mut components = Vec::new();

    for root in 0..n {
        if visited.contains(root) {
            continue;
        }
        visited.insert(root);
        stack.push(root);

        let mut members = Vec::new();
        while let Some(v) = stack.pop() {
            members.push(index.vertex(v));
            for &w in index.neighbors(v) {
                if !visited.contains(w) {
                    visited.insert(w);
                    stack.push(w);
                }
            }
        }
        components.push(members);
    }

    sort_components(&mut components);
    components
}

/// Partition every vertex into strongly connected components.
///
/// Undirected edges can be followed both ways.
#[must_use]
#[instrument(skip(index), fields(vertices = index.len()))]
pub fn strongly_connected_components(index: &DenseIndex) -> Vec<Vec<VertexId>> {
    let n = index.len();
    let mut digraph = DiGraph::<(), ()>::with_capacity(n, 0);
    for _ in 0..n {
        digraph.add_node(());
    }
    for v in 0..n {
        for &w in index.successors(v) {
            digraph.add_edge(NodeIndex::new(v), NodeIndex::new(w), ());
        }
    }

    let mut components: Vec<Vec<VertexId>> = tarjan_scc(&digraph)
        .into_iter()
        .map(|scc| scc.into_iter().map(|node| index.vertex(node.index())).collect())
        .collect();
    sort_components(&mut components);
    components
}

/// 1-based component number for each vertex, following the order of
/// `components`.
#[must_use]
pub fn component_numbers(components: &[Vec<VertexId>]) -> BTreeMap<VertexId, u32> {
    let mut numbers = BTreeMap::new();
    for (i, members) in components.iter().enumerate() {
        let number = u32::try_from(i + 1).unwrap_or(u32::MAX);
        for &v in members {
            numbers.insert(v, number);
        }
    }
    numbers
}

fn sort_components(components: &mut [Vec<VertexId>]) {
    for members in components.iter_mut() {
        members.sort_unstable();
    }
    components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));
}

/// Produces the per-vertex `connected_component` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectedComponentCalculator;

impl<V, E> GraphMetricCalculator<V, E> for ConnectedComponentCalculator {
    fn name(&self) -> &'static str {
        "connected components"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.connected_components
    }

    fn calculate(
        &self,
        _graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        let components = connected_components(ctx.index());
        let values = component_numbers(&components)
            .into_iter()
            .map(|(v, number)| (v, MetricValue::Int(i32::try_from(number).unwrap_or(i32::MAX))))
            .collect();
        Outcome::Completed(
            vec![MetricColumn::per_vertex(MetricKind::ConnectedComponent, values)].into(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
