//! Community ("cluster") detection.
//!
//! # Overview
//!
//! Partitions the vertices into disjoint communities that are more densely
//! connected inside than between each other. Three algorithms are
//! available, selected by [`ClusterAlgorithm`]:
//!
//! - Clauset-Newman-Moore greedy agglomeration ([`cnm`]), the default;
//! - Wakita-Tsurumi, the same agglomeration ranked by consolidation ratio;
//! - Girvan-Newman divisive edge-betweenness splitting
//!   ([`girvan_newman`]).
//!
//! # Output
//!
//! A [`Partition`]: every vertex belongs to exactly one community.
//! Communities are ordered largest first, ties broken by their smallest
//! member, and numbered from 1 in that order. Each community carries a
//! display [`CommunityStyle`] derived from its position.

pub mod cnm;
pub mod girvan_newman;
pub mod group;
pub mod modularity;
pub mod style;

use std::collections::BTreeMap;

use netmetrics_core::{
    CalculationContext, ClusterAlgorithm, DenseIndex, Graph, MetricColumn, MetricColumns,
    MetricFlags, MetricKind, MetricValue, Outcome, RowKey, VertexId,
};
use tracing::{debug, instrument};

use crate::calculator::GraphMetricCalculator;
use cnm::{MergeWeighting, greedy_modularity};
pub use style::{CommunityStyle, Rgb, VertexShape, community_style};

/// One community of a partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    /// 1-based position in the partition.
    pub id: u32,
    /// Members in ascending order. Never empty.
    pub members: Vec<VertexId>,
    pub style: CommunityStyle,
}

/// A complete, disjoint partition of a graph's vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub algorithm: ClusterAlgorithm,
    pub communities: Vec<Community>,
    pub modularity: f64,
}

impl Partition {
    /// Build a partition from one label per dense position.
    #[must_use]
    pub fn from_labels(index: &DenseIndex, labels: &[usize], algorithm: ClusterAlgorithm) -> Self {
        let mut groups: BTreeMap<usize, Vec<VertexId>> = BTreeMap::new();
        for (pos, &label) in labels.iter().enumerate() {
            groups.entry(label).or_default().push(index.vertex(pos));
        }

        let mut blocks: Vec<Vec<VertexId>> = groups.into_values().collect();
        for members in &mut blocks {
            members.sort_unstable();
        }
        blocks.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));

        let communities = blocks
            .into_iter()
            .enumerate()
            .map(|(i, members)| Community {
                id: u32::try_from(i + 1).unwrap_or(u32::MAX),
                members,
                style: community_style(i),
            })
            .collect();

        Self {
            algorithm,
            communities,
            modularity: modularity::modularity(index, labels),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.communities.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// ID of the community containing `vertex`.
    #[must_use]
    pub fn community_of(&self, vertex: VertexId) -> Option<u32> {
        self.communities
            .iter()
            .find(|c| c.members.binary_search(&vertex).is_ok())
            .map(|c| c.id)
    }

    /// Per-vertex community IDs, modularity, and per-community styles.
    #[must_use]
    pub fn to_columns(&self) -> MetricColumns {
        let mut membership = BTreeMap::new();
        for community in &self.communities {
            let id = MetricValue::Int(i32::try_from(community.id).unwrap_or(i32::MAX));
            for &v in &community.members {
                membership.insert(v, id.clone());
            }
        }

        let colors = self
            .communities
            .iter()
            .map(|c| (RowKey::Community(c.id), MetricValue::Text(c.style.color.to_string())))
            .collect();
        let shapes = self
            .communities
            .iter()
            .map(|c| (RowKey::Community(c.id), MetricValue::Text(c.style.shape.to_string())))
            .collect();

        vec![
            MetricColumn::per_vertex(MetricKind::Community, membership),
            MetricColumn::scalar(MetricKind::Modularity, MetricValue::Double(self.modularity)),
            MetricColumn::rows(MetricKind::CommunityColor, colors),
            MetricColumn::rows(MetricKind::CommunityShape, shapes),
        ]
        .into()
    }
}

/// Partition the context's graph with the configured algorithm.
#[instrument(skip(graph, ctx), fields(graph = %graph.id()))]
pub fn detect_communities<V, E>(
    graph: &Graph<V, E>,
    ctx: &CalculationContext<'_>,
) -> Outcome<Partition> {
    let algorithm = ctx.config().clusters.algorithm;
    let labels = netmetrics_core::completed_or_return!(match algorithm {
        ClusterAlgorithm::ClausetNewmanMoore => greedy_modularity(ctx, MergeWeighting::Plain),
        ClusterAlgorithm::WakitaTsurumi => {
            greedy_modularity(ctx, MergeWeighting::ConsolidationRatio)
        }
        ClusterAlgorithm::GirvanNewman => girvan_newman::girvan_newman(graph, ctx),
    });

    let partition = Partition::from_labels(ctx.index(), &labels, algorithm);
    debug!(
        ?algorithm,
        communities = partition.len(),
        modularity = partition.modularity,
        "communities detected"
    );
    Outcome::Completed(partition)
}

/// Produces `community`, `modularity`, `community_color` and
/// `community_shape`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterCalculator;

impl<V, E> GraphMetricCalculator<V, E> for ClusterCalculator {
    fn name(&self) -> &'static str {
        "clusters"
    }

    fn is_enabled(&self, flags: &MetricFlags) -> bool {
        flags.clusters
    }

    fn calculate(
        &self,
        graph: &Graph<V, E>,
        ctx: &CalculationContext<'_>,
    ) -> Outcome<MetricColumns> {
        detect_communities(graph, ctx).map(|partition| partition.to_columns())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
