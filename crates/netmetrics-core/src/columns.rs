//! Named metric columns: the result surface handed to external callers.
//!
//! A column holds either a dense per-vertex value set
//! ([`ColumnValues::PerVertex`]) or an ordered sequence of rows tagged with
//! a [`RowKey`] ([`ColumnValues::Rows`]) for results that are not keyed by
//! vertex, such as whole-graph aggregates or per-community statistics.
//! Writing these into caller-owned storage is the caller's job.

use std::collections::BTreeMap;
use std::fmt;

use crate::graph::VertexId;

// ---------------------------------------------------------------------------
// MetricKind
// ---------------------------------------------------------------------------

/// Every column a calculator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    // per-vertex
    Degree,
    InDegree,
    OutDegree,
    BetweennessCentrality,
    ClosenessCentrality,
    EigenvectorCentrality,
    PageRank,
    ClusteringCoefficient,
    ReciprocatedVertexPairRatio,
    ConnectedComponent,
    Community,

    // whole graph
    VertexCount,
    UniqueEdges,
    EdgesWithDuplicates,
    TotalEdges,
    SelfLoops,
    Density,
    ConnectedComponents,
    SingleVertexComponents,
    MaxComponentVertices,
    MaxComponentEdges,
    MaxGeodesicDistance,
    AverageGeodesicDistance,
    OverallReciprocatedVertexPairRatio,
    ReciprocatedEdgeRatio,
    Modularity,

    // per community
    CommunityColor,
    CommunityShape,
    GroupVertices,
    GroupUniqueEdges,
    GroupEdgesWithDuplicates,
    GroupTotalEdges,
    GroupSelfLoops,
    GroupDensity,
    GroupConnectedComponents,
    GroupMaxGeodesicDistance,
}

impl MetricKind {
    /// Stable `snake_case` column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::InDegree => "in_degree",
            Self::OutDegree => "out_degree",
            Self::BetweennessCentrality => "betweenness_centrality",
            Self::ClosenessCentrality => "closeness_centrality",
            Self::EigenvectorCentrality => "eigenvector_centrality",
            Self::PageRank => "pagerank",
            Self::ClusteringCoefficient => "clustering_coefficient",
            Self::ReciprocatedVertexPairRatio => "reciprocated_vertex_pair_ratio",
            Self::ConnectedComponent => "connected_component",
            Self::Community => "community",
            Self::VertexCount => "vertices",
            Self::UniqueEdges => "unique_edges",
            Self::EdgesWithDuplicates => "edges_with_duplicates",
            Self::TotalEdges => "total_edges",
            Self::SelfLoops => "self_loops",
            Self::Density => "graph_density",
            Self::ConnectedComponents => "connected_components",
            Self::SingleVertexComponents => "single_vertex_connected_components",
            Self::MaxComponentVertices => "max_vertices_in_a_connected_component",
            Self::MaxComponentEdges => "max_edges_in_a_connected_component",
            Self::MaxGeodesicDistance => "max_geodesic_distance",
            Self::AverageGeodesicDistance => "average_geodesic_distance",
            Self::OverallReciprocatedVertexPairRatio => "overall_reciprocated_vertex_pair_ratio",
            Self::ReciprocatedEdgeRatio => "reciprocated_edge_ratio",
            Self::Modularity => "modularity",
            Self::CommunityColor => "community_color",
            Self::CommunityShape => "community_shape",
            Self::GroupVertices => "group_vertices",
            Self::GroupUniqueEdges => "group_unique_edges",
            Self::GroupEdgesWithDuplicates => "group_edges_with_duplicates",
            Self::GroupTotalEdges => "group_total_edges",
            Self::GroupSelfLoops => "group_self_loops",
            Self::GroupDensity => "group_density",
            Self::GroupConnectedComponents => "group_connected_components",
            Self::GroupMaxGeodesicDistance => "group_max_geodesic_distance",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// One cell of a metric column.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Int(i32),
    Double(f64),
    Text(String),
    /// The metric is undefined here (e.g. density of a one-vertex graph).
    NotApplicable,
}

impl MetricValue {
    /// Counts beyond `i32::MAX` saturate.
    #[must_use]
    pub fn count(n: usize) -> Self {
        Self::Int(i32::try_from(n).unwrap_or(i32::MAX))
    }

    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::NotApplicable, Self::Double)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::Text(_) | Self::NotApplicable => None,
        }
    }

    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// External row identifier for row-shaped columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    /// The single row of a whole-graph aggregate.
    Graph,
    /// One community, by its ID.
    Community(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    PerVertex(BTreeMap<VertexId, MetricValue>),
    Rows(Vec<(RowKey, MetricValue)>),
}

/// One named column of results.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub kind: MetricKind,
    pub values: ColumnValues,
    /// Set when duplicate edges make the values mathematically unreliable.
    pub suspect: bool,
}

impl MetricColumn {
    #[must_use]
    pub const fn per_vertex(kind: MetricKind, values: BTreeMap<VertexId, MetricValue>) -> Self {
        Self {
            kind,
            values: ColumnValues::PerVertex(values),
            suspect: false,
        }
    }

    /// A single-row whole-graph column.
    #[must_use]
    pub fn scalar(kind: MetricKind, value: MetricValue) -> Self {
        Self {
            kind,
            values: ColumnValues::Rows(vec![(RowKey::Graph, value)]),
            suspect: false,
        }
    }

    #[must_use]
    pub const fn rows(kind: MetricKind, rows: Vec<(RowKey, MetricValue)>) -> Self {
        Self {
            kind,
            values: ColumnValues::Rows(rows),
            suspect: false,
        }
    }

    #[must_use]
    pub const fn suspect(mut self, suspect: bool) -> Self {
        self.suspect = suspect;
        self
    }

    /// Value for `vertex` in a per-vertex column.
    #[must_use]
    pub fn vertex(&self, vertex: VertexId) -> Option<&MetricValue> {
        match &self.values {
            ColumnValues::PerVertex(map) => map.get(&vertex),
            ColumnValues::Rows(_) => None,
        }
    }

    /// Value for `key` in a row-shaped column.
    #[must_use]
    pub fn row(&self, key: RowKey) -> Option<&MetricValue> {
        match &self.values {
            ColumnValues::Rows(rows) => rows.iter().find(|(k, _)| *k == key).map(|(_, v)| v),
            ColumnValues::PerVertex(_) => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::PerVertex(map) => map.len(),
            ColumnValues::Rows(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The columns produced by one calculator or one whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricColumns {
    columns: Vec<MetricColumn>,
}

impl MetricColumns {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, column: MetricColumn) {
        self.columns.push(column);
    }

    pub fn append(&mut self, other: Self) {
        self.columns.extend(other.columns);
    }

    #[must_use]
    pub fn get(&self, kind: MetricKind) -> Option<&MetricColumn> {
        self.columns.iter().find(|c| c.kind == kind)
    }

    /// Shorthand for a whole-graph value.
    #[must_use]
    pub fn scalar(&self, kind: MetricKind) -> Option<&MetricValue> {
        self.get(kind).and_then(|c| c.row(RowKey::Graph))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricColumn> {
        self.columns.iter()
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<MetricKind> {
        self.columns.iter().map(|c| c.kind).collect()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<Vec<MetricColumn>> for MetricColumns {
    fn from(columns: Vec<MetricColumn>) -> Self {
        Self { columns }
    }
}

impl IntoIterator for MetricColumns {
    type Item = MetricColumn;
    type IntoIter = std::vec::IntoIter<MetricColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl FromIterator<MetricColumn> for MetricColumns {
    fn from_iter<I: IntoIterator<Item = MetricColumn>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
