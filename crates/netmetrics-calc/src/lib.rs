#![forbid(unsafe_code)]
//! netmetrics-calc library.
//!
//! Metric calculators over the `netmetrics-core` graph model, and the
//! orchestrator that runs them.
//!
//! # Conventions
//!
//! - Every calculator implements [`GraphMetricCalculator`] and returns an
//!   [`Outcome`](netmetrics_core::Outcome): cancellation yields no partial
//!   columns.
//! - Long loops call [`CalculationContext::checkpoint`] once per unit of
//!   work (one BFS source, one power iteration, one merge).
//! - **Logging**: `tracing` macros; `debug!` per calculator, `info!` for
//!   cancellation. Suspect results are logged at `debug!` by the calculator
//!   and at `warn!` once by the orchestrator.
//!
//! [`CalculationContext::checkpoint`]: netmetrics_core::CalculationContext::checkpoint

pub mod calculator;
pub mod community;
pub mod metrics;
pub mod orchestrator;

#[cfg(test)]
mod test_support;

pub use calculator::{GraphMetricCalculator, progress_label};
pub use community::group::{GroupMetricCalculator, GroupMetrics, group_metrics};
pub use community::{ClusterCalculator, Community, Partition, detect_communities};
pub use metrics::brandes::{BrandesCalculator, BrandesCentralities, brandes_centralities};
pub use metrics::clustering::{ClusteringCoefficientCalculator, clustering_coefficients};
pub use metrics::components::{ConnectedComponentCalculator, connected_components};
pub use metrics::degree::{DegreeCalculator, vertex_degrees};
pub use metrics::eigenvector::{EigenvectorCalculator, eigenvector_centrality};
pub use metrics::overall::{OverallMetricCalculator, OverallMetrics, overall_metrics};
pub use metrics::pagerank::{PageRankCalculator, pagerank};
pub use metrics::reciprocity::ReciprocityCalculator;
pub use orchestrator::{BackgroundRun, MetricOrchestrator, MetricsReport, OrchestrationError};
