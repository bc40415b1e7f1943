//! Per-run calculation context.
//!
//! A [`CalculationContext`] is created once per orchestration run and shared
//! read-only by every calculator. It bundles:
//!
//! - the metric flags and tuning parameters ([`MetricsConfig`]),
//! - the cancellation token and progress sink,
//! - work precomputed once from the graph: the [`DenseIndex`] used as flat
//!   scratch space and the [`DuplicateEdgeReport`] used to flag suspect
//!   results.

use tracing::debug;

use crate::config::{MetricFlags, MetricsConfig};
use crate::graph::{DenseIndex, Directedness, DuplicateEdgeReport, Graph, GraphId};
use crate::progress::{CancellationToken, NoProgress, Progress, ProgressSink};

/// Immutable inputs shared by every calculator in one run.
pub struct CalculationContext<'a> {
    graph: GraphId,
    directedness: Directedness,
    config: &'a MetricsConfig,
    token: &'a CancellationToken,
    progress: &'a dyn ProgressSink,
    interval: usize,
    index: DenseIndex,
    duplicates: DuplicateEdgeReport,
}

impl<'a> CalculationContext<'a> {
    /// Precompute the dense index and duplicate report for `graph`.
    #[must_use]
    pub fn new<V, E>(
        graph: &Graph<V, E>,
        config: &'a MetricsConfig,
        token: &'a CancellationToken,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        let index = DenseIndex::build(graph);
        let duplicates = DuplicateEdgeReport::detect(graph);
        debug!(
            graph = %graph.id(),
            vertices = index.len(),
            duplicates = duplicates.edges_with_duplicates,
            self_loops = duplicates.self_loops,
            "calculation context ready"
        );
        Self {
            graph: graph.id(),
            directedness: graph.directedness(),
            config,
            token,
            progress,
            interval: config.progress.effective_interval(),
            index,
            duplicates,
        }
    }

    /// A context for a graph derived from this one, such as one
    /// community's induced subgraph.
    ///
    /// Shares the configuration and cancellation token but reports no
    /// progress: the caller reports on behalf of the whole derived pass.
    #[must_use]
    pub fn derive<V, E>(&self, graph: &Graph<V, E>) -> Self {
        let index = DenseIndex::build(graph);
        let duplicates = DuplicateEdgeReport::detect(graph);
        Self {
            graph: graph.id(),
            directedness: graph.directedness(),
            config: self.config,
            token: self.token,
            progress: &NoProgress,
            interval: self.interval,
            index,
            duplicates,
        }
    }

    /// The graph this context was built for.
    #[must_use]
    pub const fn graph_id(&self) -> GraphId {
        self.graph
    }

    #[must_use]
    pub const fn directedness(&self) -> Directedness {
        self.directedness
    }

    #[must_use]
    pub const fn config(&self) -> &MetricsConfig {
        self.config
    }

    #[must_use]
    pub const fn flags(&self) -> &MetricFlags {
        &self.config.metrics
    }

    #[must_use]
    pub const fn index(&self) -> &DenseIndex {
        &self.index
    }

    #[must_use]
    pub const fn duplicates(&self) -> &DuplicateEdgeReport {
        &self.duplicates
    }

    #[must_use]
    pub const fn checkpoint_interval(&self) -> usize {
        self.interval
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Send one progress report.
    pub fn report(&self, done: usize, total: usize, description: &str) {
        self.progress.report(Progress::of(done, total, description));
    }

    /// Cooperative checkpoint for item `done` of `total`.
    ///
    /// On every `checkpoint_interval`-th item (item 0 included) this reports
    /// progress and returns `true` if cancellation has been requested.
    /// Between checkpoints it returns `false` without touching the token.
    #[must_use]
    pub fn checkpoint(&self, done: usize, total: usize, description: &str) -> bool {
        if done % self.interval != 0 {
            return false;
        }
        self.report(done, total, description);
        self.token.is_cancelled()
    }

    /// Checkpoint for iterative solvers whose single step already walks the
    /// whole graph: progress still follows the cadence, but the token is
    /// polled on every step.
    #[must_use]
    pub fn step_checkpoint(&self, step: usize, max_steps: usize, description: &str) -> bool {
        if step % self.interval == 0 {
            self.report(step, max_steps, description);
        }
        self.token.is_cancelled()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
