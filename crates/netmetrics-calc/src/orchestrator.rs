//! Running every enabled calculator over one graph.
//!
//! # Overview
//!
//! [`MetricOrchestrator::run`] builds one [`CalculationContext`] and invokes
//! the calculators in a fixed order:
//!
//! 1. overall metrics
//! 2. vertex degree
//! 3. reciprocated vertex pair ratio
//! 4. betweenness and closeness
//! 5. eigenvector centrality
//! 6. PageRank
//! 7. clustering coefficient
//! 8. connected components
//! 9. clusters, then group metrics over the same partition
//!
//! If any calculator is cancelled, the run returns [`Outcome::Cancelled`]
//! and discards everything computed so far.
//!
//! [`MetricOrchestrator::spawn`] performs the same run on a dedicated
//! worker thread and hands back a [`BackgroundRun`] for cancelling,
//! watching progress and collecting the result.

use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use netmetrics_core::{
    CalculationContext, CancellationToken, ErrorCode, Graph, MetricColumns, MetricsConfig,
    Outcome, Progress, ProgressSink, completed_or_return, load_config,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::calculator::{GraphMetricCalculator, progress_label};
use crate::community::group::GroupMetricCalculator;
use crate::community::{ClusterCalculator, Partition, detect_communities};
use crate::metrics::brandes::BrandesCalculator;
use crate::metrics::clustering::ClusteringCoefficientCalculator;
use crate::metrics::components::ConnectedComponentCalculator;
use crate::metrics::degree::DegreeCalculator;
use crate::metrics::eigenvector::EigenvectorCalculator;
use crate::metrics::overall::OverallMetricCalculator;
use crate::metrics::pagerank::PageRankCalculator;
use crate::metrics::reciprocity::ReciprocityCalculator;

/// Name given to background worker threads.
pub const WORKER_THREAD_NAME: &str = "netmetrics-worker";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of the background worker itself. Cancellation is not one.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("{}: metrics worker could not be started: {0}", ErrorCode::WorkerSpawnFailed)]
    WorkerSpawnFailed(#[source] std::io::Error),

    #[error("{}: metrics worker panicked: {0}", ErrorCode::WorkerPanicked)]
    WorkerPanicked(String),
}

impl OrchestrationError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::WorkerSpawnFailed(_) => ErrorCode::WorkerSpawnFailed,
            Self::WorkerPanicked(_) => ErrorCode::WorkerPanicked,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything one completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub columns: MetricColumns,
    /// The community partition, when clusters or group metrics were
    /// requested.
    pub partition: Option<Partition>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MetricOrchestrator {
    config: MetricsConfig,
}

impl MetricOrchestrator {
    #[must_use]
    pub const fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Load the configuration from a TOML file (defaults if it is missing).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_config_file(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(load_config(path)?))
    }

    #[must_use]
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Run every enabled calculator over `graph` on the calling thread.
    #[instrument(skip_all, fields(graph = %graph.id(), vertices = graph.vertex_count()))]
    pub fn run<V, E>(
        &self,
        graph: &Graph<V, E>,
        token: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Outcome<MetricsReport> {
        let ctx = CalculationContext::new(graph, &self.config, token, progress);
        let flags = ctx.flags();

        let calculators: [&dyn GraphMetricCalculator<V, E>; 8] = [
            &OverallMetricCalculator,
            &DegreeCalculator,
            &ReciprocityCalculator,
            &BrandesCalculator,
            &EigenvectorCalculator,
            &PageRankCalculator,
            &ClusteringCoefficientCalculator,
            &ConnectedComponentCalculator,
        ];

        let mut columns = MetricColumns::new();
        for calculator in calculators {
            columns.append(completed_or_return!(calculator.attempt(graph, &ctx)));
        }

        let partition = if flags.clusters || flags.group_metrics {
            let name = GraphMetricCalculator::<V, E>::name(&ClusterCalculator);
            ctx.report(0, 1, &progress_label(name));
            let partition = completed_or_return!(detect_communities(graph, &ctx));
            if flags.clusters {
                columns.append(partition.to_columns());
            }
            let groups = GroupMetricCalculator::new(partition.clone());
            columns.append(completed_or_return!(groups.attempt(graph, &ctx)));
            Some(partition)
        } else {
            None
        };

        let suspect: Vec<&str> = columns
            .iter()
            .filter(|c| c.suspect)
            .map(|c| c.kind.name())
            .collect();
        if !suspect.is_empty() {
            warn!(
                duplicates = ctx.duplicates().edges_with_duplicates,
                ?suspect,
                "duplicate edges make these metrics unreliable"
            );
        }
        info!(columns = columns.len(), "metrics run finished");

        Outcome::Completed(MetricsReport { columns, partition })
    }

    /// Run on a dedicated worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::WorkerSpawnFailed`] if the thread
    /// cannot be created.
    pub fn spawn<V, E>(&self, graph: Arc<Graph<V, E>>) -> Result<BackgroundRun, OrchestrationError>
    where
        V: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Progress>();
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let orchestrator = self.clone();

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || orchestrator.run(&graph, &worker_token, &sender))
            .map_err(OrchestrationError::WorkerSpawnFailed)?;

        Ok(BackgroundRun {
            token,
            progress: receiver,
            handle,
        })
    }
}

// ---------------------------------------------------------------------------
// Background runs
// ---------------------------------------------------------------------------

/// Handle to a run executing on a worker thread.
///
/// Dropping the handle detaches the worker; call [`cancel`](Self::cancel)
/// first to stop it early.
#[derive(Debug)]
pub struct BackgroundRun {
    token: CancellationToken,
    progress: Receiver<Progress>,
    handle: JoinHandle<Outcome<MetricsReport>>,
}

impl BackgroundRun {
    /// Ask the worker to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Progress reports, in the order the worker sent them. The channel
    /// closes when the worker finishes.
    #[must_use]
    pub const fn progress(&self) -> &Receiver<Progress> {
        &self.progress
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::WorkerPanicked`] if the worker
    /// panicked.
    pub fn join(self) -> Result<Outcome<MetricsReport>, OrchestrationError> {
        self.handle
            .join()
            .map_err(|payload| OrchestrationError::WorkerPanicked(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
