#![forbid(unsafe_code)]
//! netmetrics-core library.
//!
//! The in-memory graph model and the execution protocol shared by every
//! metric calculator.
//!
//! # Conventions
//!
//! - **Errors**: structural graph errors are [`GraphError`]; configuration
//!   loading uses `anyhow::Result`. Cancellation is an [`Outcome`], not an
//!   error.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod columns;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod outcome;
pub mod progress;

pub use columns::{ColumnValues, MetricColumn, MetricColumns, MetricKind, MetricValue, RowKey};
pub use config::{
    ClusterAlgorithm, ClusterConfig, EigenvectorConfig, MetricFlags, MetricsConfig,
    PageRankConfig, ProgressConfig, load_config,
};
pub use context::CalculationContext;
pub use error::{ErrorCode, GraphError};
pub use graph::{
    DenseIndex, Directedness, DuplicateEdgeReport, Edge, EdgeId, EdgeKey, Graph, GraphId,
    VertexId,
};
pub use outcome::Outcome;
pub use progress::{CancellationToken, NoProgress, Progress, ProgressLog, ProgressSink};
