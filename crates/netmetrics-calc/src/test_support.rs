//! Graph builders shared by unit tests.

use netmetrics_core::{
    CalculationContext, CancellationToken, Directedness, Graph, MetricsConfig, NoProgress,
    VertexId,
};

/// `n` vertices and the given edges between their positions. Edge direction
/// follows the graph's directedness.
pub fn build(
    directedness: Directedness,
    n: usize,
    edges: &[(usize, usize)],
) -> (Graph, Vec<VertexId>) {
    let mut g = Graph::new(directedness);
    let vs: Vec<VertexId> = (0..n).map(|_| g.add_vertex(())).collect();
    for &(a, b) in edges {
        g.add_edge(vs[a], vs[b], ()).expect("edge endpoints are local");
    }
    (g, vs)
}

/// Undirected path `0 - 1 - ... - n-1`.
pub fn path(n: usize) -> (Graph, Vec<VertexId>) {
    let edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
    build(Directedness::Undirected, n, &edges)
}

/// Undirected complete graph on `n` vertices.
pub fn complete(n: usize) -> (Graph, Vec<VertexId>) {
    let mut edges = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            edges.push((a, b));
        }
    }
    build(Directedness::Undirected, n, &edges)
}

pub fn with_ctx<R>(graph: &Graph, f: impl FnOnce(&CalculationContext<'_>) -> R) -> R {
    with_config(graph, &MetricsConfig::default(), f)
}

pub fn with_config<R>(
    graph: &Graph,
    config: &MetricsConfig,
    f: impl FnOnce(&CalculationContext<'_>) -> R,
) -> R {
    let token = CancellationToken::new();
    let ctx = CalculationContext::new(graph, config, &token, &NoProgress);
    f(&ctx)
}

/// Run `f` with a context whose token is already cancelled.
pub fn with_cancelled<R>(graph: &Graph, f: impl FnOnce(&CalculationContext<'_>) -> R) -> R {
    let config = MetricsConfig::default();
    let token = CancellationToken::new();
    token.cancel();
    let ctx = CalculationContext::new(graph, &config, &token, &NoProgress);
    f(&ctx)
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{what}: expected {expected}, got {actual}"
    );
}
