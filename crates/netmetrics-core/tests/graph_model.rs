//! Graph model and calculation protocol, exercised through the public API.

use netmetrics_core::{
    CalculationContext, CancellationToken, DenseIndex, Directedness, DuplicateEdgeReport,
    ErrorCode, Graph, GraphError, MetricsConfig, ProgressLog, load_config,
};

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[test]
fn vertex_ids_are_bound_to_their_graph() {
    let mut a: Graph<&str> = Graph::new(Directedness::Undirected);
    let mut b: Graph<&str> = Graph::new(Directedness::Undirected);
    let x = a.add_vertex("x");
    let y = b.add_vertex("y");
    let z = b.add_vertex("z");

    let err = b.add_edge(x, y, ()).expect_err("foreign vertex");
    assert_eq!(err.code(), ErrorCode::ForeignVertex);
    assert!(b.add_edge(y, z, ()).is_ok());
    assert_eq!(a.edge_count(), 0);
}

#[test]
fn mixed_graphs_accept_both_edge_kinds() {
    let mut g = Graph::new(Directedness::Mixed);
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    g.add_edge_with_direction(a, b, true, ()).expect("directed");
    g.add_edge_with_direction(a, b, false, ()).expect("undirected");

    let report = DuplicateEdgeReport::detect(&g);
    assert!(!report.has_duplicates());
    assert_eq!(report.total_edges(), 2);

    let mut directed = Graph::new(Directedness::Directed);
    let c = directed.add_vertex(());
    let d = directed.add_vertex(());
    assert!(matches!(
        directed.add_edge_with_direction(c, d, false, ()),
        Err(GraphError::DirectednessMismatch { .. })
    ));
}

#[test]
fn removing_a_vertex_drops_its_edges() {
    let mut g = Graph::new(Directedness::Undirected);
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    let c = g.add_vertex(());
    g.add_edge(a, b, ()).expect("a-b");
    g.add_edge(b, c, ()).expect("b-c");

    g.remove_vertex(b).expect("b exists");
    assert_eq!(g.vertex_count(), 2);
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.remove_vertex(b).map_err(|e| e.code()), Err(ErrorCode::VertexNotFound));
}

#[test]
fn induced_subgraph_maps_back_to_parent() {
    let mut g = Graph::new(Directedness::Directed);
    let vs: Vec<_> = (0..4).map(|_| g.add_vertex(())).collect();
    let keep = g.add_edge(vs[0], vs[1], ()).expect("0->1");
    g.add_edge(vs[1], vs[2], ()).expect("1->2");
    g.add_edge(vs[3], vs[0], ()).expect("3->0");

    let sub = g.induced_subgraph(&[vs[1], vs[0]]);
    assert_eq!(sub.vertex_count(), 2);
    assert_eq!(sub.edge_count(), 1);
    let edge = sub.edges().next().expect("one edge");
    assert_eq!(sub.edge_tag(edge.id), Some(&keep));
    assert_eq!(sub.vertex_tag(edge.vertex1), Some(&vs[0]));
}

#[test]
fn dense_index_collapses_parallel_edges_and_loops() {
    let mut g = Graph::new(Directedness::Undirected);
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    g.add_edge(a, b, ()).expect("a-b");
    g.add_edge(b, a, ()).expect("b-a");
    g.add_edge(a, a, ()).expect("loop");

    let index = DenseIndex::build(&g);
    assert_eq!(index.neighbors(0), &[1]);
    assert!(index.is_symmetric());

    let report = DuplicateEdgeReport::detect(&g);
    assert_eq!(report.edges_with_duplicates, 2);
    assert_eq!(report.self_loops, 1);
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

#[test]
fn checkpoints_follow_the_configured_cadence() {
    let g: Graph = Graph::new(Directedness::Undirected);
    let mut config = MetricsConfig::default();
    config.progress.checkpoint_interval = 10;
    let token = CancellationToken::new();
    let log = ProgressLog::new();
    let ctx = CalculationContext::new(&g, &config, &token, &log);

    for i in 0..25 {
        assert!(!ctx.checkpoint(i, 25, "work"));
    }
    let percents: Vec<u8> = log.entries().iter().map(|p| p.percent).collect();
    assert_eq!(percents, vec![0, 40, 80]);

    token.cancel();
    assert!(!ctx.checkpoint(1, 25, "work"));
    assert!(ctx.checkpoint(20, 25, "work"));
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("netmetrics.toml");
    std::fs::write(
        &path,
        "[metrics]\npagerank = false\n\n\
         [pagerank]\ndamping = 0.9\n\n\
         [clusters]\nalgorithm = \"girvan-newman\"\n",
    )
    .expect("write config");

    let config = load_config(&path).expect("parses");
    assert!(!config.metrics.pagerank);
    assert!(config.metrics.betweenness);
    assert!((config.pagerank.damping - 0.9).abs() < 1e-12);

    std::fs::write(&path, "[metrics\n").expect("write broken config");
    let err = load_config(&path).expect_err("broken TOML");
    assert!(format!("{err:#}").contains("E2001"));
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = load_config(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.metrics, MetricsConfig::default().metrics);
}
