use std::collections::{BTreeSet, VecDeque};

use proptest::prelude::*;

use netmetrics_calc::metrics::eigenvector::eigenvector_centrality_from;
use netmetrics_calc::{brandes_centralities, clustering_coefficients, connected_components};
use netmetrics_core::{
    CalculationContext, CancellationToken, DenseIndex, Directedness, Graph, MetricsConfig,
    NoProgress, VertexId,
};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Simple undirected graph: vertex count plus distinct non-loop edges.
fn arb_simple_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..30).prop_flat_map(|n| {
        let pairs = prop::collection::vec((0..n, 0..n), 0..(n * 2));
        pairs.prop_map(move |raw| {
            let edges: BTreeSet<(usize, usize)> = raw
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect();
            (n, edges.into_iter().collect())
        })
    })
}

/// Any graph the model accepts: one directedness per graph, a per-edge
/// direction flag that only matters for mixed graphs, and no filtering of
/// self-loops or parallel edges.
#[derive(Debug, Clone)]
struct AnyGraph {
    directedness: Directedness,
    n: usize,
    edges: Vec<(usize, usize, bool)>,
}

impl AnyGraph {
    fn build(&self) -> Graph {
        let mut graph = Graph::new(self.directedness);
        let vertices: Vec<VertexId> = (0..self.n).map(|_| graph.add_vertex(())).collect();
        for &(a, b, directed) in &self.edges {
            let directed = match self.directedness {
                Directedness::Undirected => false,
                Directedness::Directed => true,
                Directedness::Mixed => directed,
            };
            graph
                .add_edge_with_direction(vertices[a], vertices[b], directed, ())
                .expect("direction matches the graph");
        }
        graph
    }
}

fn arb_any_graph() -> impl Strategy<Value = AnyGraph> {
    let directedness = prop_oneof![
        Just(Directedness::Undirected),
        Just(Directedness::Directed),
        Just(Directedness::Mixed),
    ];
    (directedness, 1usize..16).prop_flat_map(|(directedness, n)| {
        // Few endpoints and many draws, so parallel edges and loops are common.
        let edges = prop::collection::vec((0..n, 0..n, any::<bool>()), 0..(n * 3));
        edges.prop_map(move |edges| AnyGraph {
            directedness,
            n,
            edges,
        })
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> (Graph, Vec<VertexId>) {
    let mut graph = Graph::new(Directedness::Undirected);
    let vertices: Vec<VertexId> = (0..n).map(|_| graph.add_vertex(())).collect();
    for &(a, b) in edges {
        graph
            .add_edge(vertices[a], vertices[b], ())
            .expect("endpoints belong to the graph");
    }
    (graph, vertices)
}

// ---------------------------------------------------------------------------
// Brute-force reference
// ---------------------------------------------------------------------------

/// Distances and shortest-path counts from `source`.
fn bfs(adjacency: &[Vec<usize>], source: usize) -> (Vec<Option<usize>>, Vec<f64>) {
    let n = adjacency.len();
    let mut dist = vec![None; n];
    let mut sigma = vec![0.0; n];
    dist[source] = Some(0);
    sigma[source] = 1.0;
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        let dv = dist[v].expect("queued vertices have a distance");
        for &w in &adjacency[v] {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(dv + 1) {
                sigma[w] += sigma[v];
            }
        }
    }
    (dist, sigma)
}

/// Unnormalized betweenness from pair counting over unordered pairs.
fn brute_force_betweenness(n: usize, edges: &[(usize, usize)]) -> Vec<f64> {
    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in edges {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    let tables: Vec<_> = (0..n).map(|s| bfs(&adjacency, s)).collect();

    let mut scores = vec![0.0; n];
    for s in 0..n {
        for t in s + 1..n {
            let Some(d_st) = tables[s].0[t] else {
                continue;
            };
            let sigma_st = tables[s].1[t];
            for v in 0..n {
                if v == s || v == t {
                    continue;
                }
                let on_path = matches!(
                    (tables[s].0[v], tables[v].0[t]),
                    (Some(d_sv), Some(d_vt)) if d_sv + d_vt == d_st
                );
                if on_path {
                    scores[v] += tables[s].1[v] * tables[v].1[t] / sigma_st;
                }
            }
        }
    }
    scores
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn brandes_matches_pair_counting((n, edges) in arb_simple_graph()) {
        let (g, vertices) = build(n, &edges);
        let config = MetricsConfig::default();
        let token = CancellationToken::new();
        let ctx = CalculationContext::new(&g, &config, &token, &NoProgress);

        let result = brandes_centralities(&ctx).completed().expect("not cancelled");
        let expected = brute_force_betweenness(n, &edges);
        for (pos, v) in vertices.iter().enumerate() {
            let raw = result.raw_betweenness[v];
            let want = expected[pos];
            prop_assert!((raw - want).abs() < 1e-9, "vertex {pos}: {raw} vs {want}");
        }
    }

    #[test]
    fn centralities_stay_in_unit_range(spec in arb_any_graph()) {
        let g = spec.build();
        let config = MetricsConfig::default();
        let token = CancellationToken::new();
        let ctx = CalculationContext::new(&g, &config, &token, &NoProgress);

        let result = brandes_centralities(&ctx).completed().expect("not cancelled");
        for score in result.betweenness.values().chain(result.closeness.values()) {
            prop_assert!((0.0..=1.0 + 1e-12).contains(score), "score {score} out of range");
        }
        if result.raw_betweenness.values().any(|&x| x > 0.0) {
            let top = result.betweenness.values().copied().fold(0.0_f64, f64::max);
            prop_assert!((top - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn clustering_in_unit_range_or_sentinel(spec in arb_any_graph()) {
        let g = spec.build();
        let config = MetricsConfig::default();
        let token = CancellationToken::new();
        let ctx = CalculationContext::new(&g, &config, &token, &NoProgress);
        let index = DenseIndex::build(&g);

        let result = clustering_coefficients(&ctx).completed().expect("not cancelled");
        prop_assert_eq!(result.values.len(), spec.n);
        for (v, value) in &result.values {
            let pos = index.position(*v).expect("vertex is indexed");
            let k = index.neighbors(pos).len();
            match value {
                None => prop_assert!(k < 2, "degree {k} left undefined"),
                Some(c) => {
                    prop_assert!(k >= 2, "degree {k} given a coefficient");
                    prop_assert!((0.0..=1.0).contains(c), "coefficient {c} out of range");
                }
            }
        }
        let duplicated = ctx.duplicates().has_duplicates();
        prop_assert_eq!(result.suspect, duplicated);
    }

    #[test]
    fn components_cover_every_vertex_once((n, edges) in arb_simple_graph()) {
        let (g, _) = build(n, &edges);
        let index = DenseIndex::build(&g);
        let components = connected_components(&index);

        let mut seen = BTreeSet::new();
        for component in &components {
            prop_assert!(!component.is_empty());
            for &v in component {
                prop_assert!(seen.insert(v), "vertex listed twice");
            }
        }
        prop_assert_eq!(seen.len(), n);
        for window in components.windows(2) {
            prop_assert!(window[0].len() >= window[1].len());
        }
    }

    #[test]
    fn eigenvector_ignores_start_scale(
        (n, edges) in arb_simple_graph(),
        factor in 0.01f64..100.0,
    ) {
        let (g, _) = build(n, &edges);
        let config = MetricsConfig::default();
        let token = CancellationToken::new();
        let ctx = CalculationContext::new(&g, &config, &token, &NoProgress);

        let start: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();
        let scaled: Vec<f64> = start.iter().map(|x| x * factor).collect();
        let a = eigenvector_centrality_from(&ctx, &start).completed().expect("not cancelled");
        let b = eigenvector_centrality_from(&ctx, &scaled).completed().expect("not cancelled");
        for (v, score) in &a.scores {
            prop_assert!((score - b.scores[v]).abs() < 1e-6);
        }
    }

    #[test]
    fn cancelled_token_yields_nothing((n, edges) in arb_simple_graph()) {
        let (g, _) = build(n, &edges);
        let config = MetricsConfig::default();
        let token = CancellationToken::new();
        token.cancel();
        let ctx = CalculationContext::new(&g, &config, &token, &NoProgress);

        prop_assert!(brandes_centralities(&ctx).is_cancelled());
        prop_assert!(eigenvector_centrality_from(&ctx, &[]).is_cancelled());
    }
}
