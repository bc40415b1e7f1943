use std::collections::BTreeSet;

use proptest::prelude::*;

use netmetrics_core::{DenseIndex, Directedness, DuplicateEdgeReport, Graph, VertexId};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Vertex count plus raw `(a, b, directed)` edges; loops and parallel
/// edges are kept.
fn arb_edges() -> impl Strategy<Value = (Directedness, usize, Vec<(usize, usize, bool)>)> {
    let directedness = prop_oneof![
        Just(Directedness::Undirected),
        Just(Directedness::Directed),
        Just(Directedness::Mixed),
    ];
    (directedness, 1usize..12).prop_flat_map(|(directedness, n)| {
        let edges = prop::collection::vec((0..n, 0..n, any::<bool>()), 0..(n * 3));
        edges.prop_map(move |edges| (directedness, n, edges))
    })
}

fn build(
    directedness: Directedness,
    n: usize,
    edges: &[(usize, usize, bool)],
) -> (Graph, Vec<VertexId>) {
    let mut graph = Graph::new(directedness);
    let vertices: Vec<VertexId> = (0..n).map(|_| graph.add_vertex(())).collect();
    for &(a, b, directed) in edges {
        let directed = match directedness {
            Directedness::Undirected => false,
            Directedness::Directed => true,
            Directedness::Mixed => directed,
        };
        graph
            .add_edge_with_direction(vertices[a], vertices[b], directed, ())
            .expect("direction matches the graph");
    }
    (graph, vertices)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn duplicate_report_accounts_for_every_edge((directedness, n, edges) in arb_edges()) {
        let (g, _) = build(directedness, n, &edges);
        let report = DuplicateEdgeReport::detect(&g);

        prop_assert_eq!(report.unique_edges + report.edges_with_duplicates, g.edge_count());
        prop_assert_eq!(report.total_edges(), g.edge_count());
        prop_assert!(report.distinct_edges <= g.edge_count());
        prop_assert!(report.unique_edges <= report.distinct_edges);
        prop_assert_eq!(report.has_duplicates(), report.edges_with_duplicates > 0);
        prop_assert_eq!(report.self_loops, edges.iter().filter(|(a, b, _)| a == b).count());

        let flagged = g.edges().filter(|e| report.is_duplicated(e.id)).count();
        prop_assert_eq!(flagged, report.edges_with_duplicates);
    }

    #[test]
    fn undirected_dense_index_is_symmetric((_, n, edges) in arb_edges()) {
        let (g, _) = build(Directedness::Undirected, n, &edges);
        let index = DenseIndex::build(&g);

        prop_assert!(index.is_symmetric());
        prop_assert_eq!(index.len(), n);
        for pos in 0..index.len() {
            let neighbors = index.neighbors(pos);
            prop_assert_eq!(index.successors(pos), neighbors);
            prop_assert_eq!(index.predecessors(pos), neighbors);
            prop_assert!(!neighbors.contains(&pos), "self-loop leaked into adjacency");
            prop_assert!(neighbors.windows(2).all(|w| w[0] < w[1]), "unsorted or repeated");
            for &other in neighbors {
                prop_assert!(index.adjacent(other, pos));
            }
        }
    }

    #[test]
    fn removed_vertices_stay_gone(
        (directedness, n, edges) in arb_edges(),
        doomed in prop::collection::btree_set(0usize..12, 0..6),
        refill in 0usize..6,
    ) {
        let (mut g, vertices) = build(directedness, n, &edges);
        let removed: BTreeSet<usize> = doomed.into_iter().filter(|&i| i < n).collect();
        for &i in &removed {
            g.remove_vertex(vertices[i]).expect("vertex present");
        }
        let added: Vec<VertexId> = (0..refill).map(|_| g.add_vertex(())).collect();

        let index = DenseIndex::build(&g);
        prop_assert_eq!(index.len(), n - removed.len() + refill);
        for (i, &v) in vertices.iter().enumerate() {
            let alive = !removed.contains(&i);
            prop_assert_eq!(g.contains_vertex(v), alive);
            prop_assert_eq!(index.position(v).is_some(), alive);
        }
        for &v in &added {
            prop_assert!(g.contains_vertex(v));
            prop_assert!(!vertices.contains(&v), "new vertex reused an old ID");
        }
    }
}
