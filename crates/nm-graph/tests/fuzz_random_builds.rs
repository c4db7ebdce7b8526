use nm_core::rng::RngHandle;
use nm_graph::{canonical_hash, gen_gnp, graph_from_bytes, graph_to_bytes, Graph};
use proptest::prelude::*;

fn check_invariants(graph: &Graph) {
    let listed: Vec<_> = graph.edges().collect();
    assert_eq!(listed.len(), graph.number_of_edges());
    let degree_sum: usize = graph.nodes().map(|node| graph.degree(node)).sum();
    if graph.is_directed() {
        let in_sum: usize = graph.nodes().map(|node| graph.in_degree(node)).sum();
        assert_eq!(degree_sum, graph.number_of_edges());
        assert_eq!(in_sum, graph.number_of_edges());
    } else {
        assert_eq!(degree_sum, 2 * graph.number_of_edges());
    }
    for edge in listed {
        assert!(graph.has_edge(edge.u, edge.v));
        assert!(!edge.is_self_loop());
    }
    graph
        .degree_sequence()
        .check_feasible(graph.allows_self_loops())
        .unwrap();
}

proptest! {
    #[test]
    fn random_graphs_respect_invariants(seed in any::<u64>(), nodes in 2usize..25, p in 0.0f64..1.0, directed in any::<bool>()) {
        let mut rng = RngHandle::from_seed(seed);
        let mut graph = gen_gnp(nodes, p, directed, &mut rng).unwrap();
        check_invariants(&graph);

        let bytes = graph_to_bytes(&graph).unwrap();
        let restored = graph_from_bytes(&bytes).unwrap();
        prop_assert_eq!(canonical_hash(&graph), canonical_hash(&restored));

        let edges = graph.edge_list();
        for edge in edges.into_iter().take(3) {
            graph.remove_edge(edge.u, edge.v).unwrap();
            check_invariants(&graph);
        }
    }
}
