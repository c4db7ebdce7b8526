use nm_core::errors::NmError;
use nm_core::{Edge, NodeId};
use nm_graph::{DuplicatePolicy, Graph, GraphConfig};

fn n(index: usize) -> NodeId {
    NodeId::new(index)
}

fn path_graph() -> Graph {
    Graph::from_edges(4, GraphConfig::undirected(), [(0, 1), (1, 2), (2, 3)]).unwrap()
}

#[test]
fn undirected_edges_are_symmetric() {
    let graph = path_graph();
    assert!(graph.has_edge(n(1), n(0)));
    assert!(graph.has_edge(n(0), n(1)));
    assert_eq!(graph.degree(n(1)), 2);
    assert_eq!(graph.in_degree(n(1)), 2);
    assert_eq!(graph.number_of_edges(), 3);

    let edges: Vec<Edge> = graph.edges().collect();
    assert_eq!(edges.len(), 3);
    assert!(edges.iter().all(|edge| edge.u <= edge.v));
    // restartable
    assert_eq!(graph.edges().count(), 3);
}

#[test]
fn directed_degrees_are_tracked_separately() {
    let graph =
        Graph::from_edges(3, GraphConfig::directed(), [(0, 1), (0, 2), (2, 1)]).unwrap();
    assert_eq!(graph.out_degree(n(0)), 2);
    assert_eq!(graph.in_degree(n(0)), 0);
    assert_eq!(graph.in_degree(n(1)), 2);
    assert!(graph.has_edge(n(2), n(1)));
    assert!(!graph.has_edge(n(1), n(2)));
    assert_eq!(graph.in_neighbors(n(1)).len(), 2);
}

#[test]
fn out_of_range_nodes_are_rejected() {
    let mut graph = path_graph();
    let err = graph.add_edge(n(0), n(9)).unwrap_err();
    match err {
        NmError::InvalidEdge(info) => assert_eq!(info.code, "node-out-of-range"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!graph.has_edge(n(0), n(9)));
    assert_eq!(graph.number_of_edges(), 3);
}

#[test]
fn self_loops_follow_config() {
    let mut graph = path_graph();
    let err = graph.add_edge(n(2), n(2)).unwrap_err();
    assert_eq!(err.info().code, "self-loop");

    let mut looped = Graph::new(3, GraphConfig::directed().with_self_loops(true)).unwrap();
    assert!(looped.add_edge(n(2), n(2)).unwrap());
    assert_eq!(looped.number_of_self_loops(), 1);
    assert_eq!(looped.out_degree(n(2)), 1);
    assert_eq!(looped.in_degree(n(2)), 1);
    looped.remove_edge(n(2), n(2)).unwrap();
    assert_eq!(looped.number_of_self_loops(), 0);
}

#[test]
fn undirected_self_loop_config_is_invalid() {
    let err = Graph::new(3, GraphConfig::undirected().with_self_loops(true)).unwrap_err();
    match err {
        NmError::InvalidParameter(info) => assert_eq!(info.code, "undirected-self-loops"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn duplicates_follow_policy() {
    let mut graph = path_graph();
    let err = graph.add_edge(n(1), n(0)).unwrap_err();
    assert_eq!(err.info().code, "duplicate-edge");

    let config = GraphConfig::undirected().with_duplicates(DuplicatePolicy::Ignore);
    let mut lenient = Graph::from_edges(3, config, [(0, 1)]).unwrap();
    assert!(!lenient.add_edge(n(1), n(0)).unwrap());
    assert_eq!(lenient.number_of_edges(), 1);
    assert_eq!(lenient.degree(n(0)), 1);
}

#[test]
fn removing_missing_edge_fails() {
    let mut graph = path_graph();
    let err = graph.remove_edge(n(0), n(3)).unwrap_err();
    assert_eq!(err.info().code, "missing-edge");
    graph.remove_edge(n(2), n(1)).unwrap();
    assert!(!graph.has_edge(n(1), n(2)));
    assert_eq!(graph.degree(n(1)), 1);
}

#[test]
fn swap_preserves_degrees() {
    let mut graph = path_graph();
    let before: Vec<usize> = graph.nodes().map(|node| graph.degree(node)).collect();
    // (0,1),(2,3) -> (0,3),(2,1): (2,1) exists, so the swap must be rejected
    let err = graph
        .swap_edges(Edge::from((0, 1)), Edge::from((2, 3)))
        .unwrap_err();
    assert_eq!(err.info().code, "duplicate-edge");
    assert_eq!(graph.number_of_edges(), 3);

    // (0,1),(3,2) -> (0,2),(3,1)
    graph
        .swap_edges(Edge::from((0, 1)), Edge::from((3, 2)))
        .unwrap();
    assert!(graph.has_edge(n(0), n(2)));
    assert!(graph.has_edge(n(1), n(3)));
    let after: Vec<usize> = graph.nodes().map(|node| graph.degree(node)).collect();
    assert_eq!(before, after);
}

#[test]
fn ith_neighbor_and_relabel() {
    let graph = path_graph();
    assert!(graph.ith_neighbor(n(0), 0).is_some());
    assert!(graph.ith_neighbor(n(0), 1).is_none());
    assert!(graph.ith_neighbor(n(9), 0).is_none());

    let permutation = vec![n(3), n(2), n(1), n(0)];
    let relabelled = graph.relabelled(&permutation).unwrap();
    assert_eq!(relabelled.edge_list(), graph.edge_list());

    let err = graph.relabelled(&[n(0), n(0), n(1), n(2)]).unwrap_err();
    assert_eq!(err.info().code, "permutation-repeats");
}
