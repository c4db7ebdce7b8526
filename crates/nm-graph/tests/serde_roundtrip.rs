use nm_core::rng::RngHandle;
use nm_graph::{
    canonical_hash, gen_gnp, graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json,
    read_graph, write_graph, Graph, GraphConfig,
};

#[test]
fn hash_ignores_insertion_order() {
    let a = Graph::from_edges(4, GraphConfig::undirected(), [(0, 1), (2, 3), (1, 2)]).unwrap();
    let b = Graph::from_edges(4, GraphConfig::undirected(), [(2, 1), (3, 2), (1, 0)]).unwrap();
    assert_eq!(canonical_hash(&a), canonical_hash(&b));

    let directed = Graph::from_edges(4, GraphConfig::directed(), [(0, 1), (2, 3), (1, 2)]).unwrap();
    assert_ne!(canonical_hash(&a), canonical_hash(&directed));
}

#[test]
fn json_and_bytes_preserve_structure() {
    let mut rng = RngHandle::from_seed(11);
    let graph = gen_gnp(30, 0.2, true, &mut rng).unwrap();

    let json = graph_to_json(&graph).unwrap();
    let from_json = graph_from_json(&json).unwrap();
    assert_eq!(canonical_hash(&graph), canonical_hash(&from_json));

    let bytes = graph_to_bytes(&graph).unwrap();
    let from_bytes = graph_from_bytes(&bytes).unwrap();
    assert_eq!(graph.edge_list(), from_bytes.edge_list());
}

#[test]
fn corrupt_payloads_are_rejected() {
    let err = graph_from_json("{\"nodes\": 2}").unwrap_err();
    assert_eq!(err.info().code, "deserialize-json");

    let bad_edge = r#"{"config":{"directed":false},"nodes":2,"edges":[[0,5]]}"#;
    let err = graph_from_json(bad_edge).unwrap_err();
    assert_eq!(err.info().code, "node-out-of-range");
}

#[test]
fn file_hooks_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let graph = Graph::from_edges(5, GraphConfig::undirected(), [(0, 4), (1, 3)]).unwrap();
    write_graph(&graph, &path).unwrap();
    let restored = read_graph(&path).unwrap();
    assert_eq!(canonical_hash(&graph), canonical_hash(&restored));

    let err = read_graph(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.info().code, "graph-read");
}
