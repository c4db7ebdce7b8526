use nm_core::rng::RngHandle;
use nm_graph::{gen_gnp, Graph, GraphConfig};
use nm_rand::{EdgeSwitching, EdgeSwitchingInPlace, MoveKind, Randomization};

fn fixture(seed: u64) -> Graph {
    let mut rng = RngHandle::from_seed(seed);
    gen_gnp(100, 0.1, false, &mut rng).unwrap()
}

#[test]
fn switching_changes_edges_only_when_asked() {
    let graph = fixture(42);
    let m = graph.number_of_edges() as u64;
    for (switches_per_edge, pre_shuffle) in [(0.0, false), (0.0, true), (1.0, false)] {
        let mut engine =
            EdgeSwitching::new(&graph, switches_per_edge, pre_shuffle, RngHandle::from_seed(8))
                .unwrap();
        engine.run().unwrap();
        let result = engine.graph();
        assert_eq!(result.degree_sequence(), graph.degree_sequence());
        assert_eq!(result.number_of_edges(), graph.number_of_edges());

        let changed = result.edge_list() != graph.edge_list();
        assert_eq!(changed, switches_per_edge > 0.0 || pre_shuffle);

        let attempts = (switches_per_edge * m as f64).ceil() as u64;
        assert_eq!(engine.statistics().attempted(MoveKind::EdgeSwitch), attempts);
        assert!(engine.number_of_affected_edges() >= attempts / 2);
    }
}

#[test]
fn directed_switching_preserves_in_and_out_degrees() {
    let mut rng = RngHandle::from_seed(3);
    let graph = gen_gnp(50, 0.1, true, &mut rng).unwrap();
    let mut engine = EdgeSwitching::new(&graph, 5.0, false, rng.fork()).unwrap();
    engine.run().unwrap();
    engine.run().unwrap();
    assert_eq!(engine.graph().degree_sequence(), graph.degree_sequence());
    assert_eq!(engine.graph().number_of_self_loops(), 0);
    assert_eq!(
        engine.statistics().attempted(MoveKind::EdgeSwitch),
        2 * 5 * graph.number_of_edges() as u64
    );
}

#[test]
fn tiny_graphs_make_no_attempts() {
    let graph = Graph::from_edges(3, GraphConfig::undirected(), [(0, 1)]).unwrap();
    let mut engine = EdgeSwitching::new(&graph, 10.0, false, RngHandle::from_seed(1)).unwrap();
    engine.run().unwrap();
    assert_eq!(engine.number_of_affected_edges(), 0);
    assert_eq!(engine.graph().edge_list(), graph.edge_list());
}

#[test]
fn invalid_multipliers_are_rejected() {
    let graph = fixture(1);
    let err = EdgeSwitching::new(&graph, -0.5, false, RngHandle::from_seed(1)).unwrap_err();
    assert_eq!(err.info().code, "switches-per-edge");

    let mut engine = EdgeSwitching::new(&graph, 1.0, false, RngHandle::from_seed(1)).unwrap();
    assert!(engine.set_switches_per_edge(f64::NAN).is_err());
    assert_eq!(engine.switches_per_edge(), 1.0);
    engine.set_switches_per_edge(2.5).unwrap();
    assert_eq!(engine.switches_per_edge(), 2.5);
}

#[test]
fn in_place_switching_mutates_borrowed_graph() {
    let original = fixture(42);

    let mut untouched = original.clone();
    {
        let mut engine =
            EdgeSwitchingInPlace::new(&mut untouched, 0.0, RngHandle::from_seed(8)).unwrap();
        engine.run().unwrap();
        assert_eq!(engine.number_of_affected_edges(), 0);
    }
    assert_eq!(untouched.edge_list(), original.edge_list());

    let mut switched = original.clone();
    let affected = {
        let mut engine =
            EdgeSwitchingInPlace::new(&mut switched, 1.0, RngHandle::from_seed(8)).unwrap();
        engine.run().unwrap();
        assert_eq!(engine.label(), "edge-switching-in-place");
        engine.number_of_affected_edges()
    };
    assert!(affected > 0);
    assert_ne!(switched.edge_list(), original.edge_list());
    assert_eq!(switched.degree_sequence(), original.degree_sequence());
}

#[test]
fn statistics_accumulate_across_runs() {
    let graph = fixture(9);
    let mut engine = EdgeSwitching::new(&graph, 1.0, false, RngHandle::from_seed(2)).unwrap();
    engine.run().unwrap();
    let after_one = engine.number_of_affected_edges();
    engine.run().unwrap();
    assert!(engine.number_of_affected_edges() > after_one);
    assert_eq!(
        engine.number_of_affected_edges(),
        2 * engine.statistics().successful(MoveKind::EdgeSwitch)
    );
}
