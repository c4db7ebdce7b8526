use nm_autocorr::{
    AnalysisConfig, AnalysisPhase, AutocorrelationAnalysis, SlotTracking, SlotVerdict,
};
use nm_core::errors::NmError;
use nm_core::rng::RngHandle;
use nm_core::Edge;
use nm_graph::{Graph, GraphConfig};

fn observed(max_samples: usize) -> AutocorrelationAnalysis {
    AutocorrelationAnalysis::new(AnalysisConfig {
        tracking: SlotTracking::default(),
        max_samples,
    })
    .unwrap()
}

fn assert_state(err: NmError, code: &str) {
    match err {
        NmError::State(info) => assert_eq!(info.code, code),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Eight rounds over three slots:
/// (0,1) always present, (1,2) present in even rounds, (2,3) only in round 3.
fn three_slot_analysis() -> AutocorrelationAnalysis {
    let mut analysis = observed(8);
    for round in 0..8 {
        let mut edges = vec![(1, 0)];
        if round % 2 == 0 {
            edges.push((1, 2));
        }
        if round == 3 {
            edges.push((3, 2));
        }
        analysis.add_sample(edges).unwrap();
    }
    analysis.init().unwrap();
    analysis
}

#[test]
fn phases_advance_and_cursor_exhausts() {
    let mut analysis = observed(4);
    assert_eq!(analysis.phase(), AnalysisPhase::Collecting);
    assert_state(analysis.next_series().unwrap_err(), "not-initialized");
    assert_state(
        analysis.independence_rate(&[1], 2).unwrap_err(),
        "not-initialized",
    );

    analysis.add_sample([(0, 1), (2, 3)]).unwrap();
    analysis.add_sample([(0, 1)]).unwrap();
    assert_eq!(analysis.number_of_slots(), 2);
    analysis.init().unwrap();
    assert_eq!(analysis.phase(), AnalysisPhase::Finalized);
    assert_eq!(analysis.number_of_rounds(), 2);

    assert_state(analysis.add_sample([(0, 1)]).unwrap_err(), "already-initialized");
    assert_state(analysis.init().unwrap_err(), "already-initialized");

    let first = analysis.next_series().unwrap().unwrap();
    assert_eq!(analysis.phase(), AnalysisPhase::Iterating);
    assert_eq!(first.slot.index, 0);
    assert_eq!(first.slot.edge, Edge::from((0, 1)));
    assert_eq!(first.series.as_slice(), &[true, true]);

    let second = analysis.next_series().unwrap().unwrap();
    assert_eq!(second.slot.edge, Edge::from((2, 3)));
    assert_eq!(second.series.as_slice(), &[true, false]);

    assert!(analysis.next_series().unwrap().is_none());
    assert_eq!(analysis.phase(), AnalysisPhase::Exhausted);
    assert!(analysis.next_series().unwrap().is_none());
    assert_eq!(analysis.phase(), AnalysisPhase::Exhausted);
}

#[test]
fn late_edges_are_padded_with_absence() {
    let mut analysis = observed(5);
    analysis.add_sample(Vec::<Edge>::new()).unwrap();
    analysis.add_sample([(4, 1)]).unwrap();
    analysis.add_sample([(1, 4), (1, 4)]).unwrap();
    analysis.add_sample(Vec::<Edge>::new()).unwrap();
    analysis.init().unwrap();
    let series = analysis.series_of(Edge::from((1, 4))).unwrap().unwrap();
    assert_eq!(series.as_slice(), &[false, true, true, false]);
    assert_eq!(series.occupancy(), 2);
    assert!(analysis.series_of(Edge::from((0, 4))).unwrap().is_none());
}

#[test]
fn capacity_overflow_is_a_state_error() {
    let mut analysis = observed(2);
    analysis.add_sample([(0, 1)]).unwrap();
    analysis.add_sample([(0, 1)]).unwrap();
    assert_state(analysis.add_sample([(0, 1)]).unwrap_err(), "sample-capacity");
    assert_eq!(analysis.number_of_rounds(), 2);
    assert!(AutocorrelationAnalysis::new(AnalysisConfig {
        tracking: SlotTracking::default(),
        max_samples: 0,
    })
    .is_err());
}

#[test]
fn series_iterator_resumes_after_cursor() {
    let mut analysis = three_slot_analysis();
    analysis.next_series().unwrap();
    let rest: Vec<_> = analysis.series().unwrap().collect();
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[0].slot.index, 1);
    assert_eq!(analysis.phase(), AnalysisPhase::Exhausted);
    assert_eq!(analysis.series().unwrap().count(), 0);
}

#[test]
fn only_absent_slots_leave_the_denominator() {
    let analysis = three_slot_analysis();
    let rates = analysis.independence_rate(&[2, 1], 100).unwrap();

    // at stride 2 both (0,1) and (1,2) read as always present
    let coarse = rates[0];
    assert_eq!(coarse.thinning, 2);
    assert_eq!(coarse.independent, 2);
    assert_eq!(coarse.dependent, 0);
    assert_eq!(coarse.non_existent, 1);
    assert_eq!(coarse.rate, Some(1.0));
    assert_eq!(coarse.first_independent, 2);
    assert_eq!(coarse.transitions, 6);

    let fine = rates[1];
    assert_eq!(fine.thinning, 1);
    assert_eq!(fine.independent, 2);
    assert_eq!(fine.dependent, 1);
    assert_eq!(fine.non_existent, 0);
    assert!((fine.rate.unwrap() - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(fine.first_independent, 1);
    assert_eq!(fine.transitions, 21);
    assert_eq!(fine.slots(), 3);
}

#[test]
fn always_present_slots_count_towards_the_rate() {
    let mut analysis = observed(5);
    for round in 0..5 {
        let mut edges = vec![(0, 1)];
        if round % 2 == 1 {
            edges.push((2, 3));
        }
        analysis.add_sample(edges).unwrap();
    }
    analysis.init().unwrap();
    let rates = analysis.independence_rate(&[1], 10).unwrap();
    assert_eq!(rates[0].independent, 1);
    assert_eq!(rates[0].dependent, 1);
    assert_eq!(rates[0].rate, Some(0.5));
}

#[test]
fn independence_rate_validates_arguments() {
    let analysis = three_slot_analysis();
    let err = analysis.independence_rate(&[], 10).unwrap_err();
    assert_eq!(err.info().code, "empty-thinnings");
    let err = analysis.independence_rate(&[1, 0], 10).unwrap_err();
    assert_eq!(err.info().code, "zero-thinning");
    let err = analysis.independence_rate(&[1], 1).unwrap_err();
    assert_eq!(err.info().code, "run-length");
}

#[test]
fn sampled_rate_uses_a_fraction_of_slots() {
    let analysis = three_slot_analysis();
    let mut rng = RngHandle::from_seed(5);
    let full = analysis
        .independence_rate_sampled(&[1], 100, 1.0, &mut rng)
        .unwrap();
    assert_eq!(full, analysis.independence_rate(&[1], 100).unwrap());

    let half = analysis
        .independence_rate_sampled(&[1], 100, 0.5, &mut rng)
        .unwrap();
    assert_eq!(half[0].slots(), 2);

    let err = analysis
        .independence_rate_sampled(&[1], 100, 0.0, &mut rng)
        .unwrap_err();
    assert_eq!(err.info().code, "sample-fraction");
}

#[test]
fn all_pairs_tracks_absent_pairs() {
    let mut analysis = AutocorrelationAnalysis::new(AnalysisConfig {
        tracking: SlotTracking::AllPairs {
            nodes: 4,
            directed: false,
        },
        max_samples: 3,
    })
    .unwrap();
    assert_eq!(analysis.number_of_slots(), 6);

    let err = analysis.add_sample([(0, 1), (0, 7)]).unwrap_err();
    match err {
        NmError::InvalidEdge(info) => assert_eq!(info.code, "node-out-of-range"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(analysis.number_of_rounds(), 0);

    analysis.add_sample([(0, 1)]).unwrap();
    analysis.add_sample([(1, 0), (2, 3)]).unwrap();
    analysis.init().unwrap();
    assert_eq!(analysis.number_of_slots(), 6);

    let edges: Vec<Edge> = analysis.series().unwrap().map(|s| s.slot.edge).collect();
    assert_eq!(
        edges,
        vec![
            Edge::from((0, 1)),
            Edge::from((0, 2)),
            Edge::from((0, 3)),
            Edge::from((1, 2)),
            Edge::from((1, 3)),
            Edge::from((2, 3)),
        ]
    );
    // two rounds give one transition per slot, so ΔBIC = 0 for every tested slot
    let rates = analysis.independence_rate(&[1], 2).unwrap();
    assert_eq!(rates[0].non_existent, 4);
    assert_eq!(rates[0].dependent, 2);
    assert_eq!(rates[0].independent, 0);
}

#[test]
fn graph_samples_follow_graph_directedness() {
    let directed = Graph::from_edges(3, GraphConfig::directed(), [(0, 1), (1, 0)]).unwrap();
    let mut analysis = AutocorrelationAnalysis::new(AnalysisConfig {
        tracking: SlotTracking::for_graph(&directed, false),
        max_samples: 2,
    })
    .unwrap();
    analysis.add_graph_sample(&directed).unwrap();
    assert_eq!(analysis.number_of_slots(), 2);

    let undirected = Graph::from_edges(3, GraphConfig::undirected(), [(0, 1)]).unwrap();
    let err = analysis.add_graph_sample(&undirected).unwrap_err();
    assert_eq!(err.info().code, "directedness-mismatch");

    let mut analysis = AutocorrelationAnalysis::new(AnalysisConfig {
        tracking: SlotTracking::for_graph(&undirected, true),
        max_samples: 2,
    })
    .unwrap();
    analysis.add_graph_sample(&undirected).unwrap();
    analysis.add_graph_sample(&undirected).unwrap();
    analysis.init().unwrap();
    assert_eq!(analysis.number_of_slots(), 3);
    let verdicts: Vec<SlotVerdict> = analysis
        .series()
        .unwrap()
        .map(|slot| nm_autocorr::slot_independence(slot.series.as_slice(), 1, 2).unwrap().verdict)
        .collect();
    assert_eq!(
        verdicts,
        vec![
            SlotVerdict::Dependent,
            SlotVerdict::NonExistent,
            SlotVerdict::NonExistent
        ]
    );
}
