use nm_core::rng::RngHandle;
use nm_graph::{gen_gnp, DegreeIntervals};
use nm_rand::{
    CurveballConfig, DegreeIntervalConfig, DegreeIntervalSwitching, EdgeSwitching,
    GlobalCurveball, GlobalCurveballConfig, Randomization, UniformCurveball,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn degree_preserving_engines_keep_degrees(
        seed in any::<u64>(),
        nodes in 4usize..40,
        p in 0.0f64..0.6,
        directed in any::<bool>(),
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let graph = gen_gnp(nodes, p, directed, &mut rng).unwrap();
        let degrees = graph.degree_sequence();

        let mut curveball = UniformCurveball::new(
            &graph,
            &CurveballConfig { trades_per_node: 2.0, allow_self_loops: false },
            rng.fork(),
        ).unwrap();
        curveball.run().unwrap();
        prop_assert_eq!(curveball.graph().degree_sequence(), degrees.clone());

        let mut global = GlobalCurveball::new(
            &graph,
            &GlobalCurveballConfig { rounds: 3, ..GlobalCurveballConfig::default() },
            rng.fork(),
        ).unwrap();
        global.run().unwrap();
        prop_assert_eq!(global.graph().degree_sequence(), degrees.clone());

        let mut switching = EdgeSwitching::new(&graph, 3.0, false, rng.fork()).unwrap();
        switching.run().unwrap();
        prop_assert_eq!(switching.graph().degree_sequence(), degrees.clone());
        prop_assert_eq!(switching.graph().number_of_self_loops(), 0);

        if !directed {
            let mut exact = DegreeIntervalSwitching::new(
                &graph,
                DegreeIntervals::exact(&graph).unwrap(),
                &DegreeIntervalConfig::default(),
                rng.fork(),
            ).unwrap();
            exact.run().unwrap();
            prop_assert_eq!(exact.graph().degree_sequence(), degrees);
        }
    }
}
