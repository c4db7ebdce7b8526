use nm_autocorr::{
    slot_independence, AnalysisConfig, AutocorrelationAnalysis, SlotTracking, SlotVerdict,
};
use proptest::prelude::*;

fn samples() -> impl Strategy<Value = Vec<Vec<(usize, usize)>>> {
    let edge = (0usize..6, 0usize..6).prop_filter("pairs only", |(u, v)| u != v);
    prop::collection::vec(prop::collection::vec(edge, 0..10), 2..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rates_account_for_every_slot(
        rounds in samples(),
        directed in any::<bool>(),
        thinnings in prop::collection::vec(1usize..6, 1..4),
        run_length in 2usize..50,
    ) {
        let mut analysis = AutocorrelationAnalysis::new(AnalysisConfig {
            tracking: SlotTracking::AllPairs { nodes: 6, directed },
            max_samples: rounds.len(),
        }).unwrap();
        for edges in &rounds {
            analysis.add_sample(edges.iter().copied()).unwrap();
        }
        analysis.init().unwrap();
        let slots = analysis.number_of_slots();
        prop_assert_eq!(slots, if directed { 30 } else { 15 });

        let rates = analysis.independence_rate(&thinnings, run_length).unwrap();
        let mut first_independent = 0;
        for (rate, thinning) in rates.iter().zip(&thinnings) {
            prop_assert_eq!(rate.thinning, *thinning);
            prop_assert_eq!(rate.slots(), slots);
            prop_assert!(rate.transitions <= ((run_length - 1) * slots) as u64);
            match rate.rate {
                Some(value) => {
                    prop_assert!((0.0..=1.0).contains(&value));
                    prop_assert!(rate.independent + rate.dependent > 0);
                }
                None => prop_assert_eq!(rate.independent + rate.dependent, 0),
            }
            prop_assert!(rate.first_independent <= rate.independent);
            first_independent += rate.first_independent;
        }
        prop_assert!(first_independent <= slots);

        let counted: usize = analysis
            .series()
            .unwrap()
            .filter(|slot| {
                slot_independence(slot.series.as_slice(), thinnings[0], run_length)
                    .unwrap()
                    .verdict
                    == SlotVerdict::Independent
            })
            .count();
        prop_assert_eq!(counted, rates[0].independent);
    }
}
