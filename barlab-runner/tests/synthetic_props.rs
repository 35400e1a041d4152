//! Property tests for the synthetic walk and run ids.

use barlab_runner::{generate_synthetic_bars, RunConfig, SyntheticSpec};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any seed and interval yields a validated, strictly ordered series.
    #[test]
    fn synthetic_series_is_valid(
        seed in any::<u64>(),
        bars in 1usize..400,
        interval in prop::sample::select(vec![1i64, 5, 15, 30, 60, 390]),
    ) {
        let spec = SyntheticSpec { seed, bars, interval_minutes: interval, ..SyntheticSpec::default() };
        let store = generate_synthetic_bars("SYN", &spec).unwrap();
        prop_assert_eq!(store.len(), bars);
        for pair in store.bars().windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
        for bar in store.bars() {
            prop_assert!(bar.validate().is_ok());
        }
    }

    /// Run ids change with any backtest parameter.
    #[test]
    fn run_id_tracks_cash(a in 1.0..1e6_f64, b in 1.0..1e6_f64) {
        let mut x = RunConfig::for_symbol("X");
        let mut y = RunConfig::for_symbol("X");
        x.backtest.initial_cash = a;
        y.backtest.initial_cash = b;
        prop_assert_eq!(a == b, x.run_id() == y.run_id());
    }
}
