use proptest::prelude::*;

/// Strategy for generating a single handler score, including non-bids
pub fn score_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => 0.5f64..1000.0,
        1 => Just(0.0),
        1 => -100.0f64..0.0,
        1 => (1u8..5).prop_map(f64::from),
    ]
}

/// Strategy for generating the scores of a handler set
pub fn score_set_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(score_strategy(), 0..12)
}

/// Strategy for generating scores where some scorers fail (`None`)
pub fn fallible_score_set_strategy() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.8, score_strategy()), 0..12)
}
