// File: testing-framework/tests/generator_property_test.rs
//
// Generator Property Tests
//
// Randomized checks over generator bounds and caching.

use proptest::prelude::*;
use seeded_testing_framework::prelude::*;

proptest! {
    #[test]
    fn prop_integer_range_stays_in_bounds(seed in any::<u64>(), a in -1000i64..1000, span in 0i64..500) {
        let rng = TestRng::with_seed(seed);
        let mut generator = RangeGenerator::integer(a, a + span).unwrap();
        for _ in 0..20 {
            let value = generator.generate(&rng, true).unwrap();
            match value {
                Value::Int(v) => prop_assert!(a <= v && v <= a + span),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn prop_cached_value_is_stable(seed in any::<u64>()) {
        let rng = TestRng::with_seed(seed);
        let mut generator = StringGenerator::new([CharClass::Upper, CharClass::Numeric], 1..=40);
        let first = generator.generate(&rng, false).unwrap();
        let second = generator.generate(&rng, false).unwrap();
        // NaN never comes out of a string generator, so equality is meaningful
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_float_range_stays_in_bounds(seed in any::<u64>(), from in -1.0e6f64..1.0e6, width in 0.0f64..1.0e3) {
        let rng = TestRng::with_seed(seed);
        let mut generator = RangeGenerator::new(from, from + width).unwrap();
        let value = generator.generate(&rng, true).unwrap();
        let v = value.as_f64().unwrap();
        prop_assert!(from <= v && v <= from + width);
    }
}

#[test]
fn test_nullable_injection_rate() {
    let rng = TestRng::with_seed(99);
    let mut generator = RangeGenerator::integer(0, 10).unwrap().allow_nullable(true);
    let injected = (0..10_000)
        .filter(|_| !matches!(generator.generate(&rng, true), Ok(Value::Int(_))))
        .count();
    // 5% of 10_000 = 500
    assert!((350..650).contains(&injected), "injected = {}", injected);
}
