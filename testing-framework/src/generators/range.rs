//! Numeric range generator.

use super::{ValueGenerator, NULLABLE_PERCENT};
use crate::error::GeneratorError;
use crate::orchestrator::{chance, pickone, SeedProvider};
use crate::value::Value;

static RANGE_SENTINELS: [Value; 3] = [Value::Null, Value::Undefined, Value::Float(f64::NAN)];

/// Uniform numbers in the closed interval `[from, to]`
///
/// ```rust
/// use seeded_testing_framework::generators::{RangeGenerator, ValueGenerator};
/// use seeded_testing_framework::orchestrator::TestRng;
/// use seeded_testing_framework::Value;
///
/// let rng = TestRng::with_seed(42);
/// let mut dice = RangeGenerator::integer(1, 6).unwrap();
/// if let Value::Int(v) = dice.generate(&rng, false).unwrap() {
///     assert!((1..=6).contains(&v));
/// }
/// assert!(RangeGenerator::integer(5, 1).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RangeGenerator {
    from: f64,
    to: f64,
    as_integer: bool,
    allow_nullable: bool,
    cached: Option<Value>,
}

impl RangeGenerator {
    /// Float range without sentinel injection
    pub fn new(from: f64, to: f64) -> Result<Self, GeneratorError> {
        Self::with_options(from, to, false, false)
    }

    /// Integer range without sentinel injection
    pub fn integer(from: i64, to: i64) -> Result<Self, GeneratorError> {
        Self::with_options(from as f64, to as f64, true, false)
    }

    /// Fully configured range
    ///
    /// Fails when `from > to`, when either bound is not finite, or in integer
    /// mode when no integer lies in the interval.
    pub fn with_options(
        from: f64,
        to: f64,
        as_integer: bool,
        allow_nullable: bool,
    ) -> Result<Self, GeneratorError> {
        if !(from <= to) || !from.is_finite() || !to.is_finite() {
            return Err(GeneratorError::Construction { from, to });
        }
        if as_integer && from.ceil() > to.floor() {
            return Err(GeneratorError::EmptyIntegerRange { from, to });
        }
        Ok(Self::unchecked(from, to, as_integer, allow_nullable))
    }

    /// Construct without validating bounds; callers guarantee `from <= to`
    pub(crate) fn unchecked(from: f64, to: f64, as_integer: bool, allow_nullable: bool) -> Self {
        Self {
            from,
            to,
            as_integer,
            allow_nullable,
            cached: None,
        }
    }

    /// Enable or disable the 5% `null` / `undefined` / `NaN` injection
    pub fn allow_nullable(mut self, allow: bool) -> Self {
        self.allow_nullable = allow;
        self
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn is_integer(&self) -> bool {
        self.as_integer
    }

    pub fn is_nullable(&self) -> bool {
        self.allow_nullable
    }

    fn sample(&self, rng: &dyn SeedProvider) -> Value {
        if self.allow_nullable && chance(rng, NULLABLE_PERCENT) {
            if let Some(sentinel) = pickone(rng, &RANGE_SENTINELS) {
                return sentinel.clone();
            }
        }
        if self.as_integer {
            Value::Int(rng.integer(self.from.ceil() as i64, self.to.floor() as i64))
        } else {
            Value::Float(rng.floating(self.from, self.to))
        }
    }
}

impl ValueGenerator for RangeGenerator {
    fn generate(
        &mut self,
        rng: &dyn SeedProvider,
        regenerate: bool,
    ) -> Result<Value, GeneratorError> {
        if !regenerate {
            if let Some(value) = &self.cached {
                return Ok(value.clone());
            }
        }
        let value = self.sample(rng);
        self.cached = Some(value.clone());
        Ok(value)
    }

    fn cached(&self) -> Option<&Value> {
        self.cached.as_ref()
    }

    fn reset(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::TestRng;
    use proptest::prelude::*;

    #[test]
    fn test_reversed_bounds_rejected() {
        assert!(matches!(
            RangeGenerator::integer(5, 1),
            Err(GeneratorError::Construction { .. })
        ));
        assert!(RangeGenerator::new(2.0, 1.5).is_err());
        assert!(RangeGenerator::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_infinite_bounds_rejected() {
        assert!(matches!(
            RangeGenerator::new(f64::NEG_INFINITY, 0.0),
            Err(GeneratorError::Construction { .. })
        ));
        assert!(RangeGenerator::new(0.0, f64::INFINITY).is_err());
        assert!(RangeGenerator::with_options(f64::NEG_INFINITY, f64::INFINITY, true, false).is_err());
    }

    #[test]
    fn test_widest_finite_range_generates() {
        let rng = TestRng::with_seed(42);
        let mut generator = RangeGenerator::new(-f64::MAX, f64::MAX).unwrap();
        for _ in 0..100 {
            let value = generator.generate(&rng, true).unwrap();
            assert!(value.as_f64().is_some_and(f64::is_finite));
        }
    }

    #[test]
    fn test_integer_range_without_integers() {
        assert!(matches!(
            RangeGenerator::with_options(0.2, 0.8, true, false),
            Err(GeneratorError::EmptyIntegerRange { .. })
        ));
    }

    #[test]
    fn test_single_point_interval() {
        let rng = TestRng::with_seed(42);
        let mut generator = RangeGenerator::integer(1, 1).unwrap();
        assert_eq!(generator.generate(&rng, false).unwrap(), Value::Int(1));
        for _ in 0..20 {
            assert_eq!(generator.generate(&rng, true).unwrap(), Value::Int(1));
        }
    }

    #[test]
    fn test_cached_until_regenerated() {
        let rng = TestRng::with_seed(5);
        let mut generator = RangeGenerator::new(0.0, 1_000_000.0).unwrap();
        let first = generator.generate(&rng, false).unwrap();
        assert_eq!(generator.generate(&rng, false).unwrap(), first);

        let changed = (0..10).any(|_| generator.generate(&rng, true).unwrap() != first);
        assert!(changed);
    }

    #[test]
    fn test_float_range_bounds() {
        let rng = TestRng::with_seed(11);
        let mut generator = RangeGenerator::new(-2.5, 2.5).unwrap();
        for _ in 0..200 {
            let v = generator.generate(&rng, true).unwrap();
            let f = v.as_f64().expect("float");
            assert!((-2.5..=2.5).contains(&f));
        }
    }

    #[test]
    fn test_nullable_injects_sentinels() {
        let rng = TestRng::with_seed(99);
        let mut generator = RangeGenerator::with_options(0.0, 10.0, true, true).unwrap();
        let mut sentinels = 0;
        for _ in 0..2000 {
            match generator.generate(&rng, true).unwrap() {
                Value::Int(v) => assert!((0..=10).contains(&v)),
                Value::Null | Value::Undefined => sentinels += 1,
                Value::Float(f) if f.is_nan() => sentinels += 1,
                other => panic!("unexpected value {:?}", other),
            }
        }
        // 5% of 2000 = 100
        assert!(sentinels > 40 && sentinels < 200, "sentinels = {}", sentinels);
    }

    proptest! {
        #[test]
        fn prop_integer_values_within_bounds(
            from in -10_000i64..10_000,
            span in 0i64..10_000,
            seed in any::<u64>(),
        ) {
            let to = from + span;
            let rng = TestRng::with_seed(seed);
            let mut generator = RangeGenerator::integer(from, to).unwrap();
            for _ in 0..20 {
                match generator.generate(&rng, true).unwrap() {
                    Value::Int(v) => prop_assert!(from <= v && v <= to),
                    other => prop_assert!(false, "expected integer, got {:?}", other),
                }
            }
        }

        #[test]
        fn prop_generate_without_regenerate_is_idempotent(seed in any::<u64>()) {
            let rng = TestRng::with_seed(seed);
            let mut generator = RangeGenerator::with_options(0.0, 5000.0, true, true).unwrap();
            let first = generator.generate(&rng, false).unwrap();
            let second = generator.generate(&rng, false).unwrap();
            // NaN sentinels are never equal to themselves
            prop_assert_eq!(first.to_string(), second.to_string());
        }
    }
}
