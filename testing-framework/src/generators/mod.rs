//! Fixture value generators
//!
//! Every generator caches the value it produced last and only draws a new
//! one when regeneration is requested. Randomness always comes from the
//! session's [`SeedProvider`], so a fixed seed reproduces the same values.
//!
//! - [`RangeGenerator`] - integers or floats in a closed interval
//! - [`StringGenerator`] - strings over character classes, or picks from a literal pool
//! - [`BooleanGenerator`] - `true` / `false`
//!
//! Range and boolean generators can inject sentinels (`null`, `undefined`,
//! `NaN`, `[]`) at a fixed 5% rate; string generators inject edge values at
//! a length-sensitive rate unless [`CharClass::NotEmpty`] is requested.

pub mod boolean;
pub mod range;
pub mod string;

pub use boolean::BooleanGenerator;
pub use range::RangeGenerator;
pub use string::{CharClass, StringGenerator, StringLength};

use crate::error::GeneratorError;
use crate::orchestrator::SeedProvider;
use crate::value::Value;

/// Probability (percent) of a nullable sentinel for range and boolean generators
pub const NULLABLE_PERCENT: f64 = 5.0;

/// Trait for cached, regenerable value generators.
pub trait ValueGenerator {
    /// Return the cached value, or draw a new one when `regenerate` is set
    /// or nothing has been generated yet.
    fn generate(&mut self, rng: &dyn SeedProvider, regenerate: bool)
        -> Result<Value, GeneratorError>;

    /// The last generated value, if any
    fn cached(&self) -> Option<&Value>;

    /// Forget the cached value
    fn reset(&mut self);
}

/// A fixture generator of any supported kind
#[derive(Debug, Clone)]
pub enum Generator {
    Range(RangeGenerator),
    String(StringGenerator),
    Boolean(BooleanGenerator),
}

impl ValueGenerator for Generator {
    fn generate(
        &mut self,
        rng: &dyn SeedProvider,
        regenerate: bool,
    ) -> Result<Value, GeneratorError> {
        match self {
            Generator::Range(g) => g.generate(rng, regenerate),
            Generator::String(g) => g.generate(rng, regenerate),
            Generator::Boolean(g) => g.generate(rng, regenerate),
        }
    }

    fn cached(&self) -> Option<&Value> {
        match self {
            Generator::Range(g) => g.cached(),
            Generator::String(g) => g.cached(),
            Generator::Boolean(g) => g.cached(),
        }
    }

    fn reset(&mut self) {
        match self {
            Generator::Range(g) => g.reset(),
            Generator::String(g) => g.reset(),
            Generator::Boolean(g) => g.reset(),
        }
    }
}

impl From<RangeGenerator> for Generator {
    fn from(g: RangeGenerator) -> Self {
        Generator::Range(g)
    }
}

impl From<StringGenerator> for Generator {
    fn from(g: StringGenerator) -> Self {
        Generator::String(g)
    }
}

impl From<BooleanGenerator> for Generator {
    fn from(g: BooleanGenerator) -> Self {
        Generator::Boolean(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::TestRng;

    #[test]
    fn test_enum_delegates_and_caches() {
        let rng = TestRng::with_seed(42);
        let mut generator: Generator = RangeGenerator::integer(10, 20).unwrap().into();
        assert!(generator.cached().is_none());

        let first = generator.generate(&rng, false).unwrap();
        assert_eq!(generator.cached(), Some(&first));
        assert_eq!(generator.generate(&rng, false).unwrap(), first);

        generator.reset();
        assert!(generator.cached().is_none());
    }
}
