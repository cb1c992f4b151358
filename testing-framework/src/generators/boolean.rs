//! Boolean generator.

use super::{ValueGenerator, NULLABLE_PERCENT};
use crate::error::GeneratorError;
use crate::orchestrator::{chance, SeedProvider};
use crate::value::Value;

/// Uniform `true` / `false`, optionally with `null` / `undefined` / `[]` sentinels
#[derive(Debug, Clone, Default)]
pub struct BooleanGenerator {
    allow_nullable: bool,
    cached: Option<Value>,
}

impl BooleanGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_nullable(mut self, allow: bool) -> Self {
        self.allow_nullable = allow;
        self
    }
}

impl ValueGenerator for BooleanGenerator {
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

        let value = if self.allow_nullable && chance(rng, NULLABLE_PERCENT) {
            match rng.pick_index(3) {
                0 => Value::Null,
                1 => Value::Undefined,
                _ => Value::List(Vec::new()),
            }
        } else {
            Value::Bool(rng.pick_index(2) == 0)
        };

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

    #[test]
    fn test_produces_both_outcomes() {
        let rng = TestRng::with_seed(3);
        let mut generator = BooleanGenerator::new();
        let values: Vec<Value> = (0..100)
            .map(|_| generator.generate(&rng, true).unwrap())
            .collect();
        assert!(values.contains(&Value::Bool(true)));
        assert!(values.contains(&Value::Bool(false)));
        assert!(values.iter().all(|v| matches!(v, Value::Bool(_))));
    }

    #[test]
    fn test_nullable_sentinels() {
        let rng = TestRng::with_seed(8);
        let mut generator = BooleanGenerator::new().allow_nullable(true);
        let sentinels = (0..2000)
            .filter(|_| {
                !matches!(generator.generate(&rng, true).unwrap(), Value::Bool(_))
            })
            .count();
        assert!(sentinels > 40 && sentinels < 200, "sentinels = {}", sentinels);
    }
}
