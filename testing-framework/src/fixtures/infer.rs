//! Fixture inference from a sample object.
//!
//! Strings become full-alphabet string generators (length 1-500), numbers
//! become nullable integer ranges over `[0, 5000]`, and every other JSON type
//! falls back to the string generator.

use super::NestedFixture;
use crate::generators::{Generator, RangeGenerator, StringGenerator};

/// Upper bound of the integer range inferred for numeric fields
pub const INFERRED_NUMBER_MAX: f64 = 5000.0;

/// Outcome of inferring generators from a sample
#[derive(Debug, Default)]
pub struct Inference {
    /// Generators keyed by field name, in sample order
    pub generators: NestedFixture,
    /// Fields whose type was not string or number and fell back to a string generator
    pub fallbacks: Vec<String>,
}

/// Infer generators for every field of a JSON object
///
/// Returns `None` when the sample is not an object.
pub fn infer_object(sample: &serde_json::Value) -> Option<Inference> {
    let fields = sample.as_object()?;
    let mut inference = Inference::default();

    for (name, value) in fields {
        let generator: Generator = match value {
            serde_json::Value::String(_) => StringGenerator::any_text().into(),
            serde_json::Value::Number(_) => {
                RangeGenerator::unchecked(0.0, INFERRED_NUMBER_MAX, true, true).into()
            }
            _ => {
                inference.fallbacks.push(name.clone());
                StringGenerator::any_text().into()
            }
        };
        inference.generators.insert(name.clone(), generator);
    }

    Some(inference)
}
