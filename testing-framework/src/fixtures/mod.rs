//! Fixture store
//!
//! Named fixtures backed by generators, with one optional level of nesting.
//! A fixture is addressed either by its name (`"status"`) or, for nested
//! fixtures, by `"container.field"`. Deeper paths are rejected.
//!
//! ```rust
//! use seeded_testing_framework::fixtures::FixtureStore;
//! use seeded_testing_framework::generators::RangeGenerator;
//! use seeded_testing_framework::orchestrator::TestRng;
//! use seeded_testing_framework::Value;
//!
//! let rng = TestRng::with_seed(42);
//! let mut store = FixtureStore::new();
//! store.set_property("status", RangeGenerator::integer(500, 600).unwrap());
//!
//! let status = store.get_inner_actual("status", false, &rng).unwrap();
//! assert!(matches!(status, Value::Int(500..=600)));
//! ```

mod infer;

pub use infer::{infer_object, Inference, INFERRED_NUMBER_MAX};

use crate::error::{GeneratorError, SessionError};
use crate::generators::{Generator, ValueGenerator};
use crate::orchestrator::SeedProvider;
use crate::value::Value;
use indexmap::IndexMap;

/// Generators grouped under one fixture name
pub type NestedFixture = IndexMap<String, Generator>;

/// A fixture entry: a generator, or one level of named generators
#[derive(Debug, Clone)]
pub enum FixtureSlot {
    Generator(Generator),
    Nested(NestedFixture),
}

/// Named collection of fixture generators
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    slots: IndexMap<String, FixtureSlot>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a generator under `name`, replacing any previous fixture
    pub fn set_property(&mut self, name: impl Into<String>, generator: impl Into<Generator>) {
        self.slots
            .insert(name.into(), FixtureSlot::Generator(generator.into()));
    }

    /// Store a nested fixture under `name`, replacing any previous fixture
    pub fn set_nested(&mut self, name: impl Into<String>, nested: NestedFixture) {
        self.slots.insert(name.into(), FixtureSlot::Nested(nested));
    }

    /// Merge generators at the root, or nested under `as_name`
    ///
    /// Merging under an existing nested fixture extends it; merging under a
    /// name that holds a plain generator replaces it.
    pub fn merge(&mut self, generators: NestedFixture, as_name: Option<&str>) {
        match as_name {
            None => {
                for (name, generator) in generators {
                    self.slots.insert(name, FixtureSlot::Generator(generator));
                }
            }
            Some(container) => match self.slots.get_mut(container) {
                Some(FixtureSlot::Nested(existing)) => existing.extend(generators),
                _ => self.set_nested(container, generators),
            },
        }
    }

    /// Infer generators from a JSON object sample and merge them
    ///
    /// Returns `None` (and stores nothing) when the sample is not an object.
    pub fn infer_and_create_inner(
        &mut self,
        sample: &serde_json::Value,
        as_name: Option<&str>,
    ) -> Option<Vec<String>> {
        let Inference {
            generators,
            fallbacks,
        } = infer_object(sample)?;
        self.merge(generators, as_name);
        Some(fallbacks)
    }

    pub fn get(&self, name: &str) -> Option<&FixtureSlot> {
        self.slots.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FixtureSlot> {
        self.slots.shift_remove(name)
    }

    /// Whether `name` (plain or `container.field`) refers to a fixture
    pub fn contains(&self, name: &str) -> bool {
        match name.split_once('.') {
            None => self.slots.contains_key(name),
            Some((container, field)) => match self.slots.get(container) {
                Some(FixtureSlot::Nested(nested)) => nested.contains_key(field),
                Some(FixtureSlot::Generator(_)) => !field.contains('.'),
                None => false,
            },
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resolve a fixture reference to a plain value
    ///
    /// - `"name"` on a generator generates it
    /// - `"name"` on a nested fixture materializes every entry into a map
    /// - `"container.field"` resolves `container` and returns `field` of the
    ///   result (`Undefined` when it has no such field)
    pub fn get_inner_actual(
        &mut self,
        name: &str,
        regenerate: bool,
        rng: &dyn SeedProvider,
    ) -> Result<Value, SessionError> {
        let (container, field) = match name.split_once('.') {
            Some((_, rest)) if rest.contains('.') => {
                return Err(SessionError::NestingTooDeep(name.to_string()))
            }
            Some((container, field)) => (container, Some(field)),
            None => (name, None),
        };

        let slot = self
            .slots
            .get_mut(container)
            .ok_or_else(|| SessionError::Key(container.to_string()))?;
        let value = Self::resolve_slot(slot, regenerate, rng)?;

        Ok(match field {
            Some(field) => value.field(field),
            None => value,
        })
    }

    /// Materialize the whole store into a map of plain values
    pub fn materialize(
        &mut self,
        regenerate: bool,
        rng: &dyn SeedProvider,
    ) -> Result<Value, GeneratorError> {
        let mut object = IndexMap::with_capacity(self.slots.len());
        for (name, slot) in self.slots.iter_mut() {
            object.insert(name.clone(), Self::resolve_slot(slot, regenerate, rng)?);
        }
        Ok(Value::Map(object))
    }

    /// Materialize the store `count` times, regenerating every fixture each time
    pub fn generate_objects(
        &mut self,
        count: usize,
        rng: &dyn SeedProvider,
    ) -> Result<Vec<Value>, GeneratorError> {
        (0..count).map(|_| self.materialize(true, rng)).collect()
    }

    fn resolve_slot(
        slot: &mut FixtureSlot,
        regenerate: bool,
        rng: &dyn SeedProvider,
    ) -> Result<Value, GeneratorError> {
        match slot {
            FixtureSlot::Generator(generator) => generator.generate(rng, regenerate),
            FixtureSlot::Nested(nested) => {
                let mut object = IndexMap::with_capacity(nested.len());
                for (name, generator) in nested.iter_mut() {
                    object.insert(name.clone(), generator.generate(rng, regenerate)?);
                }
                Ok(Value::Map(object))
            }
        }
    }
}
