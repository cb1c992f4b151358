//! Character-class and literal-pool string generator.

use super::ValueGenerator;
use crate::error::GeneratorError;
use crate::orchestrator::{chance, pickone, SeedProvider};
use crate::value::Value;
use indexmap::IndexMap;
use std::ops::RangeInclusive;

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMERIC: &str = "0123456789";
const SPECIAL: &str = "~`!@#$%^&*()_+-={}[]:\";'<>?,./|\\";

/// Character classes and markers for [`StringGenerator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `a-z`
    Lower,
    /// `A-Z`
    Upper,
    /// `0-9`
    Numeric,
    /// Punctuation and symbols
    Special,
    /// Union of every class
    All,
    /// Marker: never inject sentinel or empty values
    NotEmpty,
}

impl CharClass {
    /// Characters contributed by this class (markers contribute none)
    pub fn alphabet(&self) -> &'static str {
        match self {
            CharClass::Lower => LOWER,
            CharClass::Upper => UPPER,
            CharClass::Numeric => NUMERIC,
            CharClass::Special => SPECIAL,
            CharClass::All | CharClass::NotEmpty => "",
        }
    }
}

/// Fixed length or an inclusive length range sampled per generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringLength {
    Fixed(usize),
    Range { from: usize, to: usize },
}

impl StringLength {
    fn resolve(&self, rng: &dyn SeedProvider) -> usize {
        match *self {
            StringLength::Fixed(len) => len,
            StringLength::Range { from, to } => {
                let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
                let lo = i64::try_from(lo).unwrap_or(i64::MAX);
                let hi = i64::try_from(hi).unwrap_or(i64::MAX);
                rng.integer(lo, hi) as usize
            }
        }
    }
}

impl From<usize> for StringLength {
    fn from(len: usize) -> Self {
        StringLength::Fixed(len)
    }
}

impl From<RangeInclusive<usize>> for StringLength {
    fn from(range: RangeInclusive<usize>) -> Self {
        StringLength::Range {
            from: *range.start(),
            to: *range.end(),
        }
    }
}

#[derive(Debug, Clone)]
enum StringSource {
    Classes(Vec<CharClass>),
    Pool(Vec<String>),
}

/// Random strings built from character classes, or picks from a literal pool
///
/// Unless [`CharClass::NotEmpty`] is present, a class-based generator
/// returns one of `null`, `undefined`, `"null"`, `"undefined"`, `{}`, `[]`
/// or `""` with probability `min(1, 100 / length)` percent.
///
/// ```rust
/// use seeded_testing_framework::generators::{CharClass, StringGenerator, ValueGenerator};
/// use seeded_testing_framework::orchestrator::TestRng;
///
/// let rng = TestRng::with_seed(1);
/// let mut ids = StringGenerator::new([CharClass::Lower, CharClass::NotEmpty], 12);
/// let id = ids.generate(&rng, false).unwrap();
/// assert_eq!(id.as_str().unwrap().len(), 12);
///
/// let mut colors = StringGenerator::from_pool(["red", "green"]);
/// let color = colors.generate(&rng, false).unwrap();
/// assert!(["red", "green"].contains(&color.as_str().unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct StringGenerator {
    source: StringSource,
    length: StringLength,
    cached: Option<Value>,
}

impl StringGenerator {
    /// Generator over the union of `classes`
    pub fn new(
        classes: impl IntoIterator<Item = CharClass>,
        length: impl Into<StringLength>,
    ) -> Self {
        Self {
            source: StringSource::Classes(classes.into_iter().collect()),
            length: length.into(),
            cached: None,
        }
    }

    /// Generator picking uniformly from literal strings; length is ignored
    pub fn from_pool<S: Into<String>>(pool: impl IntoIterator<Item = S>) -> Self {
        Self {
            source: StringSource::Pool(pool.into_iter().map(Into::into).collect()),
            length: StringLength::Fixed(0),
            cached: None,
        }
    }

    /// Full alphabet with a length drawn from `1..=500`
    pub fn any_text() -> Self {
        Self::new([CharClass::All], 1..=500)
    }

    pub fn length(&self) -> StringLength {
        self.length
    }

    pub fn is_pool(&self) -> bool {
        matches!(self.source, StringSource::Pool(_))
    }

    fn mask(classes: &[CharClass]) -> Vec<char> {
        if classes.contains(&CharClass::All) {
            return [LOWER, UPPER, NUMERIC, SPECIAL]
                .iter()
                .flat_map(|alphabet| alphabet.chars())
                .collect();
        }
        let mut mask = Vec::new();
        for class in [
            CharClass::Lower,
            CharClass::Upper,
            CharClass::Numeric,
            CharClass::Special,
        ] {
            if classes.contains(&class) {
                mask.extend(class.alphabet().chars());
            }
        }
        mask
    }

    fn sentinel(rng: &dyn SeedProvider) -> Value {
        match rng.pick_index(7) {
            0 => Value::Null,
            1 => Value::Undefined,
            2 => Value::from("null"),
            3 => Value::from("undefined"),
            4 => Value::Map(IndexMap::new()),
            5 => Value::List(Vec::new()),
            _ => Value::from(""),
        }
    }

    fn sample(&self, rng: &dyn SeedProvider) -> Result<Value, GeneratorError> {
        let classes = match &self.source {
            StringSource::Pool(pool) => {
                return pickone(rng, pool)
                    .map(|literal| Value::Str(literal.clone()))
                    .ok_or(GeneratorError::StringGenerator);
            }
            StringSource::Classes(classes) => classes,
        };

        let mask = Self::mask(classes);
        if mask.is_empty() {
            return Err(GeneratorError::StringGenerator);
        }

        let length = self.length.resolve(rng);
        if !classes.contains(&CharClass::NotEmpty) {
            let percent = if length == 0 {
                1.0
            } else {
                (100.0 / length as f64).min(1.0)
            };
            if chance(rng, percent) {
                return Ok(Self::sentinel(rng));
            }
        }

        let text: String = (0..length).map(|_| mask[rng.pick_index(mask.len())]).collect();
        Ok(Value::Str(text))
    }
}

impl ValueGenerator for StringGenerator {
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
        let value = self.sample(rng)?;
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
