// File: testing-framework/src/orchestrator/rng.rs
//
// Seeded RNG used by every generator in a session.

use super::SeedProvider;
use parking_lot::Mutex;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where a session's seed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// Passed explicitly by the caller
    Configured,
    /// Read from the `FIXTURE_TEST_SEED` environment variable
    Environment,
    /// Drawn from OS entropy
    Random,
}

/// Deterministic, shareable random number generator
///
/// Wraps a `StdRng` seeded from a `u64` behind a mutex so that sampling
/// works through `&self`. The seed is kept for replay messages.
///
/// ```rust
/// use seeded_testing_framework::orchestrator::TestRng;
///
/// let a = TestRng::with_seed(0xdead_beef);
/// let b = TestRng::with_seed(0xdead_beef);
/// let xs: Vec<u64> = (0..5).map(|_| a.gen()).collect();
/// let ys: Vec<u64> = (0..5).map(|_| b.gen()).collect();
/// assert_eq!(xs, ys);
/// ```
pub struct TestRng {
    seed: u64,
    inner: Mutex<StdRng>,
}

impl TestRng {
    /// Environment variable consulted when no seed is configured
    pub const SEED_ENV_VAR: &'static str = "FIXTURE_TEST_SEED";

    /// Create an RNG from a known seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create an RNG from `FIXTURE_TEST_SEED`, if it is set and parses
    pub fn from_env() -> Option<Self> {
        std::env::var(Self::SEED_ENV_VAR)
            .ok()
            .and_then(|raw| Self::parse_seed(&raw))
            .map(Self::with_seed)
    }

    /// Create an RNG from the environment, falling back to a random seed
    pub fn new_from_env_or_random() -> Self {
        Self::resolve(None).0
    }

    /// Resolve a configured seed, the environment, or a random seed, in that order
    pub fn resolve(configured: Option<u64>) -> (Self, SeedSource) {
        if let Some(seed) = configured {
            return (Self::with_seed(seed), SeedSource::Configured);
        }
        if let Some(rng) = Self::from_env() {
            return (rng, SeedSource::Environment);
        }
        (Self::with_seed(rand::random()), SeedSource::Random)
    }

    /// Parse a seed written as `0x`-prefixed hex or as decimal
    ///
    /// Unprefixed strings are always decimal, so `1234` is 1234 and not
    /// 0x1234; hex seeds must carry the `0x` prefix the replay hint prints.
    pub fn parse_seed(raw: &str) -> Option<u64> {
        let raw = raw.trim();
        match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => raw.parse().ok(),
        }
    }

    /// The seed this RNG was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample a value from the standard distribution
    pub fn gen<T>(&self) -> T
    where
        Standard: Distribution<T>,
    {
        self.inner.lock().gen()
    }

    /// Sample a value from a range
    pub fn gen_range<T, R>(&self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.inner.lock().gen_range(range)
    }
}

impl SeedProvider for TestRng {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn integer(&self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.gen_range(min..=max)
    }

    fn floating(&self, min: f64, max: f64) -> f64 {
        if !(min < max) || !min.is_finite() || !max.is_finite() {
            return min;
        }
        let t: f64 = self.gen_range(0.0..=1.0);
        let width = max - min;
        // the width of e.g. [-f64::MAX, f64::MAX] overflows to infinity
        let value = if width.is_finite() {
            min + t * width
        } else {
            min * (1.0 - t) + max * t
        };
        value.clamp(min, max)
    }
}

impl std::fmt::Debug for TestRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRng")
            .field("seed", &format_args!("0x{:016x}", self.seed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = TestRng::with_seed(42);
        let b = TestRng::with_seed(42);
        let xs: Vec<i64> = (0..50).map(|_| a.integer(-1000, 1000)).collect();
        let ys: Vec<i64> = (0..50).map(|_| b.integer(-1000, 1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_integer_closed_interval() {
        let rng = TestRng::with_seed(9);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..500 {
            let v = rng.integer(0, 3);
            assert!((0..=3).contains(&v));
            saw_min |= v == 0;
            saw_max |= v == 3;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn test_degenerate_intervals() {
        let rng = TestRng::with_seed(1);
        assert_eq!(rng.integer(5, 5), 5);
        assert_eq!(rng.floating(2.5, 2.5), 2.5);
    }

    #[test]
    fn test_floating_full_f64_span() {
        let rng = TestRng::with_seed(3);
        for _ in 0..200 {
            let v = rng.floating(-f64::MAX, f64::MAX);
            assert!(v.is_finite());
        }
        for _ in 0..200 {
            let v = rng.floating(-1.5, 2.5);
            assert!((-1.5..=2.5).contains(&v));
        }
        assert_eq!(rng.floating(f64::NEG_INFINITY, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(TestRng::parse_seed("0xff"), Some(255));
        assert_eq!(TestRng::parse_seed(" 1234 "), Some(1234));
        assert_eq!(TestRng::parse_seed("nope"), None);
        // unprefixed input is decimal only
        assert_eq!(TestRng::parse_seed("deadbeef"), None);
        assert_eq!(TestRng::parse_seed("0xdeadbeef"), Some(0xdeadbeef));
    }

    #[test]
    fn test_resolve_prefers_configured() {
        let (rng, source) = TestRng::resolve(Some(77));
        assert_eq!(rng.seed(), 77);
        assert_eq!(source, SeedSource::Configured);
    }
}
