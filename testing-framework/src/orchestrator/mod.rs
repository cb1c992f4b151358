// File: testing-framework/src/orchestrator/mod.rs
//
// Orchestrator Module - Deterministic Randomness
//
// This module provides the seeded randomness every generator and session
// draws from, so that a run with the same seed reproduces the same fixtures.

/// Deterministic random number generation for reproducible tests
pub mod rng;

pub use rng::{SeedSource, TestRng};

/// Seed-backed source of randomness consumed by generators
///
/// Implementations must be deterministic for a fixed seed: the same
/// sequence of calls must yield the same sequence of values. All sampling
/// methods take `&self` so a single provider can be shared by the fixture
/// store, the stage engine and the assertion engine at once.
///
/// # Examples
///
/// ```rust
/// use seeded_testing_framework::orchestrator::{SeedProvider, TestRng};
///
/// let rng = TestRng::with_seed(42);
/// let roll = rng.integer(1, 6);
/// assert!((1..=6).contains(&roll));
/// assert_eq!(rng.seed(), 42);
/// ```
pub trait SeedProvider: Send + Sync {
    /// The seed this provider was created from (for logging and replay)
    fn seed(&self) -> u64;

    /// Uniform integer in the closed interval `[min, max]`
    fn integer(&self, min: i64, max: i64) -> i64;

    /// Uniform float in the closed interval `[min, max]`
    fn floating(&self, min: f64, max: f64) -> f64;

    /// Uniform index in `0..len`
    ///
    /// Returns 0 when `len` is 0; callers must not index an empty slice.
    fn pick_index(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.integer(0, len as i64 - 1) as usize
    }
}

/// Pick one candidate uniformly, or `None` when there are no candidates
pub fn pickone<'a, T>(rng: &dyn SeedProvider, candidates: &'a [T]) -> Option<&'a T> {
    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.pick_index(candidates.len()))
}

/// Bernoulli trial with the given percentage (0.0 - 100.0)
pub fn chance(rng: &dyn SeedProvider, percent: f64) -> bool {
    if percent <= 0.0 {
        return false;
    }
    rng.floating(0.0, 100.0) < percent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickone_empty() {
        let rng = TestRng::with_seed(1);
        let empty: [u8; 0] = [];
        assert!(pickone(&rng, &empty).is_none());
    }

    #[test]
    fn test_pickone_single() {
        let rng = TestRng::with_seed(1);
        for _ in 0..20 {
            assert_eq!(pickone(&rng, &["only"]), Some(&"only"));
        }
    }

    #[test]
    fn test_pickone_covers_all_candidates() {
        let rng = TestRng::with_seed(7);
        let candidates = ["a", "b", "c"];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(*pickone(&rng, &candidates).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_chance_bounds() {
        let rng = TestRng::with_seed(3);
        assert!((0..100).all(|_| !chance(&rng, 0.0)));
        assert!((0..100).all(|_| chance(&rng, 100.1)));
    }
}
