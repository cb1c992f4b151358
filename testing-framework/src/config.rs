// File: testing-framework/src/config.rs
//
// Session configuration, built in code or loaded from YAML / the environment.

use crate::orchestrator::TestRng;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Options for a [`TestSession`](crate::session::TestSession)
///
/// ```rust
/// use seeded_testing_framework::SessionConfig;
///
/// let config = SessionConfig::from_yaml_str("seed: 0x2a\nverbose: true").unwrap();
/// assert_eq!(config.seed, Some(42));
/// assert!(config.verbose);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Fixed seed; when unset the session derives one and warns how to replay it
    #[serde(deserialize_with = "seed_repr::deserialize")]
    pub seed: Option<u64>,
    /// Emit per-stage and per-iteration traces through the observer
    pub verbose: bool,
}

impl SessionConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse session config")
    }

    /// Seed from `FIXTURE_TEST_SEED` when set, otherwise unset
    pub fn from_env() -> Self {
        Self {
            seed: std::env::var(TestRng::SEED_ENV_VAR)
                .ok()
                .and_then(|raw| TestRng::parse_seed(&raw)),
            ..Self::default()
        }
    }
}

/// Seeds are accepted as integers or as `0x`-prefixed / decimal strings
mod seed_repr {
    use crate::orchestrator::TestRng;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Int(seed)) => Ok(Some(seed)),
            Some(Raw::Text(text)) => TestRng::parse_seed(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid seed '{}'", text))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_seed_forms() {
        assert_eq!(SessionConfig::from_yaml_str("seed: 42").unwrap().seed, Some(42));
        assert_eq!(
            SessionConfig::from_yaml_str("seed: \"0xdeadbeef\"").unwrap().seed,
            Some(0xdeadbeef)
        );
        assert_eq!(SessionConfig::from_yaml_str("verbose: false").unwrap().seed, None);
        assert!(SessionConfig::from_yaml_str("seed: nope").is_err());
        assert!(SessionConfig::from_yaml_str("colour: red").is_err());
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::with_seed(7).verbose(true);
        assert_eq!(config.seed, Some(7));
        assert!(config.verbose);
        assert_eq!(SessionConfig::default().seed, None);
    }
}
