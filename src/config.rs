//! Process-wide tunables (spec §9 open questions; `SPEC_FULL.md` §6).
//!
//! `spec.md` hard-codes the toilet threshold and leaves the child
//! termination grace period unspecified. `RuntimeConfig` keeps the studied
//! defaults and makes both overridable, optionally from a TOML file.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Units a push-mode input pad may have buffered before its producer is
    /// killed. Spec default: 200.
    pub toilet_overflow_threshold: i64,
    /// Grace period a parent waits for a child to exit after requesting
    /// `stopped` before force-aborting its task.
    #[serde(with = "duration_millis")]
    pub termination_grace: Duration,
    /// Default `preferred_size` for pads that don't declare one.
    pub default_preferred_size: u64,
    /// Interval between `TimerTick` broadcasts to a pipeline's subtree.
    #[serde(with = "duration_millis")]
    pub timer_period: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            toilet_overflow_threshold: 200,
            termination_grace: Duration::from_secs(2),
            default_preferred_size: 10,
            timer_period: Duration::from_millis(100),
        }
    }
}

impl RuntimeConfig {
    /// Parses a `RuntimeConfig` out of TOML text, falling back to
    /// `Default` for any field left unset.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
