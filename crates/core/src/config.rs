//! Engine configuration surface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_DEADLINE_SECS: u64 = 10;
const DEFAULT_ERROR_BUDGET: usize = 10_000;

/// Timeout-enforcement strategy used by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    /// Run the signal in a forked child process and kill it at the
    /// deadline. The computation itself stops; partial work is
    /// abandoned cleanly. Unix only; other platforms fall back to
    /// [`Enforcement::Watchdog`] at dispatch time.
    Preemptive,

    /// Run the signal on a worker thread and stop waiting at the
    /// deadline. Weaker guarantee: only the reporting is bounded. The
    /// abandoned worker keeps running until the signal returns on its
    /// own, and its result is discarded.
    Watchdog,
}

impl Enforcement {
    /// The strongest strategy available on this platform.
    pub fn preferred() -> Self {
        if cfg!(unix) {
            Enforcement::Preemptive
        } else {
            Enforcement::Watchdog
        }
    }
}

impl Default for Enforcement {
    fn default() -> Self {
        Self::preferred()
    }
}

impl std::str::FromStr for Enforcement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preemptive" => Ok(Enforcement::Preemptive),
            "watchdog" => Ok(Enforcement::Watchdog),
            other => Err(format!("unknown enforcement strategy: {other}")),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deadline applied to signals without an override.
    pub default_deadline: Duration,

    /// Per-signal-name deadline overrides.
    pub deadline_overrides: HashMap<String, Duration>,

    /// Maximum recorded error-text length, in characters.
    pub error_budget: usize,

    /// Timeout-enforcement strategy.
    #[serde(default)]
    pub enforcement: Enforcement,
}

impl EngineConfig {
    /// Deadline for one signal, honoring per-name overrides.
    pub fn deadline_for(&self, name: &str) -> Duration {
        self.deadline_overrides
            .get(name)
            .copied()
            .unwrap_or(self.default_deadline)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            deadline_overrides: HashMap::new(),
            error_budget: DEFAULT_ERROR_BUDGET,
            enforcement: Enforcement::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_takes_precedence_over_default() {
        let mut config = EngineConfig::default();
        config
            .deadline_overrides
            .insert("slow_signal".to_string(), Duration::from_secs(30));

        assert_eq!(config.deadline_for("slow_signal"), Duration::from_secs(30));
        assert_eq!(config.deadline_for("other"), Duration::from_secs(10));
    }

    #[test]
    fn enforcement_parses_from_str() {
        assert_eq!(
            "preemptive".parse::<Enforcement>().unwrap(),
            Enforcement::Preemptive
        );
        assert_eq!(
            "watchdog".parse::<Enforcement>().unwrap(),
            Enforcement::Watchdog
        );
        assert!("alarm".parse::<Enforcement>().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.default_deadline, config.default_deadline);
        assert_eq!(back.error_budget, config.error_budget);
        assert_eq!(back.enforcement, config.enforcement);
    }
}
