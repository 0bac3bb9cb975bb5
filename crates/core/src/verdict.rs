//! Evaluation verdict - the terminal artifact of one evaluation call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::signal::ScoreValue;

/// Bookkeeping flag value reserved for the downstream pipeline.
const PRE_HIT_DEFAULT: &str = "0";

/// Error key for failures that escaped per-signal containment.
pub(crate) const CATASTROPHIC_KEY: &str = "total_crush";

/// Structured result of evaluating all applicable signals against one
/// document.
///
/// Maps are keyed by signal name and serialized with sorted keys, so
/// the textual form is deterministic while object order carries no
/// meaning. Constructed fresh per call; the engine retains no
/// reference after serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Signal name to score; null for timeouts and failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_signal: Option<BTreeMap<String, ScoreValue>>,

    /// Downstream pipeline bookkeeping flag, `"0"` by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_hit: Option<String>,

    /// Signal name to truncated error text; present only when any
    /// signal failed or timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<BTreeMap<String, String>>,

    /// Signal name to elapsed seconds, rounded to 8 decimal places;
    /// present only when any signal ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_map: Option<BTreeMap<String, f64>>,
}

impl Verdict {
    /// Assemble a verdict from aggregated per-signal maps.
    ///
    /// Empty error and time maps are omitted entirely; the score map is
    /// always present, empty for documents where nothing ran.
    pub fn from_parts(
        scores: BTreeMap<String, ScoreValue>,
        errors: BTreeMap<String, String>,
        timings: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            quality_signal: Some(scores),
            pre_hit: Some(PRE_HIT_DEFAULT.to_string()),
            err_msg: (!errors.is_empty()).then_some(errors),
            time_map: (!timings.is_empty()).then_some(timings),
        }
    }

    /// Degraded verdict carrying a single catastrophic error record.
    ///
    /// Used when a failure escapes the classification/dispatch
    /// sequence; the entry point returns this instead of raising.
    pub fn catastrophic(message: impl Into<String>) -> Self {
        let mut err_msg = BTreeMap::new();
        err_msg.insert(CATASTROPHIC_KEY.to_string(), message.into());
        Self {
            quality_signal: None,
            pre_hit: None,
            err_msg: Some(err_msg),
            time_map: None,
        }
    }
}
