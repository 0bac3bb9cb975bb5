//! Result aggregation and serialization.

use std::collections::BTreeMap;

use sift_core::{ScoreValue, Verdict};

/// Decimal places kept in the time map.
const TIME_DECIMALS: f64 = 1e8;

/// Round elapsed seconds to the time-map resolution.
pub(crate) fn round_elapsed(secs: f64) -> f64 {
    (secs * TIME_DECIMALS).round() / TIME_DECIMALS
}

/// Assemble the merged per-signal maps into a verdict.
pub(crate) fn assemble(
    scores: BTreeMap<String, ScoreValue>,
    errors: BTreeMap<String, String>,
    timings: BTreeMap<String, f64>,
) -> Verdict {
    Verdict::from_parts(scores, errors, timings)
}

/// Serialize a verdict, degrading instead of failing.
///
/// Serialization of a [`Verdict`] cannot realistically fail, but the
/// entry point must never raise, so the fallback path is spelled out.
pub(crate) fn serialize(verdict: &Verdict) -> String {
    match serde_json::to_string(verdict) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!(error = %err, "verdict serialization failed");
            let degraded = Verdict::catastrophic(format!("verdict serialization failed: {err}"));
            serde_json::to_string(&degraded).unwrap_or_else(|_| {
                r#"{"err_msg":{"total_crush":"verdict serialization failed"}}"#.to_string()
            })
        }
    }
}
