//! Timeout-enforcing dispatcher.
//!
//! Runs one signal against one document under a wall-clock deadline.
//! Document content is untrusted and a signal is an arbitrary
//! synchronous computation that may not cooperate with cancellation,
//! so two enforcement strategies sit behind the same contract:
//!
//! - [`Enforcement::Preemptive`] (Unix): the signal runs in a forked
//!   child process that is killed at the deadline. The computation
//!   itself stops and its partial work is abandoned cleanly.
//! - [`Enforcement::Watchdog`] (portable): the signal runs on a worker
//!   thread and the dispatcher stops waiting at the deadline. The
//!   worker is abandoned and keeps running until the signal returns on
//!   its own; only the reporting is bounded.
//!
//! Callers and tests observe only the outcome type, never the
//! mechanism.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sift_core::{truncate_error, Document, Enforcement, ScoreValue, Signal, SignalOutcome};

#[cfg(unix)]
mod preemptive;
mod watchdog;

/// Run `signal` against `doc`, enforcing `deadline`.
///
/// Elapsed wall-clock time is measured and returned for every outcome,
/// including timeouts. Error text in a `Failed` outcome is truncated
/// to `error_budget` characters. The signal is never retried.
pub fn run_bounded(
    enforcement: Enforcement,
    signal: &Arc<dyn Signal>,
    doc: &Arc<Document>,
    deadline: Duration,
    error_budget: usize,
) -> (SignalOutcome, Duration) {
    let start = Instant::now();
    let outcome = match enforcement {
        #[cfg(unix)]
        Enforcement::Preemptive => preemptive::run(signal, doc, deadline, error_budget),
        #[cfg(not(unix))]
        Enforcement::Preemptive => watchdog::run(signal, doc, deadline),
        Enforcement::Watchdog => watchdog::run(signal, doc, deadline),
    };
    let elapsed = start.elapsed();

    let outcome = match outcome {
        SignalOutcome::Failed { message } => SignalOutcome::Failed {
            message: truncate_error(&message, error_budget),
        },
        other => other,
    };
    (outcome, elapsed)
}

/// Render a panic payload as error text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "signal panicked".to_string()
    }
}

/// Fold a signal's return value or panic into an outcome.
fn settle(result: std::thread::Result<anyhow::Result<ScoreValue>>) -> SignalOutcome {
    match result {
        Ok(Ok(score)) => SignalOutcome::Scored(score),
        Ok(Err(err)) => SignalOutcome::Failed {
            message: format!("{err:#}"),
        },
        Err(payload) => SignalOutcome::Failed {
            message: panic_message(payload.as_ref()),
        },
    }
}
