//! Watchdog strategy: bounded waiting, best-effort abandonment.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sift_core::{Document, Signal, SignalOutcome};

/// Run the signal on a worker thread and wait up to `deadline` for its
/// result.
///
/// On timeout the worker is abandoned: it keeps consuming resources
/// until the signal returns or crashes on its own, and its eventual
/// result is discarded. Only the reporting is bounded.
pub(super) fn run(
    signal: &Arc<dyn Signal>,
    doc: &Arc<Document>,
    deadline: Duration,
) -> SignalOutcome {
    let (tx, rx) = mpsc::sync_channel(1);
    let worker_signal = Arc::clone(signal);
    let worker_doc = Arc::clone(doc);

    let spawned = thread::Builder::new()
        .name(format!("sift-signal-{}", signal.name()))
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| worker_signal.score(&worker_doc)));
            let _ = tx.send(result);
        });

    if let Err(err) = spawned {
        return SignalOutcome::Failed {
            message: format!("failed to spawn signal worker: {err}"),
        };
    }

    match rx.recv_timeout(deadline) {
        Ok(result) => super::settle(result),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(signal = signal.name(), "deadline expired, worker abandoned");
            SignalOutcome::TimedOut { deadline }
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => SignalOutcome::Failed {
            message: "signal worker exited without a result".to_string(),
        },
    }
}
