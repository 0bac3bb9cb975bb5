//! Preemptive strategy: fork, poll, kill.
//!
//! The signal runs in a forked child process and writes its outcome to
//! a pipe. The parent waits on the pipe with the remaining deadline
//! and delivers SIGKILL when it expires, so the computation itself
//! stops at the deadline and its partial work is discarded with the
//! child's address space.
//!
//! Child-side constraint: between `fork` and `_exit` the child must
//! touch nothing but the signal, the allocator, and the write end of
//! the pipe. It exits with `_exit` so no inherited destructors or exit
//! handlers run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sift_core::{truncate_error, Document, ScoreValue, Signal, SignalOutcome};

/// Outcome record written by the child over the result pipe.
#[derive(Serialize, Deserialize)]
enum WireOutcome {
    Scored(ScoreValue),
    Failed(String),
}

pub(super) fn run(
    signal: &Arc<dyn Signal>,
    doc: &Arc<Document>,
    deadline: Duration,
    error_budget: usize,
) -> SignalOutcome {
    let mut fds = [0 as libc::c_int; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return SignalOutcome::Failed {
            message: format!("pipe failed: {}", last_os_error()),
        };
    }
    let (read_fd, write_fd) = (fds[0], fds[1]);

    let pid = unsafe { libc::fork() };
    if pid < 0 {
        unsafe {
            libc::close(read_fd);
            libc::close(write_fd);
        }
        return SignalOutcome::Failed {
            message: format!("fork failed: {}", last_os_error()),
        };
    }

    if pid == 0 {
        // Child.
        unsafe { libc::close(read_fd) };
        let wire = match panic::catch_unwind(AssertUnwindSafe(|| signal.score(doc))) {
            Ok(Ok(score)) => WireOutcome::Scored(score),
            Ok(Err(err)) => {
                WireOutcome::Failed(truncate_error(&format!("{err:#}"), error_budget))
            }
            Err(payload) => WireOutcome::Failed(truncate_error(
                &super::panic_message(payload.as_ref()),
                error_budget,
            )),
        };
        let bytes = serde_json::to_vec(&wire).unwrap_or_default();
        write_all(write_fd, &bytes);
        unsafe { libc::_exit(0) };
    }

    // Parent.
    unsafe { libc::close(write_fd) };
    let outcome = wait_for_child(signal.name(), pid, read_fd, deadline);
    unsafe { libc::close(read_fd) };
    outcome
}

/// Read the child's outcome record, killing the child if the deadline
/// expires first.
fn wait_for_child(
    name: &str,
    pid: libc::pid_t,
    read_fd: libc::c_int,
    deadline: Duration,
) -> SignalOutcome {
    let start = Instant::now();
    let mut payload = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let remaining = deadline.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            tracing::warn!(signal = name, "deadline expired, killing signal process");
            return kill_and_report(pid, deadline);
        }

        let mut pfd = libc::pollfd {
            fd: read_fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = remaining
            .as_millis()
            .saturating_add(1)
            .min(i32::MAX as u128) as libc::c_int;
        let ready = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };

        if ready < 0 {
            if interrupted() {
                continue;
            }
            let err = last_os_error();
            let _ = kill_and_report(pid, deadline);
            return SignalOutcome::Failed {
                message: format!("poll failed: {err}"),
            };
        }
        if ready == 0 {
            // Let the remaining-time check at the top decide.
            continue;
        }

        let n = unsafe { libc::read(read_fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            if interrupted() {
                continue;
            }
            let err = last_os_error();
            let _ = kill_and_report(pid, deadline);
            return SignalOutcome::Failed {
                message: format!("read failed: {err}"),
            };
        }
        if n == 0 {
            // EOF: the child closed its end.
            break;
        }
        payload.extend_from_slice(&buf[..n as usize]);
    }

    reap(pid);

    if payload.is_empty() {
        return SignalOutcome::Failed {
            message: "signal process exited without a result".to_string(),
        };
    }
    match serde_json::from_slice::<WireOutcome>(&payload) {
        Ok(WireOutcome::Scored(score)) => SignalOutcome::Scored(score),
        Ok(WireOutcome::Failed(message)) => SignalOutcome::Failed { message },
        Err(err) => SignalOutcome::Failed {
            message: format!("malformed signal result: {err}"),
        },
    }
}

fn kill_and_report(pid: libc::pid_t, deadline: Duration) -> SignalOutcome {
    unsafe { libc::kill(pid, libc::SIGKILL) };
    reap(pid);
    SignalOutcome::TimedOut { deadline }
}

/// Wait for the child so it never lingers as a zombie.
fn reap(pid: libc::pid_t) {
    let mut status = 0 as libc::c_int;
    loop {
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc >= 0 || !interrupted() {
            return;
        }
    }
}

/// Write the whole buffer, ignoring a vanished reader.
fn write_all(fd: libc::c_int, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        let n = unsafe { libc::write(fd, bytes.as_ptr().cast(), bytes.len()) };
        if n < 0 {
            if interrupted() {
                continue;
            }
            return;
        }
        if n == 0 {
            return;
        }
        bytes = &bytes[n as usize..];
    }
}

fn interrupted() -> bool {
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EINTR)
}

fn last_os_error() -> std::io::Error {
    std::io::Error::last_os_error()
}
