//! Wall-clock bounded execution of a calculation.

use std::sync::mpsc::{RecvTimeoutError, channel};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::{AppError, AppResult};

/// Run `job` on a worker thread and wait at most `deadline` for its result.
///
/// On expiry the worker keeps running to completion and its result is dropped.
pub fn run_with_deadline<T, F>(deadline: Duration, job: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    let (tx, rx) = channel();
    thread::spawn(move || {
        // The receiver is gone once the deadline has passed.
        let _ = tx.send(job());
    });

    match rx.recv_timeout(deadline) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            let deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
            warn!(deadline_ms, "calculation exceeded its deadline");
            Err(AppError::Timeout { deadline_ms })
        }
        Err(RecvTimeoutError::Disconnected) => Err(AppError::WorkerLost),
    }
}
