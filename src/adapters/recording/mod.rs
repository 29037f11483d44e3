//! Recording adapters that capture port interactions to a cassette.
//!
//! Each adapter wraps a live implementation, delegates the call, and appends
//! the input/output pair to a shared [`CassetteRecorder`].

pub mod clock;
pub mod operator;
pub mod tagger;

pub use clock::RecordingClock;
pub use operator::RecordingOperator;
pub use tagger::RecordingTagger;

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Appends a call and its outcome to a shared recorder.
///
/// A value that fails to serialize is skipped with a warning rather than
/// aborting the run.
pub(crate) fn record_result<I, T, E>(
    recorder: &Mutex<CassetteRecorder>,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize + ?Sized,
    T: Serialize,
    E: std::fmt::Display,
{
    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(e) = guard.record_outcome(method, input, result) {
        warn!(port = guard.port(), method, error = %e, "interaction not recorded");
    }
}
