//! Replaying adapters that serve recorded interactions from cassettes.

pub mod clock;
pub mod operator;
pub mod tagger;

pub use clock::ReplayingClock;
pub use operator::ReplayingOperator;
pub use tagger::ReplayingTagger;

use std::sync::Mutex;

use serde::Serialize;

use crate::cassette::replayer::{split_result, CassetteReplayer};

/// Takes the next recorded outcome for `port`/`method` from `replayer`.
///
/// # Errors
///
/// Returns an error if the cassette is exhausted, the recording holds an
/// error, or the recorded value has the wrong shape.
pub(crate) fn replay_result<I, T>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
    input: &I,
) -> Result<T, String>
where
    I: Serialize,
    T: serde::de::DeserializeOwned,
{
    let input = serde_json::to_value(input).map_err(|e| format!("{port}::{method}: {e}"))?;
    let output = replayer
        .lock()
        .map_err(|e| format!("replayer lock poisoned: {e}"))?
        .next_output(port, method, &input)?;
    split_result(output)
}
