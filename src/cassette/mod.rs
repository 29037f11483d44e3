//! Cassette format for recording and replaying port interactions.
//!
//! A recorded run stores one YAML cassette per port. Replaying those
//! cassettes reproduces operator decisions, tagger answers and audit-log
//! timestamps without a terminal or network.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;

/// File name of the cassette recorded for `port`.
#[must_use]
pub fn file_name(port: &str) -> String {
    format!("{port}.cassette.yaml")
}
