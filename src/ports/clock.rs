//! Clock port for audit-log timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the times written into audit logs.
///
/// Replayed runs read the recorded times back, so their logs match the
/// recorded run byte for byte.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// The current time as an audit-log stamp: RFC 3339, whole seconds, `Z`.
    fn stamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
