//! Replaying adapter for the `Clock` port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::Clock;

/// Replays recorded clock values from a cassette.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a new replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    /// Serves the next recorded time. Once the cassette runs out the epoch
    /// is returned, so a diverging replay still completes.
    fn now(&self) -> DateTime<Utc> {
        replay_result(&self.replayer, "clock", "now", &()).unwrap_or_else(|e: String| {
            warn!(error = %e, "no recorded time left, using the epoch");
            DateTime::<Utc>::UNIX_EPOCH
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    fn make_replayer(times: &[&str]) -> CassetteReplayer {
        let interactions = times
            .iter()
            .zip(0..)
            .map(|(ts, seq)| Interaction {
                seq,
                port: "clock".into(),
                method: "now".into(),
                input: json!(null),
                output: json!({ "ok": ts }),
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            run_id: "run".into(),
            interactions,
        })
    }

    #[test]
    fn serves_recorded_times_in_order() {
        let times = ["2024-06-15T10:30:00Z", "2024-06-15T10:31:00Z"];
        let clock = ReplayingClock::new(make_replayer(&times));
        assert_eq!(clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
        assert_eq!(clock.now().to_rfc3339(), "2024-06-15T10:31:00+00:00");
    }

    #[test]
    fn falls_back_to_epoch_when_exhausted() {
        let clock = ReplayingClock::new(make_replayer(&[]));
        assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH);
    }
}
