//! Replaying adapter for the `Operator` port.

use std::error::Error;
use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{Confirmation, Operator};

/// Answers confirmations with the decisions recorded in a cassette.
pub struct ReplayingOperator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingOperator {
    /// Creates a replaying operator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Operator for ReplayingOperator {
    fn confirm(&self, request: &Confirmation) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(replay_result(&self.replayer, "operator", "confirm", request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::ports::Topic;
    use chrono::Utc;
    use serde_json::json;

    fn request() -> Confirmation {
        Confirmation {
            topic: Topic::ApproximateMatch,
            sentence: "s1".into(),
            context: vec!["old: A b".into(), "new: a b".into()],
            question: "Same sentence?".into(),
        }
    }

    #[test]
    fn replays_decisions_and_errors() {
        let input = serde_json::to_value(request()).unwrap();
        let interactions = [json!({"ok": false}), json!({"err": "input closed"})]
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "operator".into(),
                method: "confirm".into(),
                input: input.clone(),
                output,
            })
            .collect();
        let op = ReplayingOperator::new(CassetteReplayer::new(&Cassette {
            name: "ops".into(),
            recorded_at: Utc::now(),
            run_id: "run".into(),
            interactions,
        }));

        assert!(!op.confirm(&request()).unwrap());
        assert_eq!(op.confirm(&request()).unwrap_err().to_string(), "input closed");
        assert!(op.confirm(&request()).is_err());
    }
}
