//! Replays recorded interactions from a cassette.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Loads a cassette file and creates a replayer over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read cassette {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("failed to parse cassette {}: {e}", path.display()))?;
        Ok(Self::new(&cassette))
    }

    /// Returns the recorded output of the next interaction for `port` and
    /// `method`.
    ///
    /// The recorded input is compared with `input`; a difference means the
    /// run has diverged from the recording and is logged, but the recorded
    /// output is still served.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette has no (more) interactions for the
    /// given port/method combination.
    pub fn next_output(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(format!(
                "cassette exhausted: no interactions recorded for {port}::{method} \
                 (available: [{}])",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(format!(
                "cassette exhausted: all {} interactions for {port}::{method} have been consumed",
                queue.len()
            ));
        };
        *cursor += 1;

        if &interaction.input != input {
            warn!(port, method, seq = interaction.seq, "replayed input differs from recording");
        }
        Ok(interaction.output.clone())
    }
}

/// Splits a recorded `{"ok": ..}` / `{"err": ..}` output into a `Result`.
///
/// # Errors
///
/// Returns the recorded error message, or a description of the malformed
/// output.
pub fn split_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, String> {
    if let Some(ok) = output.get("ok") {
        return serde_json::from_value(ok.clone())
            .map_err(|e| format!("malformed recorded output: {e}"));
    }
    match output.get("err") {
        Some(serde_json::Value::String(message)) => Err(message.clone()),
        Some(other) => Err(other.to_string()),
        None => Err(format!("recorded output has neither ok nor err: {output}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input: json!({"seq": seq}),
            output,
        }
    }

    fn replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            run_id: "run".into(),
            interactions,
        })
    }

    #[test]
    fn serves_each_port_in_its_own_order() {
        let mut r = replayer(vec![
            interaction(0, "operator", "confirm", json!({"ok": true})),
            interaction(1, "clock", "now", json!({"ok": "2024-01-01T00:00:00Z"})),
            interaction(2, "operator", "confirm", json!({"ok": false})),
        ]);
        let mut confirm = |seq: u64| r.next_output("operator", "confirm", &json!({ "seq": seq }));
        assert_eq!(confirm(0).unwrap(), json!({"ok": true}));
        assert_eq!(confirm(2).unwrap(), json!({"ok": false}));
        assert!(r.next_output("clock", "now", &json!({"seq": 1})).is_ok());
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let mut r = replayer(vec![interaction(0, "operator", "confirm", json!({"ok": true}))]);
        r.next_output("operator", "confirm", &json!({})).unwrap();
        let err = r.next_output("operator", "confirm", &json!({})).unwrap_err();
        assert!(err.contains("all 1 interactions"));
    }

    #[test]
    fn unknown_port_lists_what_is_available() {
        let mut r = replayer(vec![interaction(0, "tagger", "tag", json!({"ok": {}}))]);
        let err = r.next_output("operator", "confirm", &json!({})).unwrap_err();
        assert!(err.contains("tagger::tag"));
    }

    #[test]
    fn split_result_reads_both_shapes() {
        assert_eq!(split_result::<bool>(json!({"ok": true})), Ok(true));
        assert_eq!(split_result::<bool>(json!({"err": "closed"})), Err("closed".to_string()));
        assert!(split_result::<bool>(json!(42)).is_err());
    }
}
