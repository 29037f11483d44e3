//! Records one port's interactions into a cassette file.

use std::fmt::Display;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::format::{Cassette, Interaction};

/// Collects the calls made on a single port and writes them as YAML.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    port: String,
    run_id: String,
    started: DateTime<Utc>,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Recorder for `port`, written to `path` by [`finish`](Self::finish).
    pub fn new(
        path: impl Into<PathBuf>,
        port: impl Into<String>,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            port: port.into(),
            run_id: run_id.into(),
            started: Utc::now(),
            interactions: Vec::new(),
        }
    }

    /// Port this recorder captures.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Appends a raw interaction; its sequence number is its position.
    pub fn record(&mut self, method: impl Into<String>, input: Value, output: Value) {
        self.interactions.push(Interaction {
            seq: self.interactions.len() as u64,
            port: self.port.clone(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Appends a call and its outcome.
    ///
    /// `Ok(v)` is stored as `{"ok": v}` and `Err(e)` as `{"err": "<message>"}`,
    /// the shape the replaying adapters read back.
    ///
    /// # Errors
    ///
    /// Returns the serialization error when `input` or the `Ok` value cannot
    /// be turned into JSON; nothing is recorded then.
    pub fn record_outcome<I, T, E>(
        &mut self,
        method: &str,
        input: &I,
        result: &Result<T, E>,
    ) -> Result<(), serde_json::Error>
    where
        I: Serialize + ?Sized,
        T: Serialize,
        E: Display,
    {
        let output = match result {
            Ok(value) => json!({ "ok": serde_json::to_value(value)? }),
            Err(e) => json!({ "err": e.to_string() }),
        };
        let input = serde_json::to_value(input)?;
        self.record(method, input, output);
        Ok(())
    }

    /// Interactions recorded so far.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Writes the cassette and returns its path.
    ///
    /// The YAML goes to a sibling temporary file first and is renamed into
    /// place, so an interrupted run never leaves a truncated cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn finish(self) -> io::Result<PathBuf> {
        let cassette = Cassette {
            name: self.port,
            recorded_at: self.started,
            run_id: self.run_id,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(io::Error::other)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut staging = self.path.clone().into_os_string();
        staging.push(".partial");
        std::fs::write(&staging, yaml)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_numbered_and_tagged_ok_or_err() {
        let mut recorder = CassetteRecorder::new("/unused", "operator", "run-7");
        recorder.record_outcome("confirm", "s1", &Ok::<_, String>(true)).unwrap();
        recorder.record_outcome("confirm", "s2", &Err::<bool, _>("closed")).unwrap();

        let recorded = recorder.interactions();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].seq, 1);
        assert_eq!(recorded[1].port, "operator");
        assert_eq!(recorded[0].output, json!({"ok": true}));
        assert_eq!(recorded[1].input, json!("s2"));
        assert_eq!(recorded[1].output, json!({"err": "closed"}));
    }

    #[test]
    fn finish_creates_the_directory_and_leaves_no_partial_file() {
        let dir =
            std::env::temp_dir().join(format!("reannotate-recorder-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("operator.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "operator", "run-7");
        recorder.record("confirm", json!({"sentence": "a"}), json!({"ok": false}));
        assert_eq!(recorder.finish().unwrap(), path);

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.name, "operator");
        assert_eq!(cassette.run_id, "run-7");
        assert_eq!(cassette.interactions[0].output, json!({"ok": false}));
        let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("operator.cassette.yaml")]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
