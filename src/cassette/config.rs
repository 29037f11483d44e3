//! Locating the per-port cassettes to replay.

use std::path::{Path, PathBuf};

use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette fall back to an
/// adapter that refuses to be called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the operator cassette.
    pub operator: Option<PathBuf>,
    /// Path to the tagger cassette.
    pub tagger: Option<PathBuf>,
    /// Path to the clock cassette.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
#[derive(Debug, Default)]
pub struct PortReplayers {
    /// Replayer for the operator port.
    pub operator: Option<CassetteReplayer>,
    /// Replayer for the tagger port.
    pub tagger: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Picks up the cassettes a recording session left in `dir`.
    ///
    /// A port whose cassette file is missing stays unconfigured.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let find = |port: &str| {
            let path = dir.join(super::file_name(port));
            path.is_file().then_some(path)
        };
        Self { operator: find("operator"), tagger: find("tagger"), clock: find("clock") }
    }

    /// Returns `true` if no port has a cassette.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operator.is_none() && self.tagger.is_none() && self.clock.is_none()
    }

    /// Load all configured cassettes.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            operator: self.operator.as_deref().map(CassetteReplayer::load).transpose()?,
            tagger: self.tagger.as_deref().map(CassetteReplayer::load).transpose()?,
            clock: self.clock.as_deref().map(CassetteReplayer::load).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn from_dir_only_configures_present_cassettes() {
        let dir = std::env::temp_dir().join("reannotate_cassette_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let cassette = Cassette {
            name: "ops".into(),
            recorded_at: Utc::now(),
            run_id: "r".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "operator".into(),
                method: "confirm".into(),
                input: json!({}),
                output: json!({"ok": true}),
            }],
        };
        let yaml = serde_yaml::to_string(&cassette).unwrap();
        std::fs::write(dir.join("operator.cassette.yaml"), yaml).unwrap();
        let _ = std::fs::remove_file(dir.join("tagger.cassette.yaml"));
        let _ = std::fs::remove_file(dir.join("clock.cassette.yaml"));

        let config = CassetteConfig::from_dir(&dir);
        assert!(config.operator.is_some());
        assert!(config.tagger.is_none());
        assert!(!config.is_empty());

        let mut replayers = config.load_all().unwrap();
        let operator = replayers.operator.as_mut().unwrap();
        let output = operator.next_output("operator", "confirm", &json!({})).unwrap();
        assert_eq!(output, json!({"ok": true}));
        assert!(replayers.clock.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_empty() {
        let config = CassetteConfig::from_dir(Path::new("/nonexistent/reannotate/cassettes"));
        assert!(config.is_empty());
    }
}
