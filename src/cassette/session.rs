//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Default directory, relative to the working directory, that recording
/// sessions write below.
pub const DEFAULT_ROOT: &str = ".reannotate/cassettes";

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing to a separate cassette file.
/// All cassettes of a run are stored in one timestamped directory.
pub struct RecordingSession {
    /// Recorder for operator decisions.
    pub operator: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for tagging exchanges.
    pub tagger: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock readings.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates a session below `root` in a directory named after the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new_in(root: &Path, run_id: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| {
            let path = output_dir.join(super::file_name(port));
            Arc::new(Mutex::new(CassetteRecorder::new(path, port, run_id)))
        };

        Ok(Self {
            operator: make_recorder("operator"),
            tagger: make_recorder("tagger"),
            clock: make_recorder("clock"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette and returns the session directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a recording adapter is still alive or a cassette
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        for recorder in [self.operator, self.tagger, self.clock] {
            let recorder = Arc::try_unwrap(recorder)
                .map_err(|_| "a recording adapter is still alive".to_string())?
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner);
            let port = recorder.port().to_string();
            recorder.finish().map_err(|e| format!("failed to write {port} cassette: {e}"))?;
        }
        Ok(self.output_dir)
    }
}
