//! Run settings: defaults, optional YAML file, environment.
//!
//! Precedence, lowest first: built-in defaults, the YAML file given with
//! `--config`, `REANNOTATE_*` environment variables (a `.env` file in the
//! working directory is loaded first), then explicit command-line flags,
//! which the command handlers apply on top.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ResyncError, Result};
use crate::ports::FileSystem;

/// Default tagging service endpoint (UDPipe 2 REST API).
pub const DEFAULT_TAGGER_URL: &str = "https://lindat.mff.cuni.cz/services/udpipe/api";
/// Default maximum size of one tagging request, in bytes.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 200_000;
/// Default suffix marking output corpora as reannotated.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "reannotated";

/// Settings shared by both resynchronization modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the tagging service.
    pub tagger_url: String,
    /// Model name sent to the tagging service; falls back to the language code.
    pub tagger_model: Option<String>,
    /// Upper bound on the size of one tagging request.
    pub max_request_bytes: usize,
    /// Suffix inserted before the extension of output corpora.
    pub output_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tagger_url: DEFAULT_TAGGER_URL.to_string(),
            tagger_model: None,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional YAML file, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an
    /// environment override is not valid.
    pub fn load(fs: &dyn FileSystem, file: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut settings = match file {
            Some(path) => Self::from_yaml(fs, path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_yaml(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .map_err(|source| ResyncError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ResyncError::Config(format!("{}: {e}", path.display())))
    }

    /// Applies `REANNOTATE_*` overrides read through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("REANNOTATE_TAGGER_URL") {
            self.tagger_url = url;
        }
        if let Some(model) = lookup("REANNOTATE_TAGGER_MODEL") {
            self.tagger_model = Some(model);
        }
        if let Some(raw) = lookup("REANNOTATE_MAX_REQUEST_BYTES") {
            self.max_request_bytes = raw.parse().map_err(|_| {
                ResyncError::Config(format!("REANNOTATE_MAX_REQUEST_BYTES is not a number: {raw}"))
            })?;
        }
        if let Some(suffix) = lookup("REANNOTATE_OUTPUT_SUFFIX") {
            self.output_suffix = suffix;
        }
        Ok(())
    }

    /// Checks values that may also arrive from the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ResyncError::Config`] naming the offending value.
    pub fn validate(&self) -> Result<()> {
        if self.max_request_bytes == 0 {
            return Err(ResyncError::Config("max_request_bytes must be positive".into()));
        }
        if self.output_suffix.is_empty() || self.output_suffix.contains(['/', '\\']) {
            return Err(ResyncError::Config(format!(
                "output suffix '{}' must be a non-empty file name fragment",
                self.output_suffix
            )));
        }
        Ok(())
    }
}
