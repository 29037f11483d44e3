//! Service context bundling all port trait objects.

use std::error::Error;
use std::path::Path;

use tracing::debug;

use crate::adapters::live::{DiskFileSystem, SystemClock, UdpipeTagger};
use crate::adapters::recording::{RecordingClock, RecordingOperator, RecordingTagger};
use crate::adapters::replaying::{ReplayingClock, ReplayingOperator, ReplayingTagger};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::Settings;
use crate::ports::{
    Clock, Confirmation, FileSystem, Operator, TagFuture, TagRequest, TagResponse, Tagger,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for audit-log timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem for corpus and report I/O.
    pub fs: Box<dyn FileSystem>,
    /// The human (or stand-in) answering confirmations.
    pub operator: Box<dyn Operator>,
    /// Morphosyntax tagging service.
    pub tagger: Box<dyn Tagger>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        fs: Box<dyn FileSystem>,
        operator: Box<dyn Operator>,
        tagger: Box<dyn Tagger>,
    ) -> Self {
        Self { clock, fs, operator, tagger }
    }

    /// Creates a live context: wall clock, local disk, the configured
    /// tagging service, and the given operator.
    #[must_use]
    pub fn live(operator: Box<dyn Operator>, settings: &Settings) -> Self {
        Self::new(
            Box::new(SystemClock),
            Box::new(DiskFileSystem),
            operator,
            Box::new(UdpipeTagger::new(&settings.tagger_url)),
        )
    }

    /// Creates a live context whose operator, tagger and clock interactions
    /// are recorded into a new session below `root`.
    ///
    /// The session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(
        root: &Path,
        run_id: &str,
        operator: Box<dyn Operator>,
        settings: &Settings,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(root, run_id)?;
        let live = Self::live(operator, settings);
        let ctx = Self {
            clock: Box::new(RecordingClock::new(live.clock, session.clock.clone())),
            fs: live.fs,
            operator: Box::new(RecordingOperator::new(live.operator, session.operator.clone())),
            tagger: Box::new(RecordingTagger::new(live.tagger, session.tagger.clone())),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from per-port cassettes.
    ///
    /// Corpora are still read from and written to disk. A port without a
    /// cassette uses an adapter that fails on every call, except the clock,
    /// which falls back to the wall clock.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => {
                    debug!("no clock cassette, using the wall clock");
                    Box::new(SystemClock)
                }
            },
            fs: Box::new(DiskFileSystem),
            operator: match replayers.operator {
                Some(r) => Box::new(ReplayingOperator::new(r)),
                None => Box::new(Unconfigured),
            },
            tagger: match replayers.tagger {
                Some(r) => Box::new(ReplayingTagger::new(r)),
                None => Box::new(Unconfigured),
            },
        })
    }
}

/// Stand-in for ports that have no cassette during replay.
struct Unconfigured;

impl Unconfigured {
    fn error(port: &str) -> Box<dyn Error + Send + Sync> {
        format!("{port} port not configured: no cassette loaded for {port}").into()
    }
}

impl Operator for Unconfigured {
    fn confirm(&self, _request: &Confirmation) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Err(Self::error("operator"))
    }
}

impl Tagger for Unconfigured {
    fn tag(&self, _request: &TagRequest) -> TagFuture<'_> {
        let result: Result<TagResponse, _> = Err(Self::error("tagger"));
        Box::pin(async move { result })
    }
}
