//! Replaying adapter for the `Tagger` port.

use std::error::Error;
use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{TagFuture, TagRequest, TagResponse, Tagger};

/// Serves recorded tagging responses.
pub struct ReplayingTagger {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTagger {
    /// Creates a replaying tagger from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Tagger for ReplayingTagger {
    fn tag(&self, request: &TagRequest) -> TagFuture<'_> {
        let result: Result<TagResponse, Box<dyn Error + Send + Sync>> =
            replay_result(&self.replayer, "tagger", "tag", request).map_err(Into::into);
        Box::pin(async move { result })
    }
}
