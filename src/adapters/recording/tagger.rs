//! Recording adapter for the `Tagger` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{TagFuture, TagRequest, Tagger};

/// Records tagging exchanges while delegating to an inner tagger.
pub struct RecordingTagger {
    inner: Box<dyn Tagger>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTagger {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn Tagger>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Tagger for RecordingTagger {
    fn tag(&self, request: &TagRequest) -> TagFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.tag(&request).await;
            record_result(&self.recorder, "tag", &request, &result);
            result
        })
    }
}
