//! Recording adapter for the `Clock` port.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::Clock;

/// Records every timestamp handed out by an inner clock.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingClock {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn Clock>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.inner.now();
        record_result::<_, _, Infallible>(&self.recorder, "now", &(), &Ok(now));
        now
    }
}
