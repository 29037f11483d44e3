//! Recording adapter for the `Operator` port.

use std::error::Error;
use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Confirmation, Operator};

/// Records every operator decision while delegating to an inner operator.
pub struct RecordingOperator {
    inner: Box<dyn Operator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingOperator {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn Operator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Operator for RecordingOperator {
    fn confirm(&self, request: &Confirmation) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let result = self.inner.confirm(request);
        record_result(&self.recorder, "confirm", request, &result);
        result
    }
}
