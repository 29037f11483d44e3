//! Non-interactive operators for batch runs and tests.

use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Mutex, PoisonError};

use crate::ports::operator::{Confirmation, Operator};

/// Gives the same answer to every question.
#[derive(Debug, Clone, Copy)]
pub struct FixedOperator(pub bool);

impl Operator for FixedOperator {
    fn confirm(&self, _request: &Confirmation) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(self.0)
    }
}

/// Answers from a fixed list, in order, and records what it was asked.
pub struct ScriptedOperator {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<Confirmation>>,
}

impl ScriptedOperator {
    /// Creates an operator that gives `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<Confirmation> {
        self.asked.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Operator for ScriptedOperator {
    fn confirm(&self, request: &Confirmation) -> Result<bool, Box<dyn Error + Send + Sync>> {
        self.asked.lock().map_err(|e| format!("lock poisoned: {e}"))?.push(request.clone());
        self.answers
            .lock()
            .map_err(|e| format!("lock poisoned: {e}"))?
            .pop_front()
            .ok_or_else(|| format!("no scripted answer left for {}", request.sentence).into())
    }
}
