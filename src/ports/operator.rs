//! Operator port for yes/no confirmations.

use std::error::Error;

use serde::{Deserialize, Serialize};

/// What the operator is asked to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Accept an approximate text match as the sentence's counterpart.
    ApproximateMatch,
    /// Apply propagated tags across a changed, untagged region.
    ChangedTokenization,
}

/// A yes/no question with the context needed to answer it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Kind of decision.
    pub topic: Topic,
    /// Identifier of the old sentence under review.
    pub sentence: String,
    /// Lines shown before the question (before/after token lines, texts).
    pub context: Vec<String>,
    /// The question itself.
    pub question: String,
}

/// Answers yes/no questions about individual sentences.
///
/// The interactive terminal, fixed-answer batch runs, scripted tests and
/// cassette replays all plug in here.
pub trait Operator: Send + Sync {
    /// Asks the operator to confirm `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be obtained (closed input stream,
    /// exhausted script).
    fn confirm(&self, request: &Confirmation) -> Result<bool, Box<dyn Error + Send + Sync>>;
}
