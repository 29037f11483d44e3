//! Tagger port for the external morphosyntax service.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`Tagger`] to keep the trait dyn-compatible.
pub type TagFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TagResponse, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// One chunk of pre-tokenized sentences to (re)tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRequest {
    /// Model or language identifier understood by the service.
    pub model: String,
    /// Sentence-segmented morphosyntax table, without the span-tag column.
    pub table: String,
}

/// The service's answer to a [`TagRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    /// Structurally identical table with morphosyntax columns filled in.
    pub table: String,
}

/// Sends pre-tokenized tables to a tagging and parsing service.
pub trait Tagger: Send + Sync {
    /// Tags one chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, service error,
    /// oversized request).
    fn tag(&self, request: &TagRequest) -> TagFuture<'_>;
}
