//! Resynchronization against a tagging service instead of a treebank.
//!
//! Tokenization cannot change here: the service gets the corpus's own
//! tokens. Every sentence whose chunk comes back intact is auto-matched and
//! has the selected morphosyntax columns overwritten in place; span tags and
//! metadata are untouched.

use std::ops::Range;
use std::path::Path;

use clap::ValueEnum;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::audit::AuditLog;
use super::classify::Decision;
use super::Counters;
use crate::context::ServiceContext;
use crate::corpus::{Corpus, Layout, Sentence, Token};
use crate::error::{ResyncError, Result};
use crate::ports::TagRequest;

/// A morphosyntax column the tagging service may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum Column {
    /// Lemma.
    Lemma,
    /// Universal part of speech.
    Upos,
    /// Language-specific part of speech.
    Xpos,
    /// Morphological features.
    Feats,
    /// Syntactic head.
    Head,
    /// Dependency relation.
    Deprel,
    /// Enhanced dependencies.
    Deps,
    /// Miscellaneous annotations.
    Misc,
}

impl Column {
    /// Every column, in file order.
    pub const ALL: [Self; 8] = [
        Self::Lemma,
        Self::Upos,
        Self::Xpos,
        Self::Feats,
        Self::Head,
        Self::Deprel,
        Self::Deps,
        Self::Misc,
    ];

    /// Position among the columns that follow the surface form.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Parameters of a tagger-mode run.
#[derive(Debug, Clone, Copy)]
pub struct TaggerJob<'a> {
    /// Model name sent to the service.
    pub model: &'a str,
    /// Columns to overwrite.
    pub columns: &'a [Column],
    /// Upper bound on one request's table size.
    pub max_request_bytes: usize,
}

/// Retags every sentence of `old` through `ctx.tagger`.
///
/// Chunks are sent one after another and reassembled in submission order.
/// A chunk the service fails on, or answers with a different tokenization,
/// leaves its sentences unchanged and counted as not found.
///
/// # Errors
///
/// Returns [`ResyncError::TaggerUnavailable`] when every chunk failed.
pub fn retag_corpus(
    ctx: &ServiceContext,
    runtime: &Runtime,
    old: &Corpus,
    job: TaggerJob<'_>,
    input: &Path,
    audit: &mut AuditLog,
) -> Result<(Corpus, Counters)> {
    let blocks: Vec<String> = old.sentences.iter().map(request_block).collect();
    let chunks = chunk(&blocks, job.max_request_bytes);
    let mut counters = Counters::default();
    let mut sentences = Vec::with_capacity(old.sentences.len());
    let mut last_error = None;
    let mut succeeded = 0usize;

    for (n, range) in chunks.iter().enumerate() {
        let part = &old.sentences[range.clone()];
        let request =
            TagRequest { model: job.model.to_string(), table: blocks[range.clone()].concat() };
        debug!(
            chunk = n + 1,
            of = chunks.len(),
            sentences = part.len(),
            bytes = request.table.len(),
            "tagging chunk"
        );

        let outcome = runtime
            .block_on(ctx.tagger.tag(&request))
            .map_err(|e| e.to_string())
            .and_then(|response| substitute(part, &response.table, job.columns));

        match outcome {
            Ok(retagged) => {
                succeeded += 1;
                for (before, after) in part.iter().zip(retagged) {
                    let unchanged = after == *before;
                    counters.record(Decision::AutoMatched, unchanged);
                    audit.note(format!("{}: {}", before.label(), Decision::AutoMatched));
                    sentences.push(after);
                }
            }
            Err(reason) => {
                warn!(chunk = n + 1, error = %reason, "tagging chunk failed, sentences kept");
                audit.note(format!("chunk {} failed: {reason}", n + 1));
                for sentence in part {
                    counters.record(Decision::NotFound, true);
                    audit.not_found(sentence.label());
                    sentences.push(sentence.clone());
                }
                last_error = Some(reason);
            }
        }
    }

    if succeeded == 0 {
        if let Some(reason) = last_error {
            return Err(ResyncError::TaggerUnavailable { path: input.to_path_buf(), reason });
        }
    }
    Ok((Corpus { sentences }, counters))
}

/// A sentence as sent to the service: metadata and token lines without the
/// span-tag column, followed by a blank line.
fn request_block(sentence: &Sentence) -> String {
    let mut out = String::new();
    for line in sentence.metadata.lines() {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    for token in &sentence.tokens {
        out.push_str(&Token { tag: None, ..token.clone() }.to_string());
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Groups consecutive blocks so each group stays within `max_bytes`.
///
/// A block larger than `max_bytes` on its own still gets a group of its
/// own; sentences are never split.
fn chunk(blocks: &[String], max_bytes: usize) -> Vec<Range<usize>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut size = 0;
    for (i, block) in blocks.iter().enumerate() {
        if i > start && size + block.len() > max_bytes {
            chunks.push(start..i);
            start = i;
            size = 0;
        }
        if block.len() > max_bytes {
            warn!(bytes = block.len(), max_bytes, "sentence exceeds the request size limit");
        }
        size += block.len();
    }
    if start < blocks.len() {
        chunks.push(start..blocks.len());
    }
    chunks
}

/// Copies `columns` from the service's table onto `part`.
///
/// The table must hold the same sentences with the same token identifiers
/// and forms.
fn substitute(
    part: &[Sentence],
    table: &str,
    columns: &[Column],
) -> std::result::Result<Vec<Sentence>, String> {
    let tagged =
        Corpus::parse(table, Layout::Plain).map_err(|e| format!("unreadable response: {e}"))?;
    if tagged.sentences.len() != part.len() {
        return Err(format!(
            "response has {} sentences, request had {}",
            tagged.sentences.len(),
            part.len()
        ));
    }

    part.iter()
        .zip(&tagged.sentences)
        .map(|(old, new)| {
            let same_tokens = old.tokens.len() == new.tokens.len()
                && old.tokens.iter().zip(&new.tokens).all(|(a, b)| {
                    a.id == b.id && a.form == b.form
                });
            if !same_tokens {
                return Err(format!("response changed the tokenization of {}", old.label()));
            }
            let tokens = old
                .tokens
                .iter()
                .zip(&new.tokens)
                .map(|(o, n)| {
                    let mut token = o.clone();
                    for column in columns {
                        let i = column.index();
                        if let (Some(dst), Some(src)) =
                            (token.columns.get_mut(i), n.columns.get(i))
                        {
                            dst.clone_from(src);
                        }
                    }
                    token
                })
                .collect();
            Ok(Sentence { metadata: old.metadata.clone(), tokens })
        })
        .collect()
}
