//! Drives the engine over one old corpus in treebank mode.

use tracing::{debug, info, warn};

use super::align::{align_tokens, Alignment};
use super::audit::AuditLog;
use super::classify::{classify, Classification, Decision};
use super::matcher::{CandidatePool, Found};
use super::metadata::{rewrite, Provenance};
use super::propagate::propagate;
use super::Counters;
use crate::context::ServiceContext;
use crate::corpus::{Corpus, Sentence, Token};
use crate::ports::{Confirmation, Topic};

/// Fixed inputs of a treebank-mode run.
#[derive(Debug, Clone, Copy)]
pub struct TreebankSource<'a> {
    /// Every sentence of the new source.
    pub pool: &'a CandidatePool,
    /// URI written into `source_sent_id`.
    pub corpus_uri: &'a str,
}

/// Resynchronizes every sentence of `old`, in order.
///
/// Returns the output corpus and the counters for this file. Per-sentence
/// problems never abort the loop; they are counted and logged to `audit`.
pub fn resync_corpus(
    ctx: &ServiceContext,
    old: &Corpus,
    source: TreebankSource<'_>,
    audit: &mut AuditLog,
) -> (Corpus, Counters) {
    let mut counters = Counters::default();
    let total = old.sentences.len();
    let mut sentences = Vec::with_capacity(total);

    for (index, sentence) in old.sentences.iter().enumerate() {
        let (emitted, decision) = resync_sentence(ctx, sentence, source, audit);
        let unchanged = emitted == *sentence;
        counters.record(decision, unchanged);
        audit.note(format!("[{}/{total}] {}: {decision}", index + 1, sentence.label()));
        debug!(sentence = sentence.label(), %decision, unchanged, "sentence decided");
        sentences.push(emitted);
    }

    (Corpus { sentences }, counters)
}

/// Decides one sentence and returns what to emit for it.
fn resync_sentence(
    ctx: &ServiceContext,
    old: &Sentence,
    source: TreebankSource<'_>,
    audit: &mut AuditLog,
) -> (Sentence, Decision) {
    let found = match source.pool.find(old, ctx.operator.as_ref(), audit) {
        Ok(Some(found)) => found,
        Ok(None) => {
            info!(sentence = old.label(), "not found in the new source");
            audit.not_found(old.label());
            return (old.clone(), Decision::NotFound);
        }
        Err(e) => {
            warn!(sentence = old.label(), error = %e, "operator unavailable while matching");
            audit.not_found(old.label());
            return (old.clone(), Decision::NotFound);
        }
    };
    debug!(sentence = old.label(), kind = ?found.kind, "counterpart found");

    let new = &found.candidate.sentence;
    let alignment = align_tokens(&old.tokens, &new.tokens);
    let merged = merge(old, found, &alignment, source.corpus_uri);

    match classify(&alignment, &old.tokens) {
        Classification::AutoMatched => (merged, Decision::AutoMatched),
        Classification::ChangedSafe => {
            let request = Confirmation {
                topic: Topic::ChangedTokenization,
                sentence: old.label().to_string(),
                context: highlight(old, &merged, &alignment),
                question: "Apply the new tokenization?".into(),
            };
            match audit.confirm(ctx.operator.as_ref(), &request) {
                Ok(true) => (merged, Decision::ChangedSafeAccepted),
                Ok(false) => (old.clone(), Decision::ChangedSafeDeclined),
                Err(e) => {
                    warn!(sentence = old.label(), error = %e, "operator unavailable, deferring");
                    (old.clone(), Decision::ChangedConflict)
                }
            }
        }
        Classification::ChangedConflict(tokens) => {
            let affected: Vec<String> = tokens.iter().map(ToString::to_string).collect();
            let affected = affected.join("; ");
            warn!(sentence = old.label(), tokens = %affected, "needs manual correction");
            audit.note(format!("{}: needs manual correction: {affected}", old.label()));
            (old.clone(), Decision::ChangedConflict)
        }
    }
}

/// New tokens carrying the propagated tags, under rewritten metadata.
fn merge(old: &Sentence, found: Found<'_>, alignment: &Alignment, corpus_uri: &str) -> Sentence {
    let new = &found.candidate.sentence;
    let tags = propagate(alignment, &old.tokens, &new.tokens);
    let tagged = old.tokens.iter().any(|t| t.tag.is_some());

    let tokens = new
        .tokens
        .iter()
        .zip(tags)
        .map(|(token, tag)| Token {
            id: token.id,
            form: token.form.clone(),
            columns: token.columns.clone(),
            tag: tagged.then_some(tag),
        })
        .collect();

    let provenance = Provenance {
        corpus_uri,
        file: &found.candidate.file,
        sent_id: new.sent_id().unwrap_or_else(|| new.label()),
    };
    Sentence { metadata: rewrite(old, new, &provenance), tokens }
}

/// Before/after token lines, changed tokens marked with `-` and `+`.
fn highlight(old: &Sentence, merged: &Sentence, alignment: &Alignment) -> Vec<String> {
    let side = |tokens: &[Token], changed: &dyn Fn(usize) -> bool, mark: char| {
        tokens
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mark = if changed(i) { mark } else { ' ' };
                format!("{mark} {}\t{}\t{}", t.id, t.form, t.tag_or_empty())
            })
            .collect::<Vec<_>>()
    };

    let mut lines = vec!["before:".to_string()];
    lines.extend(side(&old.tokens, &|i| alignment.is_changed_in_old(i), '-'));
    lines.push("after:".to_string());
    lines.extend(side(&merged.tokens, &|i| alignment.is_changed_in_new(i), '+'));
    lines
}
