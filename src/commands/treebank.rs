//! `reannotate treebank`: resynchronize against a newer treebank release.

use tracing::info;
use uuid::Uuid;

use crate::cli::TreebankArgs;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::resync::audit::AuditLog;
use crate::resync::matcher::CandidatePool;
use crate::resync::orchestrator::{resync_corpus, TreebankSource};
use crate::resync::output::{collect_inputs, read_corpus, write_results, FileResult, OutputPaths};
use crate::resync::Counters;

/// Runs treebank mode over every input and writes the outputs.
///
/// All inputs and candidates are read before any sentence is decided, and
/// nothing is written until every input is done.
///
/// # Errors
///
/// Returns an error if an input or candidate path is missing or malformed,
/// or an output cannot be written.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    args: &TreebankArgs,
    run_id: Uuid,
) -> Result<Counters> {
    let fs = ctx.fs.as_ref();
    let common = &args.common;
    let inputs = collect_inputs(fs, &common.inputs, &settings.output_suffix)?;
    let corpora = inputs.iter().map(|path| read_corpus(fs, path)).collect::<Result<Vec<_>>>()?;
    let pool = CandidatePool::load(fs, &args.candidates)?;
    info!(inputs = inputs.len(), candidates = pool.len(), "loaded corpora");

    let source = TreebankSource { pool: &pool, corpus_uri: &args.source_uri };
    let mut total = Counters::default();
    let mut results = Vec::with_capacity(inputs.len());

    for (input, old) in inputs.into_iter().zip(corpora) {
        let mut audit = AuditLog::begin(run_id, ctx.clock.as_ref(), "treebank", &input);
        audit.note(format!("language: {}", common.lang));
        audit.note(format!("source: {}", args.source_uri));

        let (corpus, counters) = resync_corpus(ctx, &old, source, &mut audit);
        audit.finish(ctx.clock.as_ref(), &counters);
        info!(
            input = %input.display(),
            sentences = counters.total(),
            not_found = counters.not_found,
            "resynchronized"
        );
        total += counters;

        let output_dir = common.output_dir.as_deref();
        results.push(FileResult {
            paths: OutputPaths::for_input(&input, output_dir, &settings.output_suffix),
            input,
            corpus,
            audit,
        });
    }

    write_results(fs, &results)?;
    Ok(total)
}
