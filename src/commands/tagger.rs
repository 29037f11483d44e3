//! `reannotate tagger`: resynchronize against a tagging service.

use tokio::runtime::Builder;
use tracing::info;
use uuid::Uuid;

use crate::cli::TaggerArgs;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::{ResyncError, Result};
use crate::resync::audit::AuditLog;
use crate::resync::output::{collect_inputs, read_corpus, write_results, FileResult, OutputPaths};
use crate::resync::tagger_mode::{retag_corpus, Column, TaggerJob};
use crate::resync::Counters;

/// Runs tagger mode over every input and writes the outputs.
///
/// The model is `--model`, else the configured model, else the language
/// code. No columns selected means all of them.
///
/// # Errors
///
/// Returns an error if an input is missing or malformed, the service fails
/// on every chunk of a file, or an output cannot be written.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    args: &TaggerArgs,
    run_id: Uuid,
) -> Result<Counters> {
    let fs = ctx.fs.as_ref();
    let common = &args.common;
    let inputs = collect_inputs(fs, &common.inputs, &settings.output_suffix)?;
    let corpora = inputs.iter().map(|path| read_corpus(fs, path)).collect::<Result<Vec<_>>>()?;

    let runtime = Builder::new_current_thread().enable_all().build().map_err(ResyncError::Runtime)?;
    let model = args
        .model
        .as_deref()
        .or(settings.tagger_model.as_deref())
        .unwrap_or(&common.lang);
    let columns: &[Column] = if args.columns.is_empty() { &Column::ALL } else { &args.columns };
    let job = TaggerJob { model, columns, max_request_bytes: settings.max_request_bytes };
    info!(inputs = inputs.len(), model, url = %settings.tagger_url, "tagging corpora");

    let mut total = Counters::default();
    let mut results = Vec::with_capacity(inputs.len());

    for (input, old) in inputs.into_iter().zip(corpora) {
        let mut audit = AuditLog::begin(run_id, ctx.clock.as_ref(), "tagger", &input);
        audit.note(format!("language: {}", common.lang));
        audit.note(format!("model: {model}"));

        let (corpus, counters) = retag_corpus(ctx, &runtime, &old, job, &input, &mut audit)?;
        audit.finish(ctx.clock.as_ref(), &counters);
        info!(
            input = %input.display(),
            sentences = counters.total(),
            not_found = counters.not_found,
            "retagged"
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
