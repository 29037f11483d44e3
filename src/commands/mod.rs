//! Command dispatch and handlers.

pub mod tagger;
pub mod treebank;

use std::env;
use std::path::{Path, PathBuf};

use tracing::{error, info};
use uuid::Uuid;

use crate::adapters::live::{DiskFileSystem, TerminalOperator};
use crate::adapters::scripted::FixedOperator;
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::{RecordingSession, DEFAULT_ROOT};
use crate::cli::{Assume, Command, CommonArgs};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::ports::Operator;
use crate::resync::Counters;

/// Environment variable that turns on recording. Its value is the directory
/// sessions are written below; an empty value uses [`DEFAULT_ROOT`].
pub const RECORD_ENV: &str = "REANNOTATE_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `REANNOTATE_RECORD` is set, operator decisions, tagging exchanges
/// and clock readings are recorded to per-port cassette files.
///
/// # Errors
///
/// Returns an error string if settings are invalid or the selected mode
/// fails.
pub fn dispatch(command: &Command) -> Result<Counters, String> {
    let common = command.common();
    let mut settings =
        Settings::load(&DiskFileSystem, common.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(suffix) = &common.suffix {
        settings.output_suffix.clone_from(suffix);
    }
    if let Command::Tagger(args) = command {
        if let Some(url) = &args.tagger_url {
            settings.tagger_url.clone_from(url);
        }
    }
    settings.validate().map_err(|e| e.to_string())?;

    let run_id = Uuid::new_v4();
    info!(%run_id, lang = %common.lang, "starting run");

    let (ctx, session) = if let Some(dir) = &common.replay {
        (replaying(dir)?, None)
    } else if let Ok(root) = env::var(RECORD_ENV) {
        let root = if root.is_empty() { PathBuf::from(DEFAULT_ROOT) } else { PathBuf::from(root) };
        let (ctx, session) =
            ServiceContext::recording_at(&root, &run_id.to_string(), operator(common), &settings)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(operator(common), &settings), None)
    };

    let result = dispatch_with_context(command, &ctx, &settings, run_id);

    // Finish recording after the run completes, even on error
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
    run_id: Uuid,
) -> Result<Counters, String> {
    let result = match command {
        Command::Treebank(args) => treebank::run(ctx, settings, args, run_id),
        Command::Tagger(args) => tagger::run(ctx, settings, args, run_id),
    };
    result.map_err(|e| {
        error!(error = %e, "run aborted");
        e.to_string()
    })
}

fn operator(common: &CommonArgs) -> Box<dyn Operator> {
    match common.assume {
        Some(Assume::Yes) => Box::new(FixedOperator(true)),
        Some(Assume::No) => Box::new(FixedOperator(false)),
        None => Box::new(TerminalOperator::stdio()),
    }
}

fn replaying(dir: &Path) -> Result<ServiceContext, String> {
    let config = CassetteConfig::from_dir(dir);
    if config.is_empty() {
        return Err(format!("no cassettes found in {}", dir.display()));
    }
    ServiceContext::replaying_from(&config)
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
