//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::resync::tagger_mode::Column;

/// Top-level CLI parser for `reannotate`.
#[derive(Debug, Parser)]
#[command(
    name = "reannotate",
    version,
    about = "Carry multiword-expression annotations over to updated morphosyntax"
)]
pub struct Cli {
    /// Log per-sentence decisions.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The mode to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Where the updated morphosyntax comes from.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resynchronize against a newer release of a reference treebank.
    Treebank(TreebankArgs),
    /// Resynchronize against a tagging and parsing service.
    Tagger(TaggerArgs),
}

impl Command {
    /// Options shared by both modes.
    #[must_use]
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Treebank(args) => &args.common,
            Self::Tagger(args) => &args.common,
        }
    }
}

/// How prompts are answered when no terminal should be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Assume {
    /// Confirm every question.
    Yes,
    /// Decline every question.
    No,
}

/// Options shared by both modes.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Language code of the corpus.
    #[arg(long)]
    pub lang: String,

    /// Annotated corpus files, or directories searched for `.cupt` files.
    #[arg(long = "input", short = 'i', required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Directory for outputs; defaults to each input's directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Answer every prompt without asking.
    #[arg(long, value_enum, conflicts_with = "replay")]
    pub assume: Option<Assume>,

    /// Replay operator decisions and tagger answers from a recorded
    /// cassette directory.
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// YAML settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suffix inserted before the extension of output corpora.
    #[arg(long)]
    pub suffix: Option<String>,
}

/// Treebank mode options.
#[derive(Debug, Args)]
pub struct TreebankArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub common: CommonArgs,

    /// New-source files, or directories searched for `.conllu`/`.cupt` files.
    #[arg(long, required = true, num_args = 1..)]
    pub candidates: Vec<PathBuf>,

    /// URI of the new treebank release, written into `source_sent_id`.
    #[arg(long, env = "REANNOTATE_SOURCE_URI")]
    pub source_uri: String,
}

/// Tagger mode options.
#[derive(Debug, Args)]
pub struct TaggerArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub common: CommonArgs,

    /// Columns to overwrite; all morphosyntax columns when omitted.
    #[arg(long, value_enum, value_delimiter = ',', ignore_case = true)]
    pub columns: Vec<Column>,

    /// Model name sent to the service; defaults to the language code.
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the tagging service.
    #[arg(long)]
    pub tagger_url: Option<String>,
}
