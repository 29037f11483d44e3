//! Corpus data model and the sentence-block text format.
//!
//! A corpus file is UTF-8 text with one block per sentence. Blocks are
//! separated by a single blank line; each block holds `# key = value`
//! comment lines followed by tab-separated token lines:
//!
//! ```text
//! # source_sent_id = http://hdl.handle.net/x UD_English/train.conllu s1
//! # text = The cat sat
//! 1	The	the	DET	_	_	2	det	_	_	*
//! 2	cat	cat	NOUN	_	_	3	nsubj	_	_	1:VID
//! 3	sat	sit	VERB	_	_	0	root	_	_	1
//! ```
//!
//! Annotated files carry the span tag as their last column; treebank files
//! (`.conllu`) do not.

pub mod sentence;
pub mod token;

use std::fmt;
use std::path::Path;

pub use sentence::{MetaLine, Metadata, Sentence};
pub use token::{group_indices, Membership, SpanTag, Token, TokenId};

/// Metadata key of the column header line in annotated files.
pub const GLOBAL_COLUMNS_KEY: &str = "global.columns";

/// A malformed line in a corpus file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with it.
    pub message: String,
}

/// Whether token lines end with a span-tag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The last column is a span tag (`.cupt`).
    Annotated,
    /// Morphosyntax only (`.conllu`).
    Plain,
}

impl Layout {
    /// Picks the layout for a file from its header line or its extension.
    ///
    /// A `# global.columns` header naming an `MWE` column wins; otherwise
    /// `.cupt` files are annotated and everything else is plain.
    #[must_use]
    pub fn detect(path: &Path, contents: &str) -> Self {
        let header = contents
            .lines()
            .take_while(|l| l.starts_with('#'))
            .map(MetaLine::parse)
            .find_map(|line| match line {
                MetaLine::Pair { key, value } if key == GLOBAL_COLUMNS_KEY => Some(value),
                _ => None,
            });
        if let Some(columns) = header {
            return if columns.split_whitespace().any(|c| c.ends_with("MWE")) {
                Self::Annotated
            } else {
                Self::Plain
            };
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("cupt") => Self::Annotated,
            _ => Self::Plain,
        }
    }
}

/// An ordered sequence of sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    /// Sentences in file order.
    pub sentences: Vec<Sentence>,
}

impl Corpus {
    /// Parses corpus text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed token lines, comment lines
    /// after token lines, or token lines whose column count differs from the
    /// rest of their sentence.
    pub fn parse(contents: &str, layout: Layout) -> Result<Self, ParseError> {
        let mut sentences = Vec::new();
        let mut meta = Vec::new();
        let mut tokens: Vec<Token> = Vec::new();

        for (i, raw) in contents.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if line.trim().is_empty() {
                if !meta.is_empty() || !tokens.is_empty() {
                    sentences.push(Sentence {
                        metadata: Metadata::new(std::mem::take(&mut meta)),
                        tokens: std::mem::take(&mut tokens),
                    });
                }
                continue;
            }

            if line.starts_with('#') {
                if !tokens.is_empty() {
                    return Err(ParseError {
                        line: line_no,
                        message: "comment line inside token lines".into(),
                    });
                }
                meta.push(MetaLine::parse(line));
                continue;
            }

            let token = Token::parse(line, line_no, layout == Layout::Annotated)?;
            if let Some(first) = tokens.first() {
                if first.width() != token.width() {
                    return Err(ParseError {
                        line: line_no,
                        message: format!(
                            "expected {} columns like the first token, found {}",
                            first.width(),
                            token.width()
                        ),
                    });
                }
            }
            tokens.push(token);
        }

        if !meta.is_empty() || !tokens.is_empty() {
            sentences.push(Sentence { metadata: Metadata::new(meta), tokens });
        }

        Ok(Self { sentences })
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sentence in &self.sentences {
            writeln!(f, "{sentence}")?;
        }
        Ok(())
    }
}
