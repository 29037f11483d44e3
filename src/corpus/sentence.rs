//! Sentences and their metadata block.

use std::fmt;

use super::token::Token;

/// Metadata key holding the human-readable sentence text.
pub const TEXT_KEY: &str = "text";
/// Metadata key holding a sentence's own identifier in a treebank.
pub const SENT_ID_KEY: &str = "sent_id";
/// Metadata key recording where the morphosyntax of a sentence came from.
pub const SOURCE_SENT_ID_KEY: &str = "source_sent_id";

/// One comment line preceding the token lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaLine {
    /// A `# key = value` line.
    Pair {
        /// Key, without the leading `# `.
        key: String,
        /// Value after ` = `.
        value: String,
    },
    /// Any other comment line, kept verbatim (including its `#`).
    Raw(String),
}

impl MetaLine {
    /// Parses a comment line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        line.strip_prefix("# ")
            .and_then(|rest| rest.split_once(" = "))
            .filter(|(key, _)| !key.is_empty() && !key.contains(char::is_whitespace))
            .map_or_else(
                || Self::Raw(line.to_string()),
                |(key, value)| Self::Pair { key: key.to_string(), value: value.to_string() },
            )
    }
}

impl fmt::Display for MetaLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pair { key, value } => write!(f, "# {key} = {value}"),
            Self::Raw(line) => f.write_str(line),
        }
    }
}

/// Ordered metadata of a sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    lines: Vec<MetaLine>,
}

impl Metadata {
    /// Creates metadata from parsed lines.
    #[must_use]
    pub fn new(lines: Vec<MetaLine>) -> Self {
        Self { lines }
    }

    /// Returns the value of the first line with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            MetaLine::Pair { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Sets `key` in place, or appends it when absent.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        for line in &mut self.lines {
            if let MetaLine::Pair { key: k, value: v } = line {
                if k == key {
                    *v = value;
                    return;
                }
            }
        }
        self.lines.push(MetaLine::Pair { key: key.to_string(), value });
    }

    /// Iterates the lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &MetaLine> {
        self.lines.iter()
    }
}

/// A metadata block plus its token lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Comment lines, in file order.
    pub metadata: Metadata,
    /// Token lines, in file order.
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// The `text` metadata value.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.metadata.get(TEXT_KEY)
    }

    /// The sentence's own identifier (`sent_id`).
    #[must_use]
    pub fn sent_id(&self) -> Option<&str> {
        self.metadata.get(SENT_ID_KEY)
    }

    /// Identifier of the source sentence this one was derived from.
    ///
    /// `source_sent_id` holds `<uri> <file> <id>`; the identifier is its last
    /// field.
    #[must_use]
    pub fn source_sent_id(&self) -> Option<&str> {
        self.metadata.get(SOURCE_SENT_ID_KEY).and_then(|v| v.split_whitespace().last())
    }

    /// Best identifier for log lines and reports.
    #[must_use]
    pub fn label(&self) -> &str {
        self.source_sent_id().or_else(|| self.sent_id()).unwrap_or("<unidentified>")
    }

    /// Surface forms of every token line, in order.
    #[must_use]
    pub fn forms(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.form.as_str()).collect()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.metadata.lines() {
            writeln!(f, "{line}")?;
        }
        for token in &self.tokens {
            writeln!(f, "{token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_lines_are_recognised() {
        assert_eq!(
            MetaLine::parse("# text = The cat sat ."),
            MetaLine::Pair { key: "text".into(), value: "The cat sat .".into() }
        );
    }

    #[test]
    fn odd_comment_lines_stay_raw() {
        for line in ["#newdoc", "# just a note", "#text = x"] {
            let parsed = MetaLine::parse(line);
            assert_eq!(parsed, MetaLine::Raw(line.into()));
            assert_eq!(parsed.to_string(), line);
        }
    }

    #[test]
    fn set_replaces_in_place_and_appends_missing() {
        let mut meta = Metadata::new(vec![
            MetaLine::parse("# source_sent_id = a b c"),
            MetaLine::parse("# text = old"),
        ]);
        meta.set(TEXT_KEY, "new");
        meta.set("extra", "1");
        let rendered: Vec<String> = meta.lines().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["# source_sent_id = a b c", "# text = new", "# extra = 1"]);
    }

    #[test]
    fn source_sent_id_takes_last_field() {
        let sentence = Sentence {
            metadata: Metadata::new(vec![MetaLine::parse(
                "# source_sent_id = http://hdl.handle.net/x UD_X/train.conllu s-42",
            )]),
            tokens: vec![],
        };
        assert_eq!(sentence.source_sent_id(), Some("s-42"));
        assert_eq!(sentence.label(), "s-42");
    }
}
