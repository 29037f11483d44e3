//! Token identifiers, span tags and token lines.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// Identifier in the first column of a token line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenId {
    /// A base word ordinal (`3`).
    Word(u32),
    /// A multiword range covering words `start..=end` (`3-4`).
    Range(u32, u32),
    /// An empty node inserted after word `base` (`3.1`).
    Empty(u32, u32),
}

impl TokenId {
    /// The base ordinal this identifier derives from.
    #[must_use]
    pub fn origin(self) -> u32 {
        match self {
            Self::Word(n) | Self::Range(n, _) | Self::Empty(n, _) => n,
        }
    }

    /// Returns `true` for range and empty-node identifiers.
    #[must_use]
    pub fn is_derived(self) -> bool {
        !matches!(self, Self::Word(_))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(n) => write!(f, "{n}"),
            Self::Range(start, end) => write!(f, "{start}-{end}"),
            Self::Empty(base, sub) => write!(f, "{base}.{sub}"),
        }
    }
}

impl FromStr for TokenId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = |part: &str| {
            part.parse::<u32>().map_err(|_| format!("invalid token identifier '{s}'"))
        };
        if let Some((start, end)) = s.split_once('-') {
            let (start, end) = (number(start)?, number(end)?);
            if end < start {
                return Err(format!("range '{s}' ends before it starts"));
            }
            Ok(Self::Range(start, end))
        } else if let Some((base, sub)) = s.split_once('.') {
            Ok(Self::Empty(number(base)?, number(sub)?))
        } else {
            Ok(Self::Word(number(s)?))
        }
    }
}

/// One membership of a token in an annotated expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Membership {
    /// Span-group index shared by every token of the expression.
    pub group: u32,
    /// Category label, present only on the first token of the group.
    pub category: Option<String>,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "{}:{category}", self.group),
            None => write!(f, "{}", self.group),
        }
    }
}

/// Content of the span-tag column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpanTag {
    /// `*`: the token belongs to no expression.
    Outside,
    /// `_`: the empty marker, used on range tokens and unannotated text.
    Empty,
    /// One or more memberships, `;`-separated in persisted form.
    Groups(Vec<Membership>),
}

impl SpanTag {
    /// Returns `true` when the tag carries no expression membership.
    #[must_use]
    pub fn is_outside(&self) -> bool {
        !matches!(self, Self::Groups(_))
    }

    /// Group indices referenced by this tag.
    pub fn groups(&self) -> impl Iterator<Item = u32> + '_ {
        let memberships: &[Membership] = match self {
            Self::Groups(m) => m,
            Self::Outside | Self::Empty => &[],
        };
        memberships.iter().map(|m| m.group)
    }
}

impl fmt::Display for SpanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outside => f.write_str("*"),
            Self::Empty => f.write_str("_"),
            Self::Groups(memberships) => {
                for (i, m) in memberships.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for SpanTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*" => return Ok(Self::Outside),
            "_" => return Ok(Self::Empty),
            _ => {}
        }
        let mut memberships = Vec::new();
        for part in s.split(';') {
            let (group, category) = match part.split_once(':') {
                Some((group, category)) if !category.is_empty() => {
                    (group, Some(category.to_string()))
                }
                Some(_) => return Err(format!("empty category in span tag '{s}'")),
                None => (part, None),
            };
            let group =
                group.parse::<u32>().map_err(|_| format!("invalid span tag '{s}'"))?;
            memberships.push(Membership { group, category });
        }
        Ok(Self::Groups(memberships))
    }
}

/// One token line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// First column.
    pub id: TokenId,
    /// Second column, the surface form.
    pub form: String,
    /// Morphosyntax columns after the form (LEMMA through MISC).
    pub columns: Vec<String>,
    /// Span-tag column, absent in sources that carry no annotation.
    pub tag: Option<SpanTag>,
}

impl Token {
    /// Parses a tab-separated token line.
    ///
    /// When `tagged` is set the last column is read as the span tag.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the identifier or span tag is malformed
    /// or the line has too few columns.
    pub fn parse(line: &str, line_no: usize, tagged: bool) -> Result<Self, ParseError> {
        let fail = |message: String| ParseError { line: line_no, message };
        let mut fields: Vec<&str> = line.split('\t').collect();
        let minimum = if tagged { 3 } else { 2 };
        if fields.len() < minimum {
            return Err(fail(format!(
                "expected at least {minimum} tab-separated columns, found {}",
                fields.len()
            )));
        }
        let tag = if tagged {
            let raw = fields.pop().unwrap_or_default();
            Some(raw.parse::<SpanTag>().map_err(fail)?)
        } else {
            None
        };
        let id = fields[0].parse::<TokenId>().map_err(fail)?;
        Ok(Self {
            id,
            form: fields[1].to_string(),
            columns: fields[2..].iter().map(|c| (*c).to_string()).collect(),
            tag,
        })
    }

    /// Number of columns this token occupies when written out.
    #[must_use]
    pub fn width(&self) -> usize {
        2 + self.columns.len() + usize::from(self.tag.is_some())
    }

    /// Tag of this token, treating a missing column as the empty marker.
    #[must_use]
    pub fn tag_or_empty(&self) -> SpanTag {
        self.tag.clone().unwrap_or(SpanTag::Empty)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.form)?;
        for column in &self.columns {
            write!(f, "\t{column}")?;
        }
        if let Some(tag) = &self.tag {
            write!(f, "\t{tag}")?;
        }
        Ok(())
    }
}

/// Collects the distinct span-group indices used by `tokens`.
#[must_use]
pub fn group_indices(tokens: &[Token]) -> BTreeSet<u32> {
    tokens.iter().filter_map(|t| t.tag.as_ref()).flat_map(SpanTag::groups).collect()
}
