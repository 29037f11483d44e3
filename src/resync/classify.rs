//! Decides how safe it is to carry annotations across an alignment.

use std::collections::BTreeMap;
use std::fmt;

use super::align::Alignment;
use crate::corpus::{SpanTag, Token, TokenId};

/// Result of classifying one aligned sentence pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Tokenization unchanged; propagate silently.
    AutoMatched,
    /// Tokenization changed, but no annotated old token is affected.
    ChangedSafe,
    /// An annotated old token sits in a changed region, or the annotation
    /// itself is inconsistent. Never applied automatically.
    ChangedConflict(Vec<ConflictToken>),
}

/// An old token that blocks automatic propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictToken {
    /// Identifier of the old token.
    pub id: TokenId,
    /// Surface form of the old token.
    pub form: String,
    /// Its span tag.
    pub tag: SpanTag,
    /// Why it blocks propagation.
    pub reason: ConflictReason,
}

/// Why a token was reported as a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The token lies inside a changed region.
    ChangedRegion,
    /// The token's group has no head carrying a category.
    OrphanGroup,
    /// The token's group has more than one head carrying a category.
    SeveralHeads,
}

impl fmt::Display for ConflictToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            ConflictReason::ChangedRegion => "changed tokenization",
            ConflictReason::OrphanGroup => "group without category",
            ConflictReason::SeveralHeads => "group with several categories",
        };
        write!(f, "{} {} {} ({reason})", self.id, self.form, self.tag)
    }
}

/// Final per-sentence decision, computed fresh on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No counterpart in the new source.
    NotFound,
    /// Propagated without operator interaction.
    AutoMatched,
    /// Changed tokenization accepted by the operator.
    ChangedSafeAccepted,
    /// Changed tokenization declined by the operator.
    ChangedSafeDeclined,
    /// Deferred to manual correction.
    ChangedConflict,
}

impl Decision {
    /// Returns `true` when the sentence is emitted with merged content.
    ///
    /// Only [`Decision::AutoMatched`] and [`Decision::ChangedSafeAccepted`]
    /// ever emit merged content; every other outcome emits the old sentence
    /// verbatim.
    #[must_use]
    pub fn emits_merged(self) -> bool {
        matches!(self, Self::AutoMatched | Self::ChangedSafeAccepted)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::AutoMatched => "auto-matched",
            Self::ChangedSafeAccepted => "changed tokenization accepted",
            Self::ChangedSafeDeclined => "changed tokenization declined",
            Self::ChangedConflict => "needs manual correction",
        })
    }
}

/// Classifies an aligned pair given the old tokens' tags.
#[must_use]
pub fn classify(alignment: &Alignment, old: &[Token]) -> Classification {
    let mut conflicts: Vec<ConflictToken> = old
        .iter()
        .enumerate()
        .filter(|(i, _)| alignment.is_changed_in_old(*i))
        .filter_map(|(_, token)| {
            let tag = token.tag_or_empty();
            (!tag.is_outside()).then(|| ConflictToken {
                id: token.id,
                form: token.form.clone(),
                tag,
                reason: ConflictReason::ChangedRegion,
            })
        })
        .collect();

    for violation in integrity_violations(old) {
        if !conflicts.iter().any(|c| c.id == violation.id) {
            conflicts.push(violation);
        }
    }

    if !conflicts.is_empty() {
        return Classification::ChangedConflict(conflicts);
    }
    if alignment.is_unchanged() {
        Classification::AutoMatched
    } else {
        Classification::ChangedSafe
    }
}

/// Finds span groups that are internally inconsistent.
///
/// A group must have exactly one member carrying its category. Members of a
/// group with no such head, or with several, are reported.
#[must_use]
pub fn integrity_violations(tokens: &[Token]) -> Vec<ConflictToken> {
    let mut heads: BTreeMap<u32, usize> = BTreeMap::new();
    for token in tokens {
        if let Some(SpanTag::Groups(memberships)) = &token.tag {
            for m in memberships {
                *heads.entry(m.group).or_default() += usize::from(m.category.is_some());
            }
        }
    }

    tokens
        .iter()
        .filter_map(|token| {
            let tag = token.tag.as_ref()?;
            let reason = tag.groups().find_map(|g| match heads.get(&g) {
                Some(0) => Some(ConflictReason::OrphanGroup),
                Some(n) if *n > 1 => Some(ConflictReason::SeveralHeads),
                _ => None,
            })?;
            Some(ConflictToken { id: token.id, form: token.form.clone(), tag: tag.clone(), reason })
        })
        .collect()
}
