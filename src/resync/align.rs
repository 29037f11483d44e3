//! Token alignment between an old and a new tokenization.
//!
//! The aligner runs a longest-common-subsequence diff over the two surface
//! form sequences, treating every form as an atomic symbol. Runs the two
//! sequences share become [`AlignOp::Match`] operations; everything between
//! two shared runs is a [`ChangedRegion`].

use std::ops::Range;

use crate::corpus::Token;

/// One step of an edit script. Indices point into the token lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOp {
    /// Old token `old` and new token `new` carry the same form.
    Match {
        /// Index into the old tokens.
        old: usize,
        /// Index into the new tokens.
        new: usize,
    },
    /// Old token with no counterpart.
    Delete {
        /// Index into the old tokens.
        old: usize,
    },
    /// New token with no counterpart.
    Insert {
        /// Index into the new tokens.
        new: usize,
    },
}

/// A maximal run where the tokenizations disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedRegion {
    /// Old tokens changed in old (may be empty for a pure insertion).
    pub old: Range<usize>,
    /// New tokens changed in new (may be empty for a pure deletion).
    pub new: Range<usize>,
}

impl ChangedRegion {
    /// Old token whose tag inserted tokens of this region inherit.
    ///
    /// This is the region's first old token. Splits and merges have no
    /// provably right inheritance rule, so the engine keeps an annotation
    /// rather than dropping it and lets the classifier route non-trivial
    /// inherited tags to a human.
    #[must_use]
    pub fn inherit_from(&self) -> Option<usize> {
        (!self.old.is_empty()).then_some(self.old.start)
    }
}

/// Edit script plus the changed regions it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Operations, monotonic in both index sequences.
    pub ops: Vec<AlignOp>,
    /// Changed regions in order.
    pub regions: Vec<ChangedRegion>,
}

impl Alignment {
    /// Returns `true` when the two sequences were identical.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region containing new token `new`, if it was inserted.
    #[must_use]
    pub fn region_of_new(&self, new: usize) -> Option<&ChangedRegion> {
        self.regions.iter().find(|r| r.new.contains(&new))
    }

    /// Returns `true` when old token `old` lies inside a changed region.
    #[must_use]
    pub fn is_changed_in_old(&self, old: usize) -> bool {
        self.regions.iter().any(|r| r.old.contains(&old))
    }

    /// Returns `true` when new token `new` lies inside a changed region.
    #[must_use]
    pub fn is_changed_in_new(&self, new: usize) -> bool {
        self.region_of_new(new).is_some()
    }
}

/// Aligns two symbol sequences.
#[must_use]
pub fn align<T: PartialEq>(old: &[T], new: &[T]) -> Alignment {
    let ops = edit_script(old, new);
    let regions = changed_regions(&ops);
    Alignment { ops, regions }
}

/// Aligns two token lists.
///
/// A range or empty-node line only matches a line of the same kind, so a
/// word that the new source turns into a contraction range ends up inside a
/// changed region rather than matched against the range line.
#[must_use]
pub fn align_tokens(old: &[Token], new: &[Token]) -> Alignment {
    let old: Vec<_> = old.iter().map(symbol).collect();
    let new: Vec<_> = new.iter().map(symbol).collect();
    align(&old, &new)
}

fn symbol(token: &Token) -> (bool, &str) {
    (token.id.is_derived(), token.form.as_str())
}

/// Computes an LCS edit script with a dynamic-programming table.
///
/// Common prefix and suffix are peeled off first so the table only covers
/// the part of the sentence that actually differs. Within a changed stretch
/// deletions are emitted before insertions.
fn edit_script<T: PartialEq>(old: &[T], new: &[T]) -> Vec<AlignOp> {
    let eq = |i: usize, j: usize| old[i] == new[j];

    let prefix = (0..old.len().min(new.len())).take_while(|&k| eq(k, k)).count();
    let suffix = (0..(old.len() - prefix).min(new.len() - prefix))
        .take_while(|&k| eq(old.len() - 1 - k, new.len() - 1 - k))
        .count();

    let old_mid = prefix..old.len() - suffix;
    let new_mid = prefix..new.len() - suffix;
    let (n, m) = (old_mid.len(), new_mid.len());

    // lcs[i][j] = LCS length of old_mid[i..] and new_mid[j..]
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if eq(prefix + i, prefix + j) {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(old.len().max(new.len()));
    ops.extend((0..prefix).map(|k| AlignOp::Match { old: k, new: k }));

    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && eq(prefix + i, prefix + j) {
            ops.push(AlignOp::Match { old: prefix + i, new: prefix + j });
            i += 1;
            j += 1;
        } else if i < n && (j == m || lcs[i + 1][j] >= lcs[i][j + 1]) {
            ops.push(AlignOp::Delete { old: prefix + i });
            i += 1;
        } else {
            ops.push(AlignOp::Insert { new: prefix + j });
            j += 1;
        }
    }

    ops.extend((0..suffix).map(|k| AlignOp::Match {
        old: old_mid.end + k,
        new: new_mid.end + k,
    }));
    ops
}

/// Groups consecutive non-match operations into changed regions.
fn changed_regions(ops: &[AlignOp]) -> Vec<ChangedRegion> {
    let mut regions = Vec::new();
    // Cursor positions: next old/new index not yet consumed.
    let (mut old_pos, mut new_pos) = (0, 0);
    let mut open: Option<ChangedRegion> = None;

    for op in ops {
        match *op {
            AlignOp::Match { old, new } => {
                if let Some(region) = open.take() {
                    regions.push(region);
                }
                old_pos = old + 1;
                new_pos = new + 1;
            }
            AlignOp::Delete { old } => {
                let region = open.get_or_insert(ChangedRegion {
                    old: old_pos..old_pos,
                    new: new_pos..new_pos,
                });
                region.old.end = old + 1;
                old_pos = old + 1;
            }
            AlignOp::Insert { new } => {
                let region = open.get_or_insert(ChangedRegion {
                    old: old_pos..old_pos,
                    new: new_pos..new_pos,
                });
                region.new.end = new + 1;
                new_pos = new + 1;
            }
        }
    }
    if let Some(region) = open {
        regions.push(region);
    }
    regions
}
