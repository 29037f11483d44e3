//! The reannotation alignment engine.
//!
//! For each old sentence: find its counterpart ([`matcher`]), align the two
//! tokenizations ([`align`]), carry span tags across ([`propagate`]), decide
//! whether the result may be applied ([`classify`]) and point the metadata
//! at the new source ([`metadata`]). [`orchestrator`] drives that per file;
//! [`tagger_mode`] is the variant where the new source is a tagging service.

pub mod align;
pub mod audit;
pub mod classify;
pub mod matcher;
pub mod metadata;
pub mod orchestrator;
pub mod output;
pub mod propagate;
pub mod tagger_mode;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::ops::AddAssign;

use classify::Decision;

/// Per-run tallies of sentence outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// No counterpart in the new source (or its tagger chunk failed).
    pub not_found: usize,
    /// Matched and merged, but nothing changed.
    pub already_current: usize,
    /// Merged automatically with changes.
    pub auto_updated: usize,
    /// Changed tokenization merged after confirmation.
    pub token_and_tag_updated: usize,
    /// Changed tokenization declined by the operator.
    pub declined: usize,
    /// Left for manual correction.
    pub needs_manual_correction: usize,
}

impl Counters {
    /// Counts one decided sentence. `unchanged` tells whether the emitted
    /// sentence is byte-identical to the old one.
    pub fn record(&mut self, decision: Decision, unchanged: bool) {
        match decision {
            Decision::NotFound => self.not_found += 1,
            Decision::AutoMatched if unchanged => self.already_current += 1,
            Decision::AutoMatched => self.auto_updated += 1,
            Decision::ChangedSafeAccepted => self.token_and_tag_updated += 1,
            Decision::ChangedSafeDeclined => self.declined += 1,
            Decision::ChangedConflict => self.needs_manual_correction += 1,
        }
    }

    /// Number of sentences counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.not_found
            + self.already_current
            + self.auto_updated
            + self.token_and_tag_updated
            + self.declined
            + self.needs_manual_correction
    }
}

impl AddAssign for Counters {
    fn add_assign(&mut self, other: Self) {
        self.not_found += other.not_found;
        self.already_current += other.already_current;
        self.auto_updated += other.auto_updated;
        self.token_and_tag_updated += other.token_and_tag_updated;
        self.declined += other.declined;
        self.needs_manual_correction += other.needs_manual_correction;
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sentences:               {}", self.total())?;
        writeln!(f, "not found:               {}", self.not_found)?;
        writeln!(f, "already current:         {}", self.already_current)?;
        writeln!(f, "auto-updated:            {}", self.auto_updated)?;
        writeln!(f, "token and tag updated:   {}", self.token_and_tag_updated)?;
        writeln!(f, "found but declined:      {}", self.declined)?;
        write!(f, "needs manual correction: {}", self.needs_manual_correction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_auto_match_counts_as_already_current() {
        let mut c = Counters::default();
        c.record(Decision::AutoMatched, true);
        c.record(Decision::AutoMatched, false);
        c.record(Decision::ChangedSafeAccepted, false);
        c.record(Decision::ChangedConflict, true);
        assert_eq!(c.already_current, 1);
        assert_eq!(c.auto_updated, 1);
        assert_eq!(c.token_and_tag_updated, 1);
        assert_eq!(c.needs_manual_correction, 1);
        assert_eq!(c.total(), 4);
    }

    #[test]
    fn counters_add_up_across_files() {
        let mut total = Counters { not_found: 1, ..Counters::default() };
        total += Counters { not_found: 2, declined: 1, ..Counters::default() };
        assert_eq!(total.not_found, 3);
        assert_eq!(total.declined, 1);
        assert!(total.to_string().contains("found but declined:      1"));
    }
}
