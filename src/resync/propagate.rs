//! Carries span tags from the old tokens onto the new ones.

use std::collections::HashMap;

use super::align::{AlignOp, Alignment};
use crate::corpus::{SpanTag, Token};

/// Computes one span tag per new token.
///
/// Matched tokens copy the old tag verbatim. Tokens inserted in a changed
/// region take the tag of the region's first old token, or the sentence's
/// outside marker when the region has no old token. Derived tokens (ranges
/// and empty nodes) left unresolved take the tag resolved for their base
/// ordinal, or the outside marker when that ordinal has none.
#[must_use]
pub fn propagate(alignment: &Alignment, old: &[Token], new: &[Token]) -> Vec<SpanTag> {
    let outside = outside_marker(old);
    let mut tags: Vec<Option<SpanTag>> = vec![None; new.len()];

    for op in &alignment.ops {
        match *op {
            AlignOp::Match { old: o, new: n } => tags[n] = Some(old[o].tag_or_empty()),
            AlignOp::Insert { new: n } if !new[n].id.is_derived() => {
                tags[n] = Some(inherited(alignment, old, n).unwrap_or_else(|| outside.clone()));
            }
            AlignOp::Insert { .. } | AlignOp::Delete { .. } => {}
        }
    }

    let by_origin: HashMap<u32, SpanTag> = new
        .iter()
        .zip(&tags)
        .filter(|(token, _)| !token.id.is_derived())
        .filter_map(|(token, tag)| tag.clone().map(|t| (token.id.origin(), t)))
        .collect();

    new.iter()
        .zip(tags)
        .map(|(token, tag)| {
            tag.or_else(|| by_origin.get(&token.id.origin()).cloned())
                .unwrap_or_else(|| outside.clone())
        })
        .collect()
}

/// Marker the old sentence writes on words outside every group: `*` unless
/// it uses `_`.
fn outside_marker(old: &[Token]) -> SpanTag {
    old.iter()
        .filter(|t| !t.id.is_derived())
        .filter_map(|t| t.tag.clone())
        .find(SpanTag::is_outside)
        .unwrap_or(SpanTag::Outside)
}

/// Tag an inserted new token inherits from its changed region.
fn inherited(alignment: &Alignment, old: &[Token], new_index: usize) -> Option<SpanTag> {
    alignment
        .region_of_new(new_index)
        .and_then(super::align::ChangedRegion::inherit_from)
        .map(|o| old[o].tag_or_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TokenId;
    use crate::resync::align::align_tokens;

    fn tok(id: &str, form: &str, tag: Option<&str>) -> Token {
        Token {
            id: id.parse().unwrap(),
            form: form.into(),
            columns: vec!["_".into()],
            tag: tag.map(|t| t.parse().unwrap()),
        }
    }

    fn run(old: &[Token], new: &[Token]) -> Vec<String> {
        let alignment = align_tokens(old, new);
        propagate(&alignment, old, new).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn matched_tokens_copy_tags() {
        let old = vec![
            tok("1", "The", Some("*")),
            tok("2", "cat", Some("1:VID")),
            tok("3", "sat", Some("1")),
        ];
        let new = vec![tok("1", "The", None), tok("2", "cat", None), tok("3", "sat", None)];
        assert_eq!(run(&old, &new), vec!["*", "1:VID", "1"]);
    }

    #[test]
    fn split_tokens_inherit_first_old_tag() {
        let old = vec![tok("1", "The", Some("*")), tok("2", "catnap", Some("2:VID"))];
        let new = vec![tok("1", "The", None), tok("2", "cat", None), tok("3", "nap", None)];
        assert_eq!(run(&old, &new), vec!["*", "2:VID", "2:VID"]);
    }

    #[test]
    fn pure_insertion_takes_the_sentence_outside_marker() {
        let old = vec![tok("1", "a", Some("*")), tok("2", "b", Some("1:VID"))];
        let new = vec![tok("1", "a", None), tok("2", "x", None), tok("3", "b", None)];
        assert_eq!(run(&old, &new), vec!["*", "*", "1:VID"]);
    }

    #[test]
    fn pure_insertion_keeps_underscore_outside_marker() {
        let old = vec![tok("1", "a", Some("_")), tok("2", "b", Some("_"))];
        let new = vec![tok("1", "a", None), tok("2", "x", None), tok("3", "b", None)];
        assert_eq!(run(&old, &new), vec!["_", "_", "_"]);
    }

    #[test]
    fn inserted_range_follows_its_base_word() {
        let old = vec![tok("1", "au", Some("1:IRV")), tok("2", "revoir", Some("1"))];
        let new = vec![
            tok("1-2", "au", None),
            tok("1", "à", None),
            tok("2", "le", None),
            tok("3", "revoir", None),
        ];
        let tags = run(&old, &new);
        assert_eq!(new[0].id, TokenId::Range(1, 2));
        // The range line never matches the old word "au", so the whole
        // contraction falls in one changed region and inherits its tag.
        assert_eq!(tags, vec!["1:IRV", "1:IRV", "1:IRV", "1"]);
    }

    #[test]
    fn unresolved_empty_node_takes_base_tag() {
        let old = vec![tok("1", "go", Some("1:VPC")), tok("2", "on", Some("1"))];
        let new = vec![tok("1", "go", None), tok("1.1", "gone", None), tok("2", "on", None)];
        assert_eq!(run(&old, &new), vec!["1:VPC", "1:VPC", "1"]);
    }

    #[test]
    fn every_new_token_gets_a_tag() {
        let old = vec![tok("1", "x", Some("*"))];
        let new = vec![tok("1-2", "yz", None), tok("1", "y", None), tok("2", "z", None)];
        assert_eq!(run(&old, &new).len(), new.len());
    }
}
