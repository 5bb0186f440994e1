//! Position-based text replacements and batch application.
//!
//! Replacements are computed against the offsets of the original text and
//! applied in a single pass. The output is rebuilt by walking the original
//! once, copying untouched spans and substituting replacement text, so
//! earlier edits never invalidate later offsets.

use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("replacement range {start}..{end} exceeds text length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("invalid replacement range: start {start} > end {end}")]
    InvertedRange { start: usize, end: usize },

    #[error("overlapping replacements at {first_start}..{first_end} and {second_start}..{second_end}")]
    Overlap {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("duplicate replacements targeting range {start}..{end}")]
    Duplicate { start: usize, end: usize },
}

/// A half-open byte range `[start, end)` and the text that replaces it.
/// An empty range is an insertion; empty text is a deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub range: Range<usize>,
    pub text: String,
}

impl Replacement {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            text: text.into(),
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }
}

/// Apply a batch of replacements to `text`.
///
/// The batch is sorted by start offset before application. Overlapping
/// ranges and two replacements targeting the same range are rejected: they
/// indicate a bug in whoever computed the batch, not a state to merge.
pub fn apply_all(text: &str, replacements: &[Replacement]) -> Result<String, PatchError> {
    for r in replacements {
        if r.range.start > r.range.end {
            return Err(PatchError::InvertedRange {
                start: r.range.start,
                end: r.range.end,
            });
        }
        if r.range.end > text.len() {
            return Err(PatchError::OutOfBounds {
                start: r.range.start,
                end: r.range.end,
                len: text.len(),
            });
        }
    }

    let mut sorted: Vec<&Replacement> = replacements.iter().collect();
    sorted.sort_by_key(|r| (r.range.start, r.range.end));

    for pair in sorted.windows(2) {
        let (a, b) = (&pair[0].range, &pair[1].range);
        if a == b {
            return Err(PatchError::Duplicate {
                start: a.start,
                end: a.end,
            });
        }
        if a.end > b.start {
            return Err(PatchError::Overlap {
                first_start: a.start,
                first_end: a.end,
                second_start: b.start,
                second_end: b.end,
            });
        }
    }

    let added: usize = sorted.iter().map(|r| r.text.len()).sum();
    let mut out = String::with_capacity(text.len() + added);
    let mut cursor = 0;
    for r in sorted {
        out.push_str(&text[cursor..r.range.start]);
        out.push_str(&r.text);
        cursor = r.range.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_deletions_and_insertions() {
        let text = "abcdef";
        let batch = vec![Replacement::delete(1..3), Replacement::insert(4, "XY")];
        assert_eq!(apply_all(text, &batch).unwrap(), "adXYef");
    }

    #[test]
    fn order_of_batch_does_not_matter() {
        let text = "one two three";
        let forward = vec![Replacement::delete(0..4), Replacement::insert(8, "!")];
        let reverse = vec![Replacement::insert(8, "!"), Replacement::delete(0..4)];
        assert_eq!(apply_all(text, &forward).unwrap(), apply_all(text, &reverse).unwrap());
    }

    #[test]
    fn empty_batch_is_identity() {
        assert_eq!(apply_all("unchanged", &[]).unwrap(), "unchanged");
    }

    #[test]
    fn rejects_overlap() {
        let batch = vec![Replacement::delete(0..4), Replacement::delete(3..6)];
        assert!(matches!(apply_all("abcdefgh", &batch), Err(PatchError::Overlap { .. })));
    }

    #[test]
    fn rejects_duplicate_range() {
        let batch = vec![Replacement::insert(2, "a"), Replacement::insert(2, "b")];
        assert!(matches!(apply_all("abcdefgh", &batch), Err(PatchError::Duplicate { .. })));
    }

    #[test]
    fn rejects_out_of_bounds() {
        let batch = vec![Replacement::delete(0..20)];
        assert!(matches!(apply_all("short", &batch), Err(PatchError::OutOfBounds { .. })));
    }

    #[test]
    fn adjacent_ranges_are_fine() {
        let batch = vec![Replacement::delete(0..2), Replacement::delete(2..4)];
        assert_eq!(apply_all("abcdef", &batch).unwrap(), "ef");
    }

    #[test]
    fn insertion_at_deletion_boundary() {
        // A zero-width insertion at the start of a deleted range touches it
        // without overlapping.
        let batch = vec![Replacement::insert(2, "X"), Replacement::delete(2..4)];
        assert_eq!(apply_all("abcdef", &batch).unwrap(), "abXef");
    }
}
