//! Suppression-marker comments: recognition, removal, and insertion.
//!
//! A marker disables reporting for the line that follows it. Both comment
//! syntaxes are recognized, with arbitrary leading whitespace:
//!
//! - `// squelch:disable-next-line`
//! - `/* squelch:disable-next-line */`
//!
//! plus the `disable-line` spelling for suppressing the marker's own line.
//! Insertion always emits the line-comment form on its own line.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::patch::{PatchError, Replacement, apply_all};
use crate::source_buffer::SourceBuffer;

/// The marker text inserted above a failing line.
pub const DISABLE_NEXT_LINE: &str = "// squelch:disable-next-line";

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*/[*/][ \t]*squelch:disable-(?:next-)?line[\w \t]*(?:\*/)?").unwrap());

static NEXT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[*/][ \t]*squelch:disable-next-line").unwrap());

static SAME_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[*/][ \t]*squelch:disable-line").unwrap());

/// Compute the removal replacement for one line, against the buffer's
/// original offsets. Returns `None` when the line carries no marker.
///
/// A marker sharing its line with code is excised alone: through the
/// closing `*/` when one is present, to end-of-line otherwise. A marker
/// alone on its line takes the whole line, terminator included, so that
/// stripping an inserted marker restores the original text byte for byte.
pub fn marker_replacement(buffer: &SourceBuffer, line: usize) -> Option<Replacement> {
    let text = buffer.line_text(line);
    let found = MARKER_RE.find(text)?;
    let (line_start, line_end) = buffer.line_span(line);

    let close_end = text[found.start()..].find("*/").map(|i| found.start() + i + 2);
    let leading_is_blank = text[..found.start()].trim().is_empty();

    match close_end {
        Some(close_end) => {
            if leading_is_blank && text[close_end..].trim().is_empty() {
                let (start, end) = buffer.line_span_with_terminator(line);
                Some(Replacement::delete(start..end))
            } else {
                Some(Replacement::delete(line_start + found.start()..line_start + close_end))
            }
        }
        None => {
            if leading_is_blank {
                let (start, end) = buffer.line_span_with_terminator(line);
                Some(Replacement::delete(start..end))
            } else {
                Some(Replacement::delete(line_start + found.start()..line_end))
            }
        }
    }
}

/// Remove every marker comment from the buffer, as a single batch.
pub fn strip_markers(buffer: &SourceBuffer) -> Result<String, PatchError> {
    let replacements: Vec<Replacement> = (0..buffer.line_count())
        .filter_map(|line| marker_replacement(buffer, line))
        .collect();
    apply_all(buffer.text(), &replacements)
}

/// Insert a marker line above each distinct failing line.
///
/// The inserted line copies the target line's leading whitespace verbatim
/// and terminates with the buffer's own line ending. Duplicate line numbers
/// collapse to one insertion; line numbers past the end of the buffer
/// collapse to a single insertion at end-of-text.
pub fn insert_markers(buffer: &SourceBuffer, failure_lines: &[usize]) -> Result<String, PatchError> {
    let terminator = buffer.line_ending().as_str();
    let lines: BTreeSet<usize> = failure_lines.iter().copied().collect();

    let mut replacements: Vec<Replacement> = Vec::with_capacity(lines.len());
    let mut seen_offsets = BTreeSet::new();
    for line in lines {
        let offset = buffer.line_start(line);
        if !seen_offsets.insert(offset) {
            continue;
        }
        let indent = if line < buffer.line_count() {
            leading_whitespace(buffer.line_text(line))
        } else {
            ""
        };
        let mut text = String::new();
        if offset == buffer.text().len() && !buffer.text().is_empty() && !buffer.text().ends_with('\n') {
            text.push_str(terminator);
        }
        text.push_str(indent);
        text.push_str(DISABLE_NEXT_LINE);
        text.push_str(terminator);
        replacements.push(Replacement::insert(offset, text));
    }
    apply_all(buffer.text(), &replacements)
}

/// Whether reporting is suppressed for a 0-based line: the previous line
/// carries a `disable-next-line` marker, or the line itself carries a
/// `disable-line` marker.
pub fn is_line_suppressed(buffer: &SourceBuffer, line: usize) -> bool {
    if line > 0 && NEXT_LINE_RE.is_match(buffer.line_text(line - 1)) {
        return true;
    }
    line < buffer.line_count() && SAME_LINE_RE.is_match(buffer.line_text(line))
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .as_bytes()
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(text: &str) -> SourceBuffer {
        SourceBuffer::new(text.to_string())
    }

    #[test]
    fn no_marker_no_replacement() {
        let buffer = buf("\tsome normal code\n");
        assert_eq!(marker_replacement(&buffer, 0), None);
    }

    #[test]
    fn marker_alone_deletes_whole_line() {
        let buffer = buf("    // squelch:disable-line\ncode\n");
        let r = marker_replacement(&buffer, 0).unwrap();
        assert_eq!(r, Replacement::delete(0..28));
    }

    #[test]
    fn block_marker_alone_deletes_whole_line() {
        let buffer = buf("    /* squelch:disable-next-line */\ncode\n");
        let r = marker_replacement(&buffer, 0).unwrap();
        assert_eq!(r, Replacement::delete(0..36));
    }

    #[test]
    fn trailing_line_comment_deletes_to_eol() {
        let buffer = buf("    let a = 100; // squelch:disable-line\n");
        let r = marker_replacement(&buffer, 0).unwrap();
        // From the whitespace before the comment through end-of-line,
        // terminator untouched.
        assert_eq!(r, Replacement::delete(16..40));
        assert_eq!(strip_markers(&buffer).unwrap(), "    let a = 100;\n");
    }

    #[test]
    fn embedded_block_marker_deletes_only_the_comment() {
        let buffer = buf("    let a = 100; /* squelch:disable-next-line */  let b = 200;\n");
        let r = marker_replacement(&buffer, 0).unwrap();
        assert_eq!(r, Replacement::delete(16..48));
        assert_eq!(strip_markers(&buffer).unwrap(), "    let a = 100;  let b = 200;\n");
    }

    #[test]
    fn unterminated_block_marker_deletes_to_eol() {
        let buffer = buf("code(); /* squelch:disable-next-line\nnext\n");
        let r = marker_replacement(&buffer, 0).unwrap();
        assert_eq!(r, Replacement::delete(7..36));
        assert_eq!(strip_markers(&buffer).unwrap(), "code();\nnext\n");
    }

    #[test]
    fn strip_removes_inserted_lines_completely() {
        let original = "fn main() {\n    let x = 1;\n}\n";
        let buffer = buf(original);
        let patched = insert_markers(&buffer, &[1]).unwrap();
        assert_eq!(patched, "fn main() {\n    // squelch:disable-next-line\n    let x = 1;\n}\n");
        let stripped = strip_markers(&SourceBuffer::new(patched)).unwrap();
        assert_eq!(stripped, original);
    }

    #[test]
    fn insert_copies_indentation_verbatim() {
        let buffer = buf("\t\tindented with tabs\n");
        let patched = insert_markers(&buffer, &[0]).unwrap();
        assert_eq!(patched, "\t\t// squelch:disable-next-line\n\t\tindented with tabs\n");
    }

    #[test]
    fn insert_uses_crlf_in_crlf_files() {
        let buffer = buf("line one\r\n    line two\r\n");
        let patched = insert_markers(&buffer, &[1]).unwrap();
        assert_eq!(patched, "line one\r\n    // squelch:disable-next-line\r\n    line two\r\n");
    }

    #[test]
    fn duplicate_failure_lines_collapse() {
        let buffer = buf("only line\n");
        let patched = insert_markers(&buffer, &[0, 0, 0]).unwrap();
        assert_eq!(patched, "// squelch:disable-next-line\nonly line\n");
    }

    #[test]
    fn out_of_range_lines_collapse_to_one_eof_marker() {
        let buffer = buf("line\n");
        let patched = insert_markers(&buffer, &[7, 9]).unwrap();
        assert_eq!(patched, "line\n// squelch:disable-next-line\n");
    }

    #[test]
    fn insert_strip_insert_is_idempotent() {
        let original = "fn main() {\n\tlet a = 1;\n    let b = 2;\n}\n";
        let lines = vec![1, 2];
        let once = insert_markers(&buf(original), &lines).unwrap();
        let stripped = strip_markers(&SourceBuffer::new(once.clone())).unwrap();
        let twice = insert_markers(&SourceBuffer::new(stripped), &lines).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn suppression_looks_at_previous_line() {
        let buffer = buf("// squelch:disable-next-line\nbad line\ngood line\n");
        assert!(is_line_suppressed(&buffer, 1));
        assert!(!is_line_suppressed(&buffer, 2));
        assert!(!is_line_suppressed(&buffer, 0));
    }

    #[test]
    fn suppression_on_own_line_marker() {
        let buffer = buf("bad line // squelch:disable-line\n");
        assert!(is_line_suppressed(&buffer, 0));
    }
}
