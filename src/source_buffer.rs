//! Immutable snapshot of one file's text plus a derived line-offset table.
//!
//! Edits never mutate a buffer in place; the patch engine produces new text
//! from which a fresh buffer is built.

/// Line terminator convention of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Detect the terminator used by `content`. Any CRLF makes the whole file
/// CRLF; otherwise LF, which is also the default for files with no
/// terminator at all.
pub fn detect_line_ending(content: &str) -> LineEnding {
    if content.contains("\r\n") {
        LineEnding::Crlf
    } else {
        LineEnding::Lf
    }
}

#[derive(Debug, Clone)]
pub struct SourceBuffer {
    text: String,
    /// Byte offset of the start of each line. `line_offsets[0]` is always 0.
    line_offsets: Vec<usize>,
    line_ending: LineEnding,
}

impl SourceBuffer {
    pub fn new(text: String) -> Self {
        let mut line_offsets = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_offsets.push(i + 1);
            }
        }
        let line_ending = detect_line_ending(&text);
        Self {
            text,
            line_offsets,
            line_ending,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Number of lines, counting a trailing empty line after a final
    /// terminator (mirrors the offset table).
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Byte offset of the start of a 0-based line. Lines past the end clamp
    /// to the end of the text.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(self.text.len())
    }

    /// Half-open byte span of a line's content, terminator excluded.
    pub fn line_span(&self, line: usize) -> (usize, usize) {
        let start = self.line_start(line);
        let mut end = self.line_start(line + 1);
        if end > start && self.text.as_bytes()[end - 1] == b'\n' {
            end -= 1;
            if end > start && self.text.as_bytes()[end - 1] == b'\r' {
                end -= 1;
            }
        }
        (start, end)
    }

    /// Half-open byte span of a line including its terminator, if any.
    pub fn line_span_with_terminator(&self, line: usize) -> (usize, usize) {
        (self.line_start(line), self.line_start(line + 1))
    }

    /// The line's content without terminator.
    pub fn line_text(&self, line: usize) -> &str {
        let (start, end) = self.line_span(line);
        &self.text[start..end]
    }

    /// Map a byte offset to a 0-based (line, column) pair.
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        match self.line_offsets.binary_search(&offset) {
            Ok(line) => (line, 0),
            Err(insertion) => {
                let line = insertion - 1;
                (line, offset - self.line_offsets[line])
            }
        }
    }
}
