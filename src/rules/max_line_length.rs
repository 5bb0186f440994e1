use crate::rule::{Rule, RuleViolation};
use crate::source_buffer::SourceBuffer;

pub const DEFAULT_LINE_LENGTH: usize = 100;

/// Lines should not exceed a configured character count.
#[derive(Debug, Clone)]
pub struct MaxLineLength {
    limit: usize,
}

impl MaxLineLength {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for MaxLineLength {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_LENGTH)
    }
}

impl Rule for MaxLineLength {
    fn name(&self) -> &'static str {
        "max-line-length"
    }

    fn description(&self) -> &'static str {
        "Lines should not exceed the configured length"
    }

    fn check(&self, buffer: &SourceBuffer) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        for line in 0..buffer.line_count() {
            let text = buffer.line_text(line);
            let width = text.chars().count();
            if width > self.limit {
                violations.push(RuleViolation::new(
                    line,
                    self.limit,
                    format!("Exceeds maximum line length of {} ({} characters)", self.limit, width),
                ));
            }
        }
        violations
    }
}
