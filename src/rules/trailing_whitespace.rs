use crate::rule::{Rule, RuleViolation};
use crate::source_buffer::SourceBuffer;

/// Lines should not end with spaces or tabs.
#[derive(Debug, Clone, Default)]
pub struct TrailingWhitespace;

impl Rule for TrailingWhitespace {
    fn name(&self) -> &'static str {
        "no-trailing-whitespace"
    }

    fn description(&self) -> &'static str {
        "Lines should not end in whitespace"
    }

    fn check(&self, buffer: &SourceBuffer) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        for line in 0..buffer.line_count() {
            let text = buffer.line_text(line);
            let trimmed_len = text.trim_end_matches([' ', '\t']).len();
            if trimmed_len < text.len() {
                violations.push(RuleViolation::new(line, trimmed_len, "Trailing whitespace"));
            }
        }
        violations
    }
}
