use crate::rule::{Rule, RuleViolation};
use crate::source_buffer::SourceBuffer;

/// Tab characters should not appear in source lines.
#[derive(Debug, Clone, Default)]
pub struct HardTabs;

impl Rule for HardTabs {
    fn name(&self) -> &'static str {
        "no-hard-tabs"
    }

    fn description(&self) -> &'static str {
        "Tab characters should not be used"
    }

    fn check(&self, buffer: &SourceBuffer) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        for line in 0..buffer.line_count() {
            let text = buffer.line_text(line);
            if let Some(column) = text.find('\t') {
                violations.push(RuleViolation::new(line, column, "Hard tab character"));
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_violation_per_line_at_first_tab() {
        let buffer = SourceBuffer::new("a\tb\tc\nclean\n\tindented\n".to_string());
        let violations = HardTabs.check(&buffer);
        assert_eq!(violations.len(), 2);
        assert_eq!((violations[0].line, violations[0].column), (0, 1));
        assert_eq!((violations[1].line, violations[1].column), (2, 0));
    }

    #[test]
    fn spaces_pass() {
        let buffer = SourceBuffer::new("    indented with spaces\n".to_string());
        assert!(HardTabs.check(&buffer).is_empty());
    }
}
