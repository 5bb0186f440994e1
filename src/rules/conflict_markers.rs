use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{Rule, RuleViolation};
use crate::source_buffer::SourceBuffer;

static CONFLICT_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:<{7}(?: |$)|={7}$|>{7}(?: |$))").unwrap());

/// Leftover merge-conflict markers at the start of a line.
#[derive(Debug, Clone, Default)]
pub struct ConflictMarkers;

impl Rule for ConflictMarkers {
    fn name(&self) -> &'static str {
        "no-conflict-markers"
    }

    fn description(&self) -> &'static str {
        "Merge conflict markers should not be committed"
    }

    fn check(&self, buffer: &SourceBuffer) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        for line in 0..buffer.line_count() {
            if CONFLICT_MARKER_RE.is_match(buffer.line_text(line)) {
                violations.push(RuleViolation::new(line, 0, "Merge conflict marker"));
            }
        }
        violations
    }
}
