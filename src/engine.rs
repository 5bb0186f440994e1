//! The lint engine handle: a per-run accumulator of failures.
//!
//! One `Linter` is created per run, fed each selected file in turn, and
//! then queried for the accumulated result set. The handle is an explicit
//! value, never module-level state, so concurrent runs cannot observe each
//! other.

use std::path::{Path, PathBuf};

use crate::config::LintConfig;
use crate::markers::is_line_suppressed;
use crate::rule::Rule;
use crate::rules::all_rules;
use crate::source_buffer::SourceBuffer;

/// One reported violation: a file identity and a 0-based position within
/// it. Display formatting adds 1 to the line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFailure {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub rule_name: &'static str,
    pub message: String,
}

impl std::fmt::Display for LintFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: [{}] {}",
            self.path.display(),
            self.line + 1,
            self.column + 1,
            self.rule_name,
            self.message
        )
    }
}

/// Per-run engine handle.
pub struct Linter {
    rules: Vec<Box<dyn Rule>>,
    failures: Vec<LintFailure>,
}

impl Linter {
    pub fn from_config(config: &LintConfig) -> Self {
        Self {
            rules: all_rules(config),
            failures: Vec::new(),
        }
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Check one buffer and append its failures, ordered by (line, column),
    /// to the run's result set. Files fed in selection order therefore
    /// yield a result set ordered by (file, line, column). Lines covered by
    /// a suppression marker in the buffer report nothing.
    pub fn lint(&mut self, path: &Path, buffer: &SourceBuffer) {
        let mut file_failures: Vec<LintFailure> = Vec::new();
        for rule in &self.rules {
            for violation in rule.check(buffer) {
                if is_line_suppressed(buffer, violation.line) {
                    continue;
                }
                file_failures.push(LintFailure {
                    path: path.to_path_buf(),
                    line: violation.line,
                    column: violation.column,
                    rule_name: rule.name(),
                    message: violation.message,
                });
            }
        }
        file_failures.sort_by_key(|f| (f.line, f.column));
        self.failures.extend(file_failures);
    }

    pub fn failures(&self) -> &[LintFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<LintFailure> {
        self.failures
    }
}
