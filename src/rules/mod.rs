//! Built-in lint rules.

pub mod conflict_markers;
pub mod hard_tabs;
pub mod max_line_length;
pub mod trailing_whitespace;

pub use conflict_markers::ConflictMarkers;
pub use hard_tabs::HardTabs;
pub use max_line_length::{DEFAULT_LINE_LENGTH, MaxLineLength};
pub use trailing_whitespace::TrailingWhitespace;

use crate::config::LintConfig;
use crate::rule::Rule;

/// Instantiate every rule the configuration enables, with its configured
/// options applied.
pub fn all_rules(config: &LintConfig) -> Vec<Box<dyn Rule>> {
    let limit = config
        .rule_option::<usize>("max-line-length", "limit")
        .unwrap_or(DEFAULT_LINE_LENGTH);

    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(MaxLineLength::new(limit)),
        Box::new(TrailingWhitespace),
        Box::new(HardTabs),
        Box::new(ConflictMarkers),
    ];

    rules.into_iter().filter(|rule| config.rule_enabled(rule.name())).collect()
}
