//! squelch suppresses lint findings mechanically: it runs the configured
//! rules over a project's files and inserts a
//! `// squelch:disable-next-line` comment above every offending line,
//! then writes the files back in place. Pre-existing markers are stripped
//! before new ones are computed, so repeated runs converge instead of
//! accumulating duplicates.

pub mod config;
pub mod engine;
pub mod exit_codes;
pub mod init;
pub mod markers;
pub mod patch;
pub mod paths;
pub mod pipeline;
pub mod project;
pub mod rule;
pub mod rules;
pub mod selection;
pub mod source_buffer;

pub use crate::config::{ConfigError, LintConfig};
pub use crate::engine::{LintFailure, Linter};
pub use crate::markers::{DISABLE_NEXT_LINE, insert_markers, strip_markers};
pub use crate::patch::{PatchError, Replacement, apply_all};
pub use crate::pipeline::{RunOptions, RunOutcome, run, write_updates};
pub use crate::project::ProjectModel;
pub use crate::selection::FileSelection;
pub use crate::source_buffer::SourceBuffer;
