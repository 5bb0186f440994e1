//! Per-run orchestration: selection, marker stripping, linting, marker
//! insertion, and write-back.
//!
//! Processing is single-threaded and per-file: the engine handle
//! accumulates failures across files, so files are fed to it in selection
//! order. A fatal configuration error aborts before any file is touched;
//! per-file anomalies (unreadable, binary, unwritable) become warnings and
//! never block the remaining files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{ConfigError, config_search_root, find_configuration};
use crate::engine::{LintFailure, Linter};
use crate::markers::{insert_markers, strip_markers};
use crate::paths::absolutize;
use crate::project::{FileContent, ProjectModel, read_source_text};
use crate::selection::{FileSelection, exclude_globset, resolve_manifest, select_in_project, select_loose};
use crate::source_buffer::SourceBuffer;

/// Options for one run, resolved from the CLI surface.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit file paths or globs; empty means every project member.
    pub files: Vec<String>,
    /// Path or directory of the project manifest.
    pub project: Option<PathBuf>,
    /// Exclude globs.
    pub exclude: Vec<String>,
    /// Explicit lint-configuration path.
    pub config: Option<PathBuf>,
}

/// The computed result of a run. `updated` maps each file that needs
/// rewriting to its new text; the write step (or a test harness) consumes
/// it without re-deriving anything.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub updated: BTreeMap<PathBuf, String>,
    pub warnings: Vec<String>,
    pub failures: Vec<LintFailure>,
    pub files_checked: usize,
}

/// Compute the run without touching disk contents: select files, strip
/// pre-existing markers, lint the cleaned text, and re-insert markers for
/// the current failure set. Files whose new text equals the old text are
/// omitted from `updated`.
pub fn run(options: &RunOptions) -> Result<RunOutcome, ConfigError> {
    let search_root = config_search_root(options.project.as_deref());
    let config = find_configuration(options.config.as_deref(), &search_root)?;
    let config_exclude = exclude_globset(&config.exclude_patterns_absolute())?;

    let (selection, model) = resolve_selection(options)?;
    let mut warnings = selection.warnings;

    let mut linter = Linter::from_config(&config);
    let mut cleaned: Vec<(PathBuf, String, SourceBuffer)> = Vec::new();
    for path in &selection.files {
        // Config-level excludes apply before the file is even read.
        if config_exclude.is_match(absolutize(path)) {
            continue;
        }
        let content = match &model {
            Some(model) => model.source_text(path),
            None => read_source_text(path),
        };
        match content {
            Ok(FileContent::Text(text)) => {
                let original = SourceBuffer::new(text);
                match strip_markers(&original) {
                    Ok(stripped) => {
                        let cleaned_buffer = SourceBuffer::new(stripped);
                        linter.lint(path, &cleaned_buffer);
                        cleaned.push((path.clone(), original.into_text(), cleaned_buffer));
                    }
                    Err(e) => warnings.push(format!("{}: {e}", path.display())),
                }
            }
            Ok(FileContent::Skipped(reason)) => {
                warnings.push(format!("{}: ignoring {reason}", path.display()));
            }
            Err(e) => warnings.push(e.to_string()),
        }
    }
    let files_checked = cleaned.len();

    let failures = linter.into_failures();
    let mut lines_by_file: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
    for failure in &failures {
        lines_by_file.entry(failure.path.clone()).or_default().push(failure.line);
    }

    let mut updated = BTreeMap::new();
    for (path, original_text, cleaned_buffer) in cleaned {
        let new_text = match lines_by_file.get(&path) {
            Some(lines) => match insert_markers(&cleaned_buffer, lines) {
                Ok(text) => text,
                Err(e) => {
                    warnings.push(format!("{}: {e}", path.display()));
                    continue;
                }
            },
            None => cleaned_buffer.into_text(),
        };
        if new_text != original_text {
            updated.insert(path, new_text);
        }
    }

    Ok(RunOutcome {
        updated,
        warnings,
        failures,
        files_checked,
    })
}

/// Write each updated file back in place. A failed write is reported and
/// skipped; it never aborts the remaining files.
pub fn write_updates(outcome: &RunOutcome) -> Vec<String> {
    let mut errors = Vec::new();
    for (path, text) in &outcome.updated {
        if let Err(e) = std::fs::write(path, text) {
            errors.push(format!("Failed to write {}: {e}", path.display()));
        }
    }
    errors
}

fn resolve_selection(options: &RunOptions) -> Result<(FileSelection, Option<ProjectModel>), ConfigError> {
    match &options.project {
        Some(project) => {
            let manifest = resolve_manifest(project)?;
            let model = ProjectModel::load(&manifest)?;
            let selection = select_in_project(model.member_paths(), &options.files, &options.exclude)?;
            Ok((selection, Some(model)))
        }
        None => Ok((select_loose(&options.files, &options.exclude)?, None)),
    }
}
