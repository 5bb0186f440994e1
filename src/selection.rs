//! File selection: turning explicit paths, the project manifest, and
//! exclude globs into the concrete set of files for one run.
//!
//! Selection order is always the universe's order (the manifest's member
//! order), never the order arguments were given in, so re-runs are
//! deterministic.

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::config::ConfigError;
use crate::paths::{absolutize, clean_relative};
use crate::project::MANIFEST_FILE_NAME;

/// The resolved set of files for one run, plus non-fatal complaints about
/// explicit arguments that resolved to nothing.
#[derive(Debug, Default)]
pub struct FileSelection {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Resolve the --project argument to a concrete manifest file. A directory
/// gets the conventional manifest name appended; anything that does not
/// exist is a fatal configuration error.
pub fn resolve_manifest(path: &Path) -> Result<PathBuf, ConfigError> {
    let invalid = || ConfigError::InvalidManifest {
        path: path.display().to_string(),
    };
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            let candidate = path.join(MANIFEST_FILE_NAME);
            if candidate.is_file() { Ok(candidate) } else { Err(invalid()) }
        }
        Ok(_) => Ok(path.to_path_buf()),
        Err(_) => Err(invalid()),
    }
}

/// Select files from a project universe.
///
/// With no explicit files the selection is the universe minus exclude
/// matches. With explicit files the universe is intersected with them
/// first. Explicit non-glob arguments that resolve to nothing are a fatal
/// error when the file exists on disk (it is outside the project) and a
/// warning when it does not.
pub fn select_in_project(
    universe: &[PathBuf],
    explicit_files: &[String],
    exclude_patterns: &[String],
) -> Result<FileSelection, ConfigError> {
    let exclude = exclude_globset(exclude_patterns)?;
    let mut warnings = Vec::new();

    if explicit_files.is_empty() {
        let files = universe.iter().filter(|p| !exclude.is_match(p)).cloned().collect();
        return Ok(FileSelection { files, warnings });
    }

    let explicit: Vec<String> = explicit_files
        .iter()
        .map(|f| absolutize(Path::new(trim_single_quotes(f))).to_string_lossy().into_owned())
        .collect();
    let matchers = include_matchers(&explicit)?;

    let files: Vec<PathBuf> = universe
        .iter()
        .filter(|p| include_match(&matchers, p))
        .filter(|p| !exclude.is_match(p))
        .cloned()
        .collect();

    // Explicit non-glob arguments that neither the selection nor any
    // exclude accounts for.
    for (raw, abs) in explicit_files.iter().zip(&explicit) {
        if is_glob(abs) || exclude.is_match(Path::new(abs)) {
            continue;
        }
        let path = PathBuf::from(abs);
        if files.contains(&path) {
            continue;
        }
        if path.exists() {
            return Err(ConfigError::NotInProject {
                path: trim_single_quotes(raw).to_string(),
            });
        }
        warnings.push(format!("'{}' does not exist", trim_single_quotes(raw)));
    }

    Ok(FileSelection { files, warnings })
}

/// Select files without a project manifest: non-glob arguments are taken
/// as-is when they exist, glob arguments are expanded against the
/// filesystem.
pub fn select_loose(explicit_files: &[String], exclude_patterns: &[String]) -> Result<FileSelection, ConfigError> {
    let trimmed_excludes: Vec<String> = exclude_patterns
        .iter()
        .map(|p| trim_single_quotes(p).to_string())
        .collect();
    let exclude = build_globset(&trimmed_excludes)?;

    let mut files = Vec::new();
    let mut warnings = Vec::new();
    for raw in explicit_files {
        let pattern = trim_single_quotes(raw);
        if is_glob(pattern) {
            let matched = expand_glob(pattern)?;
            files.extend(matched.into_iter().filter(|p| !exclude.is_match(p)));
            continue;
        }
        let path = Path::new(clean_relative(pattern));
        if path.is_file() {
            if !exclude.is_match(path) {
                files.push(path.to_path_buf());
            }
        } else if !exclude.is_match(path) {
            warnings.push(format!("'{pattern}' does not exist"));
        }
    }

    files.sort();
    files.dedup();
    Ok(FileSelection { files, warnings })
}

/// Build the exclude matcher used by both selection and the config-level
/// excludes: enclosing single quotes stripped, patterns resolved to
/// absolute-path globs, dotfiles matched.
pub fn exclude_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let absolute: Vec<String> = patterns
        .iter()
        .map(|p| absolutize(Path::new(trim_single_quotes(p))).to_string_lossy().into_owned())
        .collect();
    build_globset(&absolute)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(","),
        message: e.to_string(),
    })
}

struct IncludeMatcher {
    matcher: GlobMatcher,
    allows_hidden: bool,
}

fn include_matchers(patterns: &[String]) -> Result<Vec<IncludeMatcher>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            Ok(IncludeMatcher {
                matcher: glob.compile_matcher(),
                allows_hidden: pattern_names_hidden(pattern),
            })
        })
        .collect()
}

/// Inclusion skips hidden files unless the pattern itself names a dot
/// component; exclusion always matches them.
fn include_match(matchers: &[IncludeMatcher], path: &Path) -> bool {
    let hidden = has_hidden_component(path);
    matchers.iter().any(|m| m.matcher.is_match(path) && (m.allows_hidden || !hidden))
}

fn has_hidden_component(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

fn pattern_names_hidden(pattern: &str) -> bool {
    pattern
        .split(['/', '\\'])
        .any(|segment| segment.starts_with('.') && segment != "." && segment != "..")
}

/// Strip enclosing single quotes, which survive argument splitting on
/// Windows-style shell invocations.
pub fn trim_single_quotes(s: &str) -> &str {
    let s = s.strip_prefix('\'').unwrap_or(s);
    s.strip_suffix('\'').unwrap_or(s)
}

fn is_glob(pattern: &str) -> bool {
    pattern.chars().any(|c| matches!(c, '*' | '?' | '[' | ']' | '{' | '}'))
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let invalid = |e: &dyn std::fmt::Display| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    };

    let (root, rel_pattern) = split_pattern_root(pattern);
    let mut override_builder = OverrideBuilder::new(&root);
    // Anchor at the walk root: a bare `*.ts` would otherwise match at any
    // depth under gitignore-style semantics.
    override_builder.add(&format!("/{rel_pattern}")).map_err(|e| invalid(&e))?;
    let overrides = override_builder.build().map_err(|e| invalid(&e))?;

    let mut walk_builder = WalkBuilder::new(&root);
    walk_builder
        .overrides(overrides)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .require_git(false)
        .hidden(true);

    let mut out = Vec::new();
    for result in walk_builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    out.push(PathBuf::from(clean_relative(&path.to_string_lossy())));
                }
            }
            Err(err) => log::debug!("error expanding pattern '{pattern}': {err}"),
        }
    }
    Ok(out)
}

/// Split a glob pattern into the literal directory prefix the walk starts
/// from and the remaining pattern, matched relative to it.
fn split_pattern_root(pattern: &str) -> (String, String) {
    let absolute = pattern.starts_with('/');
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let split = segments.iter().position(|s| is_glob(s)).unwrap_or(0);

    let mut root = if absolute { "/".to_string() } else { String::new() };
    root.push_str(&segments[..split].join("/"));
    if root.is_empty() {
        root.push('.');
    }
    (root, segments[split..].join("/"))
}
