//! The project model: the manifest file and the member universe derived
//! from it.
//!
//! The manifest is a JSON file declaring explicit member `files`, `include`
//! globs expanded against the manifest's directory, and `exclude` globs
//! subtracted from the include matches. The resulting member list is the
//! authoritative universe for file selection.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use globset::Glob;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::paths::absolutize;

/// Conventional manifest filename, appended when --project names a
/// directory.
pub const MANIFEST_FILE_NAME: &str = "project.json";

/// MPEG transport streams use 0x47 as the frame separator, repeating every
/// 188 bytes. Such files share extensions with real source files, so a
/// matching prefix is skipped rather than linted.
const MPEG_TS_SYNC_BYTE: u8 = 0x47;
const MPEG_TS_PACKET_LEN: usize = 188;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Unable to open file {path}: {source}")]
    Unreadable { source: io::Error, path: String },

    #[error("'{path}' is not part of the project")]
    NotAMember { path: String },
}

/// What reading a candidate source file produced.
#[derive(Debug)]
pub enum FileContent {
    Text(String),
    /// Recognized non-source content, with the reason it was skipped.
    Skipped(&'static str),
}

/// Unknown manifest keys (compiler options and the like) belong to other
/// tools and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub files: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// The loaded project: an ordered member universe and read access to
/// member sources.
#[derive(Debug)]
pub struct ProjectModel {
    manifest_path: PathBuf,
    members: Vec<PathBuf>,
    member_set: HashSet<PathBuf>,
}

impl ProjectModel {
    /// Parse the manifest and fix the member universe: declared `files`
    /// first in declaration order, then include-glob matches in sorted
    /// order, manifest excludes subtracted, duplicates removed. A declared
    /// file that does not exist is a fatal configuration error.
    pub fn load(manifest_path: &Path) -> Result<Self, ConfigError> {
        let manifest_path = absolutize(manifest_path);
        let content = std::fs::read_to_string(&manifest_path).map_err(|e| ConfigError::IoError {
            source: e,
            path: manifest_path.display().to_string(),
        })?;
        let manifest: Manifest = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: manifest_path.display().to_string(),
            message: e.to_string(),
        })?;

        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut members = Vec::new();
        let mut member_set = HashSet::new();
        for declared in &manifest.files {
            let path = absolutize(&root.join(declared));
            if !path.is_file() {
                return Err(ConfigError::ManifestFileNotFound {
                    path: declared.clone(),
                    manifest: manifest_path.display().to_string(),
                });
            }
            if member_set.insert(path.clone()) {
                members.push(path);
            }
        }

        if !manifest.include.is_empty() {
            let mut matched = walk_includes(&root, &manifest.include, &manifest.exclude)?;
            matched.sort();
            for path in matched {
                if member_set.insert(path.clone()) {
                    members.push(path);
                }
            }
        }

        Ok(Self {
            manifest_path,
            members,
            member_set,
        })
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// The ordered universe of eligible files.
    pub fn member_paths(&self) -> &[PathBuf] {
        &self.members
    }

    pub fn is_member(&self, path: &Path) -> bool {
        self.member_set.contains(path)
    }

    /// Read a member's text. Non-members fail; recognized binary content is
    /// skipped, not failed.
    pub fn source_text(&self, path: &Path) -> Result<FileContent, ProjectError> {
        if !self.is_member(path) {
            return Err(ProjectError::NotAMember {
                path: path.display().to_string(),
            });
        }
        read_source_text(path)
    }
}

/// Read a file's text from disk, skipping recognized non-text content: an
/// MPEG transport stream prefix, or bytes that are not valid UTF-8 (a
/// rewrite through lossy decoding would corrupt such a file).
pub fn read_source_text(path: &Path) -> Result<FileContent, ProjectError> {
    let bytes = std::fs::read(path).map_err(|e| ProjectError::Unreadable {
        source: e,
        path: path.display().to_string(),
    })?;
    if bytes.len() > MPEG_TS_PACKET_LEN
        && bytes[0] == MPEG_TS_SYNC_BYTE
        && bytes[MPEG_TS_PACKET_LEN] == MPEG_TS_SYNC_BYTE
    {
        return Ok(FileContent::Skipped("MPEG transport stream"));
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(FileContent::Text(text)),
        Err(_) => Ok(FileContent::Skipped("not valid UTF-8")),
    }
}

fn walk_includes(root: &Path, include: &[String], exclude: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let invalid = |pattern: &str, e: &dyn std::fmt::Display| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    };

    // Validate exclude globs eagerly; OverrideBuilder reports them against
    // the rewritten '!' form otherwise.
    for pattern in exclude {
        Glob::new(pattern).map_err(|e| invalid(pattern, &e))?;
    }

    let root_str = root.to_string_lossy();
    let mut override_builder = OverrideBuilder::new(root);
    for pattern in include {
        override_builder.add(pattern).map_err(|e| invalid(pattern, &e))?;
    }
    for pattern in exclude {
        let rule = if pattern.starts_with('!') {
            pattern.clone()
        } else {
            format!("!{pattern}")
        };
        override_builder.add(&rule).map_err(|e| invalid(pattern, &e))?;
    }
    let overrides = override_builder.build().map_err(|e| invalid(&root_str, &e))?;

    // The manifest is authoritative: no gitignore semantics, hidden files
    // only via an explicit dot pattern (the walker skips them by default).
    let mut walk_builder = WalkBuilder::new(root);
    walk_builder
        .overrides(overrides)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .require_git(false)
        .hidden(true);

    let mut matched = Vec::new();
    for result in walk_builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    matched.push(absolutize(path));
                }
            }
            Err(err) => log::debug!("error walking project root {}: {err}", root.display()),
        }
    }
    Ok(matched)
}
