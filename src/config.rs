//! Lint configuration: which rules run, their options, and config-level
//! excludes applied before any file is read.
//!
//! The configuration lives in a JSON file named `squelch.json` (or
//! `.squelch.json`), discovered by upward search from a starting directory
//! when no explicit path is given.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::paths::absolutize;

/// Config file names probed in each directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["squelch.json", ".squelch.json"];

/// Errors that can occur while resolving configuration or the project
/// manifest. All of these are fatal: they abort the run before any write.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration or manifest file
    #[error("Failed to read {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse configuration or manifest content
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    /// The --project argument resolves to no manifest file
    #[error("Invalid option for project: {path}")]
    InvalidManifest { path: String },

    /// The --config argument names a file that does not exist
    #[error("Invalid option for configuration: {path}")]
    InvalidConfig { path: String },

    /// A file declared in the manifest's `files` list does not exist
    #[error("File '{path}' declared in {manifest} does not exist")]
    ManifestFileNotFound { path: String, manifest: String },

    /// An explicit file exists on disk but is outside the project
    #[error("'{path}' is not included in project")]
    NotInProject { path: String },

    /// A glob pattern failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Parsed lint configuration.
///
/// `rules` maps a rule name to `false` (disabled), `true` (enabled with
/// defaults), or an options object. Rules absent from the map run with
/// their defaults. `exclude` globs remove files from the run before they
/// are even read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    pub rules: BTreeMap<String, serde_json::Value>,
    pub exclude: Vec<String>,
    /// Directory of the file this configuration was loaded from; relative
    /// exclude patterns resolve against it.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl LintConfig {
    /// A rule is disabled only by an explicit `false`.
    pub fn rule_enabled(&self, name: &str) -> bool {
        !matches!(self.rules.get(name), Some(serde_json::Value::Bool(false)))
    }

    /// Typed lookup of a rule option, when the rule's value is an object.
    pub fn rule_option<T: serde::de::DeserializeOwned>(&self, rule: &str, key: &str) -> Option<T> {
        let value = self.rules.get(rule)?.as_object()?.get(key)?;
        T::deserialize(value.clone()).ok()
    }

    /// Exclude patterns anchored to the config file's directory (or left
    /// alone when already absolute or when the config came from defaults).
    pub fn exclude_patterns_absolute(&self) -> Vec<String> {
        self.exclude
            .iter()
            .map(|pattern| match &self.base_dir {
                Some(base) if !Path::new(pattern).is_absolute() => {
                    base.join(pattern).to_string_lossy().into_owned()
                }
                _ => pattern.clone(),
            })
            .collect()
    }
}

/// Load configuration from an explicit path, or search upward from
/// `search_from` for a conventionally named file. An explicit path that
/// does not exist is a fatal error; finding nothing by search yields the
/// defaults.
pub fn find_configuration(explicit: Option<&Path>, search_from: &Path) -> Result<LintConfig, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::InvalidConfig {
                path: path.display().to_string(),
            });
        }
        return load_config(path);
    }

    let start = absolutize(search_from);
    for dir in start.ancestors() {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return load_config(&candidate);
            }
        }
    }
    Ok(LintConfig::default())
}

fn load_config(path: &Path) -> Result<LintConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        source: e,
        path: path.display().to_string(),
    })?;
    let mut config: LintConfig = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    config.base_dir = absolutize(path).parent().map(Path::to_path_buf);
    Ok(config)
}

/// Directory the upward config search should start from: the project
/// manifest's directory when a project is given, the current directory
/// otherwise.
pub fn config_search_root(project: Option<&Path>) -> PathBuf {
    match project {
        Some(path) => {
            let abs = absolutize(path);
            if abs.is_dir() {
                abs
            } else {
                abs.parent().map(Path::to_path_buf).unwrap_or(abs)
            }
        }
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_from(value: serde_json::Value) -> LintConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn rules_default_to_enabled() {
        let config = LintConfig::default();
        assert!(config.rule_enabled("max-line-length"));
        assert!(config.rule_enabled("no-hard-tabs"));
    }

    #[test]
    fn explicit_false_disables() {
        let config = config_from(json!({
            "rules": { "no-hard-tabs": false, "no-trailing-whitespace": true }
        }));
        assert!(!config.rule_enabled("no-hard-tabs"));
        assert!(config.rule_enabled("no-trailing-whitespace"));
        assert!(config.rule_enabled("max-line-length"));
    }

    #[test]
    fn typed_rule_options() {
        let config = config_from(json!({
            "rules": { "max-line-length": { "limit": 120 } }
        }));
        assert_eq!(config.rule_option::<usize>("max-line-length", "limit"), Some(120));
        assert_eq!(config.rule_option::<usize>("max-line-length", "missing"), None);
        assert_eq!(config.rule_option::<usize>("no-hard-tabs", "limit"), None);
    }

    #[test]
    fn options_object_counts_as_enabled() {
        let config = config_from(json!({
            "rules": { "max-line-length": { "limit": 80 } }
        }));
        assert!(config.rule_enabled("max-line-length"));
    }

    #[test]
    fn relative_excludes_anchor_to_the_config_directory() {
        let mut config = config_from(json!({ "exclude": ["generated/**", "/abs/x.ts"] }));
        config.base_dir = Some(PathBuf::from("/proj"));
        assert_eq!(
            config.exclude_patterns_absolute(),
            vec!["/proj/generated/**".to_string(), "/abs/x.ts".to_string()]
        );
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        let result: Result<LintConfig, _> = serde_json::from_value(json!({ "rule": {} }));
        assert!(result.is_err());
    }
}
