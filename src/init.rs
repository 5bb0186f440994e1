//!
//! This module provides initialization utilities, such as creating a
//! default configuration file.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for initialization operations
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to access file {path}: {source}")]
    IoError { source: io::Error, path: String },
}

/// Create a default configuration file at the specified path.
///
/// Returns `true` if the file was created, or `false` if it already exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created due to permissions or other I/O errors.
pub fn create_default_config(path: &str) -> Result<bool, InitError> {
    if Path::new(path).exists() {
        return Ok(false);
    }

    let default_config = r#"{
  "rules": {
    "max-line-length": { "limit": 100 },
    "no-trailing-whitespace": true,
    "no-hard-tabs": true,
    "no-conflict-markers": true
  },
  "exclude": []
}
"#;

    fs::write(path, default_config).map_err(|e| InitError::IoError {
        source: e,
        path: path.to_string(),
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;

    #[test]
    fn default_config_template_parses() {
        let dir = std::env::temp_dir().join("squelch-init-test");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("squelch.json");
        let _ = fs::remove_file(&path);
        let path_str = path.to_string_lossy().into_owned();

        assert!(create_default_config(&path_str).unwrap());
        // Second call leaves the existing file alone.
        assert!(!create_default_config(&path_str).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        let config: LintConfig = serde_json::from_str(&content).unwrap();
        assert!(config.rule_enabled("no-hard-tabs"));
        assert_eq!(config.rule_option::<usize>("max-line-length", "limit"), Some(100));

        let _ = fs::remove_file(&path);
    }
}
