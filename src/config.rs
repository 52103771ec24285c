//! Configuration file parsing for mutation discovery

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::MutationKind;
use crate::error::MutationError;

/// Top-level configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: String,
    /// Mutation kinds to discover (defaults to the whole catalog)
    #[serde(default = "default_operators")]
    pub operators: Vec<MutationKind>,
    /// Source files to mutate, relative to the project directory
    pub files: Vec<PathBuf>,
}

fn default_operators() -> Vec<MutationKind> {
    MutationKind::all().to_vec()
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, MutationError> {
        let content = std::fs::read_to_string(path).map_err(|e| MutationError::ConfigError {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        Self::from_yaml(&content).map_err(|e| MutationError::ConfigError {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Source files joined onto `project_dir`
    pub fn resolve_files(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|file| project_dir.join(file)).collect()
    }

    /// Validate the configuration against `project_dir`
    pub fn validate(&self, project_dir: &Path) -> Result<(), Vec<MutationError>> {
        let mut errors = Vec::new();

        if self.operators.is_empty() {
            errors.push(MutationError::ConfigError {
                message: "No mutation operators enabled".to_string(),
            });
        }

        for (i, kind) in self.operators.iter().enumerate() {
            if self.operators[..i].contains(kind) {
                errors.push(MutationError::ConfigError {
                    message: format!("Mutation operator '{}' listed more than once", kind),
                });
            }
        }

        if self.files.is_empty() {
            errors.push(MutationError::ConfigError {
                message: "No source files listed".to_string(),
            });
        }

        for file in &self.files {
            if !project_dir.join(file).exists() {
                errors.push(MutationError::FileNotFound { file: file.clone() });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
