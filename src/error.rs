//! Error types for the mutation engine's file and config boundary
//!
//! Discovery and rewriting never fail; these errors come from reading,
//! parsing and writing files, and from user supplied names and positions.

use std::path::PathBuf;
use thiserror::Error;

use crate::position::Position;

/// Errors that can occur around the mutation engine
#[derive(Debug, Error)]
pub enum MutationError {
    /// Target file doesn't exist
    #[error("File not found: {}", file.display())]
    FileNotFound { file: PathBuf },

    /// Failed to read source file
    #[error("Failed to read file '{}': {error}", file.display())]
    FileReadError { file: PathBuf, error: String },

    /// Failed to parse source file as Rust
    #[error("Failed to parse '{}' as Rust: {error}", file.display())]
    ParseError { file: PathBuf, error: String },

    /// Failed to write mutated file
    #[error("Failed to write mutated file '{}': {error}", file.display())]
    WriteError { file: PathBuf, error: String },

    /// Mutation kind name not in the catalog
    #[error("Unknown mutation kind '{name}'\n  Available kinds: {}", available.join(", "))]
    UnknownKind { name: String, available: Vec<String> },

    /// Requested position is not a mutation point for the kind
    #[error("No {kind} mutation point at {position} in {}\n  Mutation points: {}", file.display(), format_positions(available))]
    PositionNotDiscovered {
        file: PathBuf,
        kind: String,
        position: Position,
        available: Vec<Position>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

fn format_positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "none".to_string();
    }
    positions
        .iter()
        .map(|p| format!("line {}, column {}", p.line, p.column))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for mutation operations
pub type Result<T> = std::result::Result<T, MutationError>;
