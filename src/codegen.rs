//! Parsing source text into trees and generating source from them
//!
//! These are the collaborators around the engine: the parser that produces
//! a [`SourceTree`] and the serializer that turns a mutated tree back into
//! text.

use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use crate::catalog::MutationKind;
use crate::error::{MutationError, Result};
use crate::operator::MutationOperator;
use crate::position::Position;
use crate::SourceTree;

/// Generate source code from AST
pub fn generate_source(ast: &SourceTree) -> String {
    prettyplease::unparse(ast)
}

/// Parse Rust source text; `file` is only used for error reporting
pub fn parse_source(file: &Path, source: &str) -> Result<SourceTree> {
    syn::parse_file(source).map_err(|e| MutationError::ParseError {
        file: file.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read and parse a Rust source file
pub fn load_source(file: &Path) -> Result<SourceTree> {
    if !file.exists() {
        return Err(MutationError::FileNotFound {
            file: file.to_path_buf(),
        });
    }

    let source = std::fs::read_to_string(file).map_err(|e| MutationError::FileReadError {
        file: file.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_source(file, &source)
}

/// Result of preparing a mutation
pub struct PreparedMutation {
    /// The mutated source code
    pub mutated_source: String,
    /// What the mutation changed
    pub description: String,
    /// The operator that produced the mutated source
    pub operator: MutationOperator,
}

/// Prepare a mutation: check the position, apply, and generate mutated source.
///
/// Unlike the engine itself, which treats an unknown position as a no-op,
/// this rejects positions the kind's discoverer did not report.
pub fn prepare_mutation(
    file: &Path,
    source: Rc<SourceTree>,
    kind: MutationKind,
    position: Position,
) -> Result<PreparedMutation> {
    let positions = kind.positions(&source);
    if !positions.contains(&position) {
        return Err(MutationError::PositionNotDiscovered {
            file: file.to_path_buf(),
            kind: kind.id().to_string(),
            position,
            available: positions,
        });
    }

    let operator = MutationOperator::new(kind, file.display().to_string(), position, source);
    let mutated = operator.apply();
    debug!(kind = %kind, file = %file.display(), position = %position, "Prepared mutation");

    Ok(PreparedMutation {
        mutated_source: generate_source(&mutated),
        description: operator.description(),
        operator,
    })
}

/// Read `file` and prepare a mutation of it
pub fn apply_mutation_to_file(
    file: &Path,
    kind: MutationKind,
    position: Position,
) -> Result<PreparedMutation> {
    let source = load_source(file)?;
    prepare_mutation(file, Rc::new(source), kind, position)
}

/// Write mutated source to `output`
pub fn write_mutated_source(output: &Path, prepared: &PreparedMutation) -> Result<()> {
    std::fs::write(output, &prepared.mutated_source).map_err(|e| MutationError::WriteError {
        file: output.to_path_buf(),
        error: e.to_string(),
    })
}
