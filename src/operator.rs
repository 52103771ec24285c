//! Mutation operators: one kind, bound to one position in one source tree

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::MutationKind;
use crate::position::Position;
use crate::SourceTree;

/// A pure tree transformation: rewrite the node at `position` as `kind` does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    pub kind: MutationKind,
    pub position: Position,
}

impl Transformation {
    pub fn new(kind: MutationKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Produce the rewritten tree, leaving `tree` untouched
    pub fn apply(&self, tree: &SourceTree) -> SourceTree {
        self.kind.rewriter(self.position).visit(tree)
    }
}

/// A ready-to-run mutation of one source file
#[derive(Clone)]
pub struct MutationOperator {
    kind: MutationKind,
    file_path: String,
    position: Position,
    source: Rc<SourceTree>,
    transformation: Transformation,
}

impl MutationOperator {
    /// Bind `kind` to `position` in `source`.
    ///
    /// `position` should come from `kind`'s discoverer run over the same
    /// tree; any other position makes the operator a no-op.
    pub fn new(
        kind: MutationKind,
        file_path: impl Into<String>,
        position: Position,
        source: Rc<SourceTree>,
    ) -> Self {
        Self {
            kind,
            file_path: file_path.into(),
            position,
            source,
            transformation: kind.transformation(position),
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Label of the file the source tree was parsed from
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn source(&self) -> &SourceTree {
        &self.source
    }

    pub fn transformation(&self) -> Transformation {
        self.transformation
    }

    /// Produce the mutated tree. The stored source is never modified, so
    /// repeated calls yield equal trees.
    pub fn apply(&self) -> SourceTree {
        debug!(
            kind = %self.kind,
            file = %self.file_path,
            position = %self.position,
            "Applying mutation"
        );
        self.transformation.apply(&self.source)
    }

    /// Describe this mutation, always against the original source
    pub fn description(&self) -> String {
        self.kind.description(&self.source, self.position)
    }
}

impl fmt::Debug for MutationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The source tree is elided; it dwarfs every other field
        f.debug_struct("MutationOperator")
            .field("kind", &self.kind)
            .field("file_path", &self.file_path)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MutationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} [{}] {}",
            self.file_path,
            self.position,
            self.kind.label(),
            self.description()
        )
    }
}
