//! The closed catalog of mutation kinds
//!
//! Every kind resolves to a discoverer and a position-bound rewriter through
//! an exhaustive `match`; adding a kind means adding a variant here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MutationError;
use crate::operator::Transformation;
use crate::position::Position;
use crate::visitor::{PositionDiscoverer, PositionRewriter};
use crate::{negate_conditionals, remove_side_effects, SourceTree};

/// A kind of mutation the engine knows how to discover and apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
    /// Swap a comparison operator for its negation
    NegateConditionals,
    /// Remove a call statement evaluated only for its side effect
    RemoveSideEffects,
}

impl MutationKind {
    /// Every kind, in catalog order
    pub const ALL: [MutationKind; 2] = [
        MutationKind::NegateConditionals,
        MutationKind::RemoveSideEffects,
    ];

    pub fn all() -> &'static [MutationKind] {
        &Self::ALL
    }

    /// Stable identifier, used in config files and on the command line
    pub fn id(self) -> &'static str {
        match self {
            MutationKind::NegateConditionals => "negate-conditionals",
            MutationKind::RemoveSideEffects => "remove-side-effects",
        }
    }

    /// Human readable name
    pub fn label(self) -> &'static str {
        match self {
            MutationKind::NegateConditionals => "Negate Conditionals",
            MutationKind::RemoveSideEffects => "Remove Side Effects",
        }
    }

    pub fn discoverer(self) -> Box<dyn PositionDiscoverer> {
        match self {
            MutationKind::NegateConditionals => Box::new(negate_conditionals::Discoverer),
            MutationKind::RemoveSideEffects => Box::new(remove_side_effects::Discoverer),
        }
    }

    pub fn rewriter(self, position: Position) -> Box<dyn PositionRewriter> {
        match self {
            MutationKind::NegateConditionals => {
                Box::new(negate_conditionals::Rewriter::new(position))
            }
            MutationKind::RemoveSideEffects => {
                Box::new(remove_side_effects::Rewriter::new(position))
            }
        }
    }

    /// Shorthand for `self.discoverer().positions(tree)`
    pub fn positions(self, tree: &SourceTree) -> Vec<Position> {
        self.discoverer().positions(tree)
    }

    pub fn transformation(self, position: Position) -> Transformation {
        Transformation::new(self, position)
    }

    /// Describe the rewrite this kind performs on `tree` at `position`
    pub fn description(self, tree: &SourceTree, position: Position) -> String {
        let mut rewriter = self.rewriter(position);
        let _ = rewriter.visit(tree);
        rewriter.description()
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MutationKind {
    type Err = MutationError;

    /// Accepts either the id (`negate-conditionals`) or the label
    /// (`Negate Conditionals`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.id().eq_ignore_ascii_case(wanted) || kind.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| MutationError::UnknownKind {
                name: wanted.to_string(),
                available: Self::ALL.iter().map(|k| k.id().to_string()).collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
fn guard(a: i32, b: i32) {
    if a > b {
        log(a);
    }
}
"#;

    #[test]
    fn test_every_kind_resolves() {
        let tree = syn::parse_file(SOURCE).unwrap();

        for kind in MutationKind::all() {
            let positions = kind.positions(&tree);
            assert!(!positions.is_empty(), "{kind} found nothing");

            let rewriter = kind.rewriter(positions[0]);
            assert_eq!(rewriter.target(), positions[0]);
        }
    }

    #[test]
    fn test_ids_and_labels_are_unique() {
        let kinds = MutationKind::all();
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.id(), b.id());
                assert_ne!(a.label(), b.label());
            }
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "negate-conditionals".parse::<MutationKind>().unwrap(),
            MutationKind::NegateConditionals
        );
        assert_eq!(
            "Remove Side Effects".parse::<MutationKind>().unwrap(),
            MutationKind::RemoveSideEffects
        );

        let err = "swap-arguments".parse::<MutationKind>().unwrap_err();
        assert!(matches!(err, MutationError::UnknownKind { .. }));
        assert!(err.to_string().contains("negate-conditionals"));
    }

    #[test]
    fn test_serde_uses_ids() {
        let yaml = serde_yaml::to_string(&MutationKind::RemoveSideEffects).unwrap();
        assert_eq!(yaml.trim(), "remove-side-effects");

        let kind: MutationKind = serde_yaml::from_str("negate-conditionals").unwrap();
        assert_eq!(kind, MutationKind::NegateConditionals);
    }

    #[test]
    fn test_description_against_tree() {
        let tree = syn::parse_file(SOURCE).unwrap();
        let kind = MutationKind::NegateConditionals;
        let position = kind.positions(&tree)[0];

        assert_eq!(
            kind.description(&tree, position),
            "changed `>` to `<=` at line 3, column 10"
        );
    }
}
