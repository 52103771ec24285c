//! Discovery of mutation points across the catalog

use std::rc::Rc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::MutationKind;
use crate::operator::MutationOperator;
use crate::position::Position;
use crate::SourceTree;

/// A place in a file where a kind of mutation can be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationPoint {
    pub kind: MutationKind,
    pub file_path: String,
    pub position: Position,
}

/// Find every mutation point for `kinds` in `tree`.
///
/// Points are grouped by kind, in the order `kinds` lists them, then ordered
/// as each kind's discoverer reports them.
pub fn discover_mutation_points(
    file_path: &str,
    tree: &SourceTree,
    kinds: &[MutationKind],
) -> Vec<MutationPoint> {
    let mut points = Vec::new();

    for &kind in kinds {
        let positions = kind.positions(tree);
        debug!(kind = %kind, file = file_path, count = positions.len(), "Discovered mutation points");

        points.extend(positions.into_iter().map(|position| MutationPoint {
            kind,
            file_path: file_path.to_string(),
            position,
        }));
    }

    points
}

/// Build one operator per mutation point in `source`
pub fn operators_for(
    file_path: &str,
    source: &Rc<SourceTree>,
    kinds: &[MutationKind],
) -> Vec<MutationOperator> {
    discover_mutation_points(file_path, source, kinds)
        .into_iter()
        .map(|point| {
            MutationOperator::new(point.kind, point.file_path, point.position, Rc::clone(source))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
fn tick(state: &mut State) {
    if state.count >= LIMIT {
        state.reset();
    }
    notify(state.count == 0);
}
"#;

    #[test]
    fn test_points_grouped_by_kind() {
        let tree = syn::parse_file(SOURCE).unwrap();
        let points = discover_mutation_points("src/tick.rs", &tree, MutationKind::all());

        let summary: Vec<_> = points.iter().map(|p| (p.kind, p.position)).collect();
        assert_eq!(
            summary,
            vec![
                (MutationKind::NegateConditionals, Position::new(3, 20)),
                (MutationKind::NegateConditionals, Position::new(6, 24)),
                (MutationKind::RemoveSideEffects, Position::new(4, 9)),
                (MutationKind::RemoveSideEffects, Position::new(6, 5)),
            ]
        );
        assert!(points.iter().all(|p| p.file_path == "src/tick.rs"));
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let tree = syn::parse_file(SOURCE).unwrap();
        let first = discover_mutation_points("src/tick.rs", &tree, MutationKind::all());
        let second = discover_mutation_points("src/tick.rs", &tree, MutationKind::all());
        assert_eq!(first, second);
    }

    #[test]
    fn test_kind_filter() {
        let tree = syn::parse_file(SOURCE).unwrap();
        let points =
            discover_mutation_points("src/tick.rs", &tree, &[MutationKind::RemoveSideEffects]);
        assert_eq!(points.len(), 2);
        assert!(points
            .iter()
            .all(|p| p.kind == MutationKind::RemoveSideEffects));
    }

    #[test]
    fn test_every_operator_changes_its_tree() {
        let source = Rc::new(syn::parse_file(SOURCE).unwrap());
        let operators = operators_for("src/tick.rs", &source, MutationKind::all());
        assert_eq!(operators.len(), 4);

        for operator in &operators {
            assert!(operator.apply() != *source, "{operator} changed nothing");
        }
    }
}
