//! Negate Conditionals
//!
//! Swaps a comparison operator for its negation:
//!
//! | original | mutated |
//! |----------|---------|
//! | `==`     | `!=`    |
//! | `!=`     | `==`    |
//! | `<`      | `>=`    |
//! | `>=`     | `<`     |
//! | `>`      | `<=`    |
//! | `<=`     | `>`     |
//!
//! Logical `&&` and `||` are not mutated; negating those would need
//! De Morgan rewriting of both operands, which this kind does not do.
//!
//! Comparisons inside macro arguments (`assert!(a > b)`) are not mutated
//! either: syn keeps macro input as unparsed tokens, so they are not part
//! of the tree.

use syn::visit::Visit;
use syn::visit_mut::VisitMut;
use syn::BinOp;

use crate::position::Position;
use crate::visitor::{
    skip_test_code, skip_test_code_mut, token_text, PositionDiscoverer, PositionRewriter, Rewrite,
};
use crate::SourceTree;

/// The negated form of a comparison operator, keeping its token spans.
///
/// Returns `None` for operators that are not comparisons.
pub fn negate(op: &BinOp) -> Option<BinOp> {
    use syn::token;

    let negated = match op {
        BinOp::Eq(t) => BinOp::Ne(token::Ne { spans: t.spans }),
        BinOp::Ne(t) => BinOp::Eq(token::EqEq { spans: t.spans }),
        BinOp::Lt(t) => BinOp::Ge(token::Ge { spans: [t.spans[0], t.spans[0]] }),
        BinOp::Ge(t) => BinOp::Lt(token::Lt { spans: [t.spans[0]] }),
        BinOp::Gt(t) => BinOp::Le(token::Le { spans: [t.spans[0], t.spans[0]] }),
        BinOp::Le(t) => BinOp::Gt(token::Gt { spans: [t.spans[0]] }),
        _ => return None,
    };
    Some(negated)
}

fn is_comparison(op: &BinOp) -> bool {
    negate(op).is_some()
}

/// Finds every comparison operator outside test code
#[derive(Debug, Default)]
pub struct Discoverer;

impl PositionDiscoverer for Discoverer {
    fn positions(&self, tree: &SourceTree) -> Vec<Position> {
        let mut collector = ComparisonCollector {
            positions: Vec::new(),
        };
        collector.visit_file(tree);
        collector.positions
    }
}

struct ComparisonCollector {
    positions: Vec<Position>,
}

impl<'ast> Visit<'ast> for ComparisonCollector {
    skip_test_code!('ast);

    fn visit_expr_binary(&mut self, expr: &'ast syn::ExprBinary) {
        if is_comparison(&expr.op) {
            self.positions.push(Position::of(&expr.op));
        }
        // Comparisons nest inside operands (`(a < b) == c`)
        syn::visit::visit_expr_binary(self, expr);
    }
}

/// Negates the comparison whose operator starts at the target position
#[derive(Debug)]
pub struct Rewriter {
    target: Position,
    rewrite: Option<Rewrite>,
}

impl Rewriter {
    pub fn new(target: Position) -> Self {
        Self {
            target,
            rewrite: None,
        }
    }
}

impl VisitMut for Rewriter {
    skip_test_code_mut!();

    fn visit_expr_binary_mut(&mut self, expr: &mut syn::ExprBinary) {
        if self.rewrite.is_some() {
            return; // Already applied, skip
        }

        if Position::of(&expr.op) == self.target {
            if let Some(negated) = negate(&expr.op) {
                self.rewrite = Some(Rewrite {
                    position: self.target,
                    before: token_text(&expr.op),
                    after: token_text(&negated),
                });
                expr.op = negated;
                return;
            }
        }

        syn::visit_mut::visit_expr_binary_mut(self, expr);
    }
}

impl PositionRewriter for Rewriter {
    fn target(&self) -> Position {
        self.target
    }

    fn visit(&mut self, tree: &SourceTree) -> SourceTree {
        self.rewrite = None;
        let mut mutated = tree.clone();
        self.visit_file_mut(&mut mutated);
        mutated
    }

    fn outcome(&self) -> Option<&Rewrite> {
        self.rewrite.as_ref()
    }

    fn description(&self) -> String {
        match &self.rewrite {
            Some(rewrite) => format!(
                "changed `{}` to `{}` at line {}, column {}",
                rewrite.before, rewrite.after, rewrite.position.line, rewrite.position.column
            ),
            None => format!(
                "no conditional operator at line {}, column {}",
                self.target.line, self.target.column
            ),
        }
    }
}
