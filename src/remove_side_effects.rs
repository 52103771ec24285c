//! Remove Side Effects
//!
//! Deletes a statement that only exists for its side effect: a function or
//! method call (optionally awaited or followed by `?`) or a macro call. The
//! statement either ends in `;`, or is the tail of a block whose value must
//! be `()`:
//!
//! - the body of a function without a return type
//! - the body of a `for`, `while` or `loop`
//! - the `then` block of an `if` without `else`
//! - a block of an `if`, `match`, `unsafe` or plain block expression that
//!   itself sits in such a position, or stands as a statement before the
//!   end of its block
//!
//! Removing the statement leaves the enclosing block and every sibling
//! statement as they were, so `if a > b { log(x) }` becomes `if a > b {}`.
//!
//! Calls inside macro arguments (`println!("{}", f())`) are not statements
//! of the tree; syn keeps macro input as unparsed tokens.

use syn::visit::Visit;
use syn::visit_mut::VisitMut;
use syn::{Block, Expr, Stmt};

use crate::position::Position;
use crate::visitor::{is_test_code, token_text, PositionDiscoverer, PositionRewriter, Rewrite};
use crate::SourceTree;

/// Macros whose removal would change the control flow shape of a block
const DIVERGING_MACROS: &[&str] = &[
    "panic",
    "unreachable",
    "todo",
    "unimplemented",
    "compile_error",
];

/// Whether `stmt` is a call evaluated only for its side effect
pub fn is_side_effect(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(expr, Some(_)) => is_call(expr),
        Stmt::Macro(stmt) => stmt.semi_token.is_some() && !is_diverging(&stmt.mac),
        _ => false,
    }
}

fn is_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call(_) | Expr::MethodCall(_) => true,
        Expr::Await(inner) => is_call(&inner.base),
        Expr::Try(inner) => is_call(&inner.expr),
        Expr::Macro(inner) => !is_diverging(&inner.mac),
        _ => false,
    }
}

fn is_diverging(mac: &syn::Macro) -> bool {
    mac.path
        .segments
        .last()
        .map(|segment| DIVERGING_MACROS.iter().any(|name| segment.ident == name))
        .unwrap_or(false)
}

/// A call without `;`, which is removable only as the tail of a unit block
fn is_tail_call(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(expr, None) => is_call(expr),
        Stmt::Macro(stmt) => stmt.semi_token.is_none() && !is_diverging(&stmt.mac),
        _ => false,
    }
}

/// Whether the statement at `index` may be removed, given whether the
/// block's value must be `()`
fn is_removable(block: &Block, index: usize, unit: bool) -> bool {
    let stmt = &block.stmts[index];
    let is_tail = index + 1 == block.stmts.len();
    is_side_effect(stmt) || (unit && is_tail && is_tail_call(stmt))
}

/// Whether the statement at `index` is an expression whose value must be `()`
fn must_be_unit(block: &Block, index: usize, unit: bool) -> bool {
    let is_tail = index + 1 == block.stmts.len();
    matches!(block.stmts[index], Stmt::Expr(_, None)) && (unit || !is_tail)
}

fn returns_unit(sig: &syn::Signature) -> bool {
    matches!(sig.output, syn::ReturnType::Default)
}

/// Finds every side effect statement outside test code
#[derive(Debug, Default)]
pub struct Discoverer;

impl PositionDiscoverer for Discoverer {
    fn positions(&self, tree: &SourceTree) -> Vec<Position> {
        let mut collector = StatementCollector {
            positions: Vec::new(),
            unit_block: false,
        };
        collector.visit_file(tree);
        collector.positions
    }
}

struct StatementCollector {
    positions: Vec<Position>,
    /// Whether the next block visited must evaluate to `()`
    unit_block: bool,
}

impl StatementCollector {
    fn visit_block_as(&mut self, block: &Block, unit: bool) {
        self.unit_block = unit;
        self.visit_block(block);
    }

    fn visit_if_as(&mut self, expr: &syn::ExprIf, unit: bool) {
        self.visit_expr(&expr.cond);
        self.visit_block_as(&expr.then_branch, unit || expr.else_branch.is_none());
        if let Some((_, else_branch)) = &expr.else_branch {
            match &**else_branch {
                Expr::If(nested) => self.visit_if_as(nested, unit),
                Expr::Block(block) => self.visit_block_as(&block.block, unit),
                other => self.visit_expr(other),
            }
        }
    }

    /// Visit an expression whose value must be `()`
    fn visit_unit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::If(e) => self.visit_if_as(e, true),
            Expr::Block(e) => self.visit_block_as(&e.block, true),
            Expr::Unsafe(e) => self.visit_block_as(&e.block, true),
            Expr::Match(e) => {
                self.visit_expr(&e.expr);
                for arm in &e.arms {
                    self.visit_pat(&arm.pat);
                    if let Some((_, guard)) = &arm.guard {
                        self.visit_expr(guard);
                    }
                    match &*arm.body {
                        Expr::Block(body) => self.visit_block_as(&body.block, true),
                        body => self.visit_expr(body),
                    }
                }
            }
            _ => self.visit_expr(expr),
        }
    }
}

impl<'ast> Visit<'ast> for StatementCollector {
    fn visit_item_fn(&mut self, func: &'ast syn::ItemFn) {
        if !is_test_code(&func.attrs) {
            self.visit_block_as(&func.block, returns_unit(&func.sig));
        }
    }

    fn visit_impl_item_fn(&mut self, func: &'ast syn::ImplItemFn) {
        if !is_test_code(&func.attrs) {
            self.visit_block_as(&func.block, returns_unit(&func.sig));
        }
    }

    fn visit_item_mod(&mut self, module: &'ast syn::ItemMod) {
        if !is_test_code(&module.attrs) {
            syn::visit::visit_item_mod(self, module);
        }
    }

    fn visit_item_impl(&mut self, item: &'ast syn::ItemImpl) {
        if !is_test_code(&item.attrs) {
            syn::visit::visit_item_impl(self, item);
        }
    }

    fn visit_block(&mut self, block: &'ast Block) {
        let unit = std::mem::take(&mut self.unit_block);

        for (index, stmt) in block.stmts.iter().enumerate() {
            if is_removable(block, index, unit) {
                self.positions.push(Position::of_stmt(stmt));
            }
            // Closures and nested blocks inside the call may hold more statements
            match stmt {
                Stmt::Expr(expr, None) if must_be_unit(block, index, unit) => {
                    self.visit_unit_expr(expr)
                }
                _ => self.visit_stmt(stmt),
            }
        }
    }

    fn visit_expr_if(&mut self, expr: &'ast syn::ExprIf) {
        self.visit_if_as(expr, false);
    }

    fn visit_expr_for_loop(&mut self, expr: &'ast syn::ExprForLoop) {
        self.visit_pat(&expr.pat);
        self.visit_expr(&expr.expr);
        self.visit_block_as(&expr.body, true);
    }

    fn visit_expr_while(&mut self, expr: &'ast syn::ExprWhile) {
        self.visit_expr(&expr.cond);
        self.visit_block_as(&expr.body, true);
    }

    fn visit_expr_loop(&mut self, expr: &'ast syn::ExprLoop) {
        self.visit_block_as(&expr.body, true);
    }
}

/// Removes the side effect statement starting at the target position
#[derive(Debug)]
pub struct Rewriter {
    target: Position,
    rewrite: Option<Rewrite>,
    /// Whether the next block visited must evaluate to `()`
    unit_block: bool,
}

impl Rewriter {
    pub fn new(target: Position) -> Self {
        Self {
            target,
            rewrite: None,
            unit_block: false,
        }
    }

    fn visit_block_as(&mut self, block: &mut Block, unit: bool) {
        self.unit_block = unit;
        self.visit_block_mut(block);
    }

    fn visit_if_as(&mut self, expr: &mut syn::ExprIf, unit: bool) {
        self.visit_expr_mut(&mut expr.cond);
        let then_unit = unit || expr.else_branch.is_none();
        self.visit_block_as(&mut expr.then_branch, then_unit);
        if let Some((_, else_branch)) = &mut expr.else_branch {
            match &mut **else_branch {
                Expr::If(nested) => self.visit_if_as(nested, unit),
                Expr::Block(block) => self.visit_block_as(&mut block.block, unit),
                other => self.visit_expr_mut(other),
            }
        }
    }

    fn visit_unit_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::If(e) => self.visit_if_as(e, true),
            Expr::Block(e) => self.visit_block_as(&mut e.block, true),
            Expr::Unsafe(e) => self.visit_block_as(&mut e.block, true),
            Expr::Match(e) => {
                self.visit_expr_mut(&mut e.expr);
                for arm in &mut e.arms {
                    self.visit_pat_mut(&mut arm.pat);
                    if let Some((_, guard)) = &mut arm.guard {
                        self.visit_expr_mut(guard);
                    }
                    match &mut *arm.body {
                        Expr::Block(body) => self.visit_block_as(&mut body.block, true),
                        body => self.visit_expr_mut(body),
                    }
                }
            }
            _ => self.visit_expr_mut(expr),
        }
    }
}

impl VisitMut for Rewriter {
    fn visit_item_fn_mut(&mut self, func: &mut syn::ItemFn) {
        if !is_test_code(&func.attrs) {
            let unit = returns_unit(&func.sig);
            self.visit_block_as(&mut func.block, unit);
        }
    }

    fn visit_impl_item_fn_mut(&mut self, func: &mut syn::ImplItemFn) {
        if !is_test_code(&func.attrs) {
            let unit = returns_unit(&func.sig);
            self.visit_block_as(&mut func.block, unit);
        }
    }

    fn visit_item_mod_mut(&mut self, module: &mut syn::ItemMod) {
        if !is_test_code(&module.attrs) {
            syn::visit_mut::visit_item_mod_mut(self, module);
        }
    }

    fn visit_item_impl_mut(&mut self, item: &mut syn::ItemImpl) {
        if !is_test_code(&item.attrs) {
            syn::visit_mut::visit_item_impl_mut(self, item);
        }
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        let unit = std::mem::take(&mut self.unit_block);
        if self.rewrite.is_some() {
            return; // Already applied, skip
        }

        let target = self.target;
        let found = (0..block.stmts.len()).find(|&index| {
            is_removable(block, index, unit) && Position::of_stmt(&block.stmts[index]) == target
        });

        if let Some(index) = found {
            let removed = block.stmts.remove(index);
            self.rewrite = Some(Rewrite {
                position: target,
                before: token_text(&removed),
                after: String::new(),
            });
            return;
        }

        for index in 0..block.stmts.len() {
            if self.rewrite.is_some() {
                return;
            }
            let unit_expr = must_be_unit(block, index, unit);
            match &mut block.stmts[index] {
                Stmt::Expr(expr, None) if unit_expr => self.visit_unit_expr(expr),
                stmt => self.visit_stmt_mut(stmt),
            }
        }
    }

    fn visit_expr_if_mut(&mut self, expr: &mut syn::ExprIf) {
        self.visit_if_as(expr, false);
    }

    fn visit_expr_for_loop_mut(&mut self, expr: &mut syn::ExprForLoop) {
        self.visit_pat_mut(&mut expr.pat);
        self.visit_expr_mut(&mut expr.expr);
        self.visit_block_as(&mut expr.body, true);
    }

    fn visit_expr_while_mut(&mut self, expr: &mut syn::ExprWhile) {
        self.visit_expr_mut(&mut expr.cond);
        self.visit_block_as(&mut expr.body, true);
    }

    fn visit_expr_loop_mut(&mut self, expr: &mut syn::ExprLoop) {
        self.visit_block_as(&mut expr.body, true);
    }
}

impl PositionRewriter for Rewriter {
    fn target(&self) -> Position {
        self.target
    }

    fn visit(&mut self, tree: &SourceTree) -> SourceTree {
        self.rewrite = None;
        self.unit_block = false;
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
                "removed `{}` at line {}, column {}",
                rewrite.before, rewrite.position.line, rewrite.position.column
            ),
            None => format!(
                "no side effect statement at line {}, column {}",
                self.target.line, self.target.column
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate_source;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> SourceTree {
        syn::parse_file(source).unwrap()
    }

    fn stmt(source: &str) -> Stmt {
        syn::parse_str(source).unwrap()
    }

    #[test]
    fn test_side_effect_statements() {
        assert!(is_side_effect(&stmt("log(x);")));
        assert!(is_side_effect(&stmt("self.items.push(x);")));
        assert!(is_side_effect(&stmt("client.send(msg).await;")));
        assert!(is_side_effect(&stmt("file.flush()?;")));
        assert!(is_side_effect(&stmt("println!(\"{}\", x);")));
    }

    #[test]
    fn test_non_side_effect_statements() {
        assert!(!is_side_effect(&stmt("let y = compute(x);")));
        assert!(!is_side_effect(&stmt("x = compute(y);")));
        assert!(!is_side_effect(&stmt("return;")));
        assert!(!is_side_effect(&stmt("panic!(\"boom\");")));
        assert!(!is_side_effect(&stmt("std::unreachable!();")));
        assert!(!is_side_effect(&stmt("a + b;")));
    }

    #[test]
    fn test_discover_statements_in_nested_blocks() {
        let source = r#"
fn run(items: &mut Vec<i32>) {
    setup();
    for item in items.iter() {
        emit(*item);
    }
    let total = sum(items);
    items.iter().for_each(|x| {
        record(x);
    });
    finish(total)
}
"#;
        let positions = Discoverer.positions(&parse(source));
        assert_eq!(
            positions,
            vec![
                Position::new(3, 5),
                Position::new(5, 9),
                Position::new(8, 5),
                Position::new(9, 9),
                Position::new(11, 5),
            ]
        );
    }

    #[test]
    fn test_remove_tail_call_of_if_without_else() {
        let source = r#"
fn guard(a: i32, b: i32) -> bool {
    if a > b { log(x) }
    other();
    a == b
}
"#;
        let tree = parse(source);
        let positions = Discoverer.positions(&tree);
        assert_eq!(positions, vec![Position::new(3, 16), Position::new(4, 5)]);

        let mut rewriter = Rewriter::new(positions[0]);
        let mutated = rewriter.visit(&tree);

        let expected = parse("fn guard(a: i32, b: i32) -> bool { if a > b {} other(); a == b }");
        assert_eq!(generate_source(&mutated), generate_source(&expected));
        assert_eq!(
            rewriter.description(),
            "removed `log (x)` at line 3, column 16"
        );
    }

    #[test]
    fn test_tail_calls_in_unit_positions() {
        let source = r#"
fn drain(v: Vec<i32>, o: Option<i32>) -> usize {
    for x in &v { emit(x) }
    while ready() { poll() }
    match o {
        Some(x) => { consume(x) }
        None => {}
    }
    if o.is_some() { first() } else if v.is_empty() { second() } else { third() }
    v.len()
}
"#;
        let positions = Discoverer.positions(&parse(source));
        assert_eq!(
            positions,
            vec![
                Position::new(3, 19),
                Position::new(4, 21),
                Position::new(6, 22),
                Position::new(9, 22),
                Position::new(9, 55),
                Position::new(9, 73),
            ]
        );
    }

    #[test]
    fn test_tail_calls_whose_value_is_used_are_kept() {
        let source = r#"
fn pick(c: bool) -> i32 {
    let y = if c { first() } else { second() };
    if c { third() } else { fourth() }
}
"#;
        let tree = parse(source);
        assert!(Discoverer.positions(&tree).is_empty());
        // `third()` is the value of the function body
        assert!(Rewriter::new(Position::new(4, 12)).visit(&tree) == tree);
    }

    #[test]
    fn test_remove_only_target_statement() {
        let source = r#"
fn run() {
    log(1);
    log(1);
    log(2);
}
"#;
        let tree = parse(source);
        let positions = Discoverer.positions(&tree);
        assert_eq!(positions.len(), 3);

        let mut rewriter = Rewriter::new(positions[1]);
        let mutated = rewriter.visit(&tree);

        let expected = parse("fn run() { log(1); log(2); }");
        assert_eq!(generate_source(&mutated), generate_source(&expected));
        assert_eq!(
            rewriter.description(),
            "removed `log (1) ;` at line 4, column 5"
        );
    }

    #[test]
    fn test_remove_statement_inside_closure() {
        let source = r#"
fn run(items: &[i32]) {
    items.iter().for_each(|x| {
        record(x);
        audit(x);
    });
}
"#;
        let tree = parse(source);
        let mutated = Rewriter::new(Position::new(5, 9)).visit(&tree);

        let expected = parse(
            r#"
fn run(items: &[i32]) {
    items.iter().for_each(|x| {
        record(x);
    });
}
"#,
        );
        assert_eq!(generate_source(&mutated), generate_source(&expected));
    }

    #[test]
    fn test_foreign_position_is_noop() {
        let tree = parse("fn run() {\n    let y = compute();\n    y\n}\n");
        // Points at the `let` statement, which has no side effect to remove
        let mut rewriter = Rewriter::new(Position::new(2, 5));
        let mutated = rewriter.visit(&tree);

        assert!(mutated == tree);
        assert!(rewriter.outcome().is_none());
        assert_eq!(
            rewriter.description(),
            "no side effect statement at line 2, column 5"
        );
    }

    #[test]
    fn test_tail_call_is_kept() {
        let tree = parse("fn run() -> i32 {\n    compute()\n}\n");
        assert!(Discoverer.positions(&tree).is_empty());
        assert!(Rewriter::new(Position::new(2, 5)).visit(&tree) == tree);
    }
}
