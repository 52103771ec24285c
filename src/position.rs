//! Source positions used to address a single node in a syntax tree

use std::fmt;

use quote::ToTokens;
use serde::{Deserialize, Serialize};

/// Location of a node within the tree it was discovered in.
///
/// Taken from the start of the node's first token. Lines and columns are
/// both 1-indexed. A position is only meaningful against the tree it came
/// from (or one with identical layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of the first token of `node`
    pub fn of<T: ToTokens + ?Sized>(node: &T) -> Self {
        let span = node
            .to_token_stream()
            .into_iter()
            .next()
            .map(|t| t.span())
            .unwrap_or_else(proc_macro2::Span::call_site);
        Self::from(span.start())
    }

    /// Position of the first token of a statement.
    ///
    /// Equal to `Position::of(stmt)`, but walks only the leftmost chain of
    /// the common call shapes instead of emitting every token of the
    /// statement.
    pub fn of_stmt(stmt: &syn::Stmt) -> Self {
        let leading = match stmt {
            syn::Stmt::Expr(expr, _) => leading_span(expr),
            syn::Stmt::Macro(mac) => first_attr_span(&mac.attrs)
                .or_else(|| Some(path_span(&mac.mac.path))),
            _ => None,
        };
        match leading {
            Some(span) => Self::from(span.start()),
            None => Self::of(stmt),
        }
    }
}

fn first_attr_span(attrs: &[syn::Attribute]) -> Option<proc_macro2::Span> {
    attrs.first().map(|attr| attr.pound_token.spans[0])
}

fn path_span(path: &syn::Path) -> proc_macro2::Span {
    match (&path.leading_colon, path.segments.first()) {
        (Some(colon), _) => colon.spans[0],
        (None, Some(segment)) => segment.ident.span(),
        (None, None) => proc_macro2::Span::call_site(),
    }
}

/// Span of the first token of `expr`, for the shapes that start with a
/// child expression or a path. `None` means fall back to the token stream.
fn leading_span(expr: &syn::Expr) -> Option<proc_macro2::Span> {
    use syn::Expr;

    match expr {
        Expr::Call(e) => first_attr_span(&e.attrs).or_else(|| leading_span(&e.func)),
        Expr::MethodCall(e) => first_attr_span(&e.attrs).or_else(|| leading_span(&e.receiver)),
        Expr::Await(e) => first_attr_span(&e.attrs).or_else(|| leading_span(&e.base)),
        Expr::Try(e) => first_attr_span(&e.attrs).or_else(|| leading_span(&e.expr)),
        Expr::Field(e) => first_attr_span(&e.attrs).or_else(|| leading_span(&e.base)),
        Expr::Index(e) => first_attr_span(&e.attrs).or_else(|| leading_span(&e.expr)),
        Expr::Macro(e) => first_attr_span(&e.attrs).or_else(|| Some(path_span(&e.mac.path))),
        Expr::Path(e) => first_attr_span(&e.attrs).or_else(|| match &e.qself {
            Some(qself) => Some(qself.lt_token.spans[0]),
            None => Some(path_span(&e.path)),
        }),
        Expr::Paren(e) => first_attr_span(&e.attrs).or_else(|| Some(e.paren_token.span.open())),
        Expr::Lit(e) => first_attr_span(&e.attrs).or_else(|| Some(e.lit.span())),
        _ => None,
    }
}

impl From<proc_macro2::LineColumn> for Position {
    fn from(lc: proc_macro2::LineColumn) -> Self {
        Self {
            line: lc.line,
            column: lc.column + 1, // 1-indexed
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_first_token() {
        let source = "fn f() {\n    let x = a > b;\n}\n";
        let ast = syn::parse_file(source).unwrap();

        let syn::Item::Fn(func) = &ast.items[0] else {
            panic!("expected a function");
        };
        let syn::Stmt::Local(local) = &func.block.stmts[0] else {
            panic!("expected a let statement");
        };

        assert_eq!(Position::of(local), Position::new(2, 5));
        let init = local.init.as_ref().unwrap();
        assert_eq!(Position::of(&*init.expr), Position::new(2, 13));
    }

    #[test]
    fn test_statement_position_matches_token_stream() {
        let source = r#"
fn f() {
    log(x);
    #[allow(unused)] state.inner.reset().await?;
    ::std::mem::drop(value);
    <Vec<u8> as Default>::default();
    (handler)(event);
    items[0].push(1);
    println!("{}", x);
    "text".len();
    let y = 1;
}
"#;
        let ast = syn::parse_file(source).unwrap();
        let syn::Item::Fn(func) = &ast.items[0] else {
            panic!("expected a function");
        };

        for stmt in &func.block.stmts {
            assert_eq!(Position::of_stmt(stmt), Position::of(stmt));
        }
        assert_eq!(Position::of_stmt(&func.block.stmts[1]), Position::new(4, 5));
    }

    #[test]
    fn test_ordering_is_line_then_column() {
        assert!(Position::new(1, 20) < Position::new(2, 1));
        assert!(Position::new(3, 4) < Position::new(3, 5));
        assert_eq!(Position::new(7, 1).to_string(), "7:1");
    }
}
