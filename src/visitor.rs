//! Capability interfaces shared by every mutation kind
//!
//! Each kind provides a read-only discoverer (a `syn::visit::Visit`) and a
//! position-bound rewriter (a `syn::visit_mut::VisitMut` run over a copy of
//! the tree). Both walk the tree with the same rules, so a rewriter only ever
//! changes a node its discoverer would have reported.

use crate::position::Position;
use crate::SourceTree;

/// Read-only traversal returning every position where a kind applies
pub trait PositionDiscoverer {
    /// All eligible positions, in traversal order
    fn positions(&self, tree: &SourceTree) -> Vec<Position>;
}

/// Rewrites the single node found at one target position
pub trait PositionRewriter {
    /// The position this rewriter is bound to
    fn target(&self) -> Position;

    /// Return a copy of `tree` with the node at the target position rewritten.
    ///
    /// When no eligible node sits at the target position the copy is
    /// returned unchanged.
    fn visit(&mut self, tree: &SourceTree) -> SourceTree;

    /// The edit performed by the last `visit`, if any
    fn outcome(&self) -> Option<&Rewrite>;

    /// Human readable summary of the last `visit`
    fn description(&self) -> String;
}

/// A single edit performed by a rewriter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub position: Position,
    /// Source text of the node before the edit
    pub before: String,
    /// Source text after the edit (empty when the node was removed)
    pub after: String,
}

/// Whether an item's attributes mark it as test code
///
/// Matches `#[test]` (including path forms like `#[tokio::test]`) and any
/// `#[cfg(..)]` predicate that only holds under `test`, such as
/// `cfg(test)` or `cfg(all(test, feature = "x"))`. Test code is never mutated.
pub(crate) fn is_test_code(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        let is_test_attr = attr
            .path()
            .segments
            .last()
            .map(|segment| segment.ident == "test")
            .unwrap_or(false);
        if is_test_attr {
            return true;
        }
        if !attr.path().is_ident("cfg") {
            return false;
        }
        attr.parse_args::<syn::Meta>()
            .map(|predicate| requires_test(&predicate))
            .unwrap_or(false)
    })
}

/// Whether a cfg predicate can only be true when `test` is set
fn requires_test(predicate: &syn::Meta) -> bool {
    match predicate {
        syn::Meta::Path(path) => path.is_ident("test"),
        syn::Meta::List(list) => {
            let Ok(nested) = list.parse_args_with(
                syn::punctuated::Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated,
            ) else {
                return false;
            };
            if list.path.is_ident("all") {
                nested.iter().any(requires_test)
            } else if list.path.is_ident("any") {
                !nested.is_empty() && nested.iter().all(requires_test)
            } else {
                // `not(..)` and unknown predicates
                false
            }
        }
        syn::Meta::NameValue(_) => false,
    }
}

/// Source text of a node, as emitted by its token stream
pub(crate) fn token_text<T: quote::ToTokens>(node: &T) -> String {
    node.to_token_stream().to_string()
}

/// Skip test code in a read-only traversal.
///
/// Expands to `Visit` methods for functions, impl methods and modules that
/// only descend when the item is not test code.
macro_rules! skip_test_code {
    ($ast:lifetime) => {
        fn visit_item_fn(&mut self, func: &$ast syn::ItemFn) {
            if !$crate::visitor::is_test_code(&func.attrs) {
                syn::visit::visit_item_fn(self, func);
            }
        }

        fn visit_impl_item_fn(&mut self, func: &$ast syn::ImplItemFn) {
            if !$crate::visitor::is_test_code(&func.attrs) {
                syn::visit::visit_impl_item_fn(self, func);
            }
        }

        fn visit_item_mod(&mut self, module: &$ast syn::ItemMod) {
            if !$crate::visitor::is_test_code(&module.attrs) {
                syn::visit::visit_item_mod(self, module);
            }
        }

        fn visit_item_impl(&mut self, item: &$ast syn::ItemImpl) {
            if !$crate::visitor::is_test_code(&item.attrs) {
                syn::visit::visit_item_impl(self, item);
            }
        }
    };
}

/// Skip test code in a rewriting traversal, mirroring [`skip_test_code`].
macro_rules! skip_test_code_mut {
    () => {
        fn visit_item_fn_mut(&mut self, func: &mut syn::ItemFn) {
            if !$crate::visitor::is_test_code(&func.attrs) {
                syn::visit_mut::visit_item_fn_mut(self, func);
            }
        }

        fn visit_impl_item_fn_mut(&mut self, func: &mut syn::ImplItemFn) {
            if !$crate::visitor::is_test_code(&func.attrs) {
                syn::visit_mut::visit_impl_item_fn_mut(self, func);
            }
        }

        fn visit_item_mod_mut(&mut self, module: &mut syn::ItemMod) {
            if !$crate::visitor::is_test_code(&module.attrs) {
                syn::visit_mut::visit_item_mod_mut(self, module);
            }
        }

        fn visit_item_impl_mut(&mut self, item: &mut syn::ItemImpl) {
            if !$crate::visitor::is_test_code(&item.attrs) {
                syn::visit_mut::visit_item_impl_mut(self, item);
            }
        }
    };
}

pub(crate) use skip_test_code;
pub(crate) use skip_test_code_mut;

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs_of(source: &str) -> Vec<syn::Attribute> {
        let item: syn::ItemFn = syn::parse_str(source).unwrap();
        item.attrs
    }

    #[test]
    fn test_detects_test_attributes() {
        assert!(is_test_code(&attrs_of("#[test] fn t() {}")));
        assert!(is_test_code(&attrs_of("#[cfg(test)] fn t() {}")));
        assert!(is_test_code(&attrs_of("#[tokio::test] async fn t() {}")));
        assert!(!is_test_code(&attrs_of("#[inline] fn t() {}")));
        assert!(!is_test_code(&attrs_of("#[cfg(feature = \"x\")] fn t() {}")));
        assert!(!is_test_code(&attrs_of("fn t() {}")));
    }

    #[test]
    fn test_compound_cfg_predicates() {
        assert!(is_test_code(&attrs_of("#[cfg(all(test, feature = \"x\"))] fn t() {}")));
        assert!(is_test_code(&attrs_of("#[cfg(all(unix, any(test, test)))] fn t() {}")));
        assert!(!is_test_code(&attrs_of("#[cfg(any(test, feature = \"x\"))] fn t() {}")));
        assert!(!is_test_code(&attrs_of("#[cfg(not(test))] fn t() {}")));
        assert!(!is_test_code(&attrs_of("#[cfg(all(unix, windows))] fn t() {}")));
    }
}
