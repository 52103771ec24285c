//! Position-scoped mutation engine for Rust
//!
//! Given a parsed source file and a catalog of mutation kinds, this library
//! finds every position where a kind can apply, and applies exactly one
//! mutation at exactly one chosen position. Rewriters match nodes by source
//! position rather than by shape, so of two identical `a > b` expressions
//! only the chosen one is negated.
//!
//! # Example Configuration
//!
//! ```yaml
//! version: "1.0"
//! operators:
//!   - negate-conditionals
//!   - remove-side-effects
//! files:
//!   - src/math.rs
//! ```
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use mutation_engine::{generate_source, MutationKind, MutationOperator};
//!
//! let tree = Rc::new(syn::parse_file("fn f(a: i32, b: i32) -> bool { a > b }").unwrap());
//! let kind = MutationKind::NegateConditionals;
//! let position = kind.positions(&tree)[0];
//!
//! let operator = MutationOperator::new(kind, "src/lib.rs", position, tree);
//! assert!(generate_source(&operator.apply()).contains("a <= b"));
//! ```

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod discovery;
pub mod error;
pub mod negate_conditionals;
pub mod operator;
pub mod position;
pub mod remove_side_effects;
pub mod report;
pub mod visitor;

/// An immutable parsed source file
pub type SourceTree = syn::File;

// Re-export main types at crate root
pub use catalog::MutationKind;
pub use codegen::{generate_source, load_source, parse_source};
pub use config::Config;
pub use discovery::{discover_mutation_points, operators_for, MutationPoint};
pub use error::{MutationError, Result};
pub use operator::{MutationOperator, Transformation};
pub use position::Position;
pub use report::DiscoveryReport;
pub use visitor::{PositionDiscoverer, PositionRewriter, Rewrite};
