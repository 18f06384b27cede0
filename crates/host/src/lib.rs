//! # Host-program abstractions
//!
//! The core analysis never parses the host language itself. Instead it works
//! over a generic `{kind, children}` syntax-tree abstraction ([`HostTree`])
//! and a set of capability traits ([`SymbolResolver`], [`SchemaSource`])
//! supplied by the host tooling. This keeps the resolver and usage walker
//! free of any dependency on a specific host grammar: any frontend that can
//! lower its AST into [`HostKind`] shapes gets the full analysis for free.
//!
//! ## Declaration shapes
//!
//! Embedded documents reach the resolver through declarations whose
//! initializers come in a handful of recognized wrappers. Rather than a chain
//! of ad hoc type predicates, the recognized forms are a tagged union,
//! [`DeclarationShape`], with a single classification entry point.

mod resolve;
mod schema;
mod shape;
mod tree;

pub use resolve::{Declaration, DeclarationId, IdentifierRef, Reference, SymbolResolver};
pub use schema::SchemaSource;
pub use shape::DeclarationShape;
pub use tree::{HostKind, HostNode, HostNodeId, HostTree};
