//! # Schema Definitions and Predicate Resolution
//!
//! The `graphql_bridge::schema` module contains utilities to parse a GraphQL
//! schema from SDL source text and to compile it into the storage-level
//! predicate map the rest of a service consults when translating requests.
//!
//! A schema is parsed once via [ParseSdl] and resolved once via
//! [PredicateMap::resolve]; the result is immutable and may be shared across
//! request handlers through a [SharedPredicateMap]:
//!
//! ```
//! use graphql_bridge::context::ASTContext;
//! use graphql_bridge::schema::{ParseSdl, PredicateMap, Schema};
//!
//! let ctx = ASTContext::new();
//! let schema = Schema::parse(&ctx, "type Post { postID: ID! title: String }").unwrap();
//! let predicates = PredicateMap::resolve(schema);
//! assert_eq!(predicates.predicate("Post", "title"), Some("Post.title"));
//! ```
//!
//! [More information on the Schema struct.](Schema)

mod predicates;
#[allow(clippy::module_inception)]
pub mod schema;
pub mod sdl;

pub use predicates::*;
pub use schema::*;
pub use sdl::parser::ParseSdl;
