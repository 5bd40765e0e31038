//! `graphql_bridge`
//! =========
//!
//! _Predictable GraphQL schema to graph-storage mapping and custom resolver templating._
//!
//! The **`graphql_bridge`** library implements the two compilation steps a
//! GraphQL layer over a graph database performs ahead of serving requests:
//!
//! - Compiling the schema's types, interfaces, and directives into an
//!   immutable map from GraphQL fields onto storage predicate names, honoring
//!   interface inheritance and per-field/per-type naming overrides.
//! - Parsing the request templates of custom field resolvers — a JSON-like
//!   body mini-language and URL templates — and substituting request-time
//!   variables into them.
//!
//! In short, _surprise!_ The `graphql_bridge` crate while handling a part of
//! GraphQL does not aim to execute queries or to speak to a database or an
//! external API. Query execution and transports are one-off integrations;
//! what this library owns are the pure, deterministic translation rules those
//! integrations rely on: which predicate a field reads from, which variables a
//! template needs, and how a request is built from them. Everything here is a
//! synchronous function of its arguments, safe to call from arbitrarily many
//! concurrent request handlers.
//!
//! ```
//! use graphql_bridge::context::ASTContext;
//! use graphql_bridge::schema::{ParseSdl, PredicateMap, Schema};
//! use graphql_bridge::template::{parse_body_template, substitute_vars_in_body};
//! use serde_json::json;
//!
//! // Parse a schema and resolve its predicate map once, at load time
//! let ctx = ASTContext::new();
//! let schema = Schema::parse(&ctx, r#"
//!     type Post {
//!         postID: ID!
//!         title: String @dgraph(pred: "dgraph.title")
//!     }
//! "#).unwrap();
//! let predicates = PredicateMap::resolve(schema);
//! assert_eq!(predicates.predicate("Post", "title"), Some("dgraph.title"));
//!
//! // Parse a custom resolver's body template and fill in request variables
//! let (mut body, _required) = parse_body_template(&ctx, "{ post: $id }").unwrap();
//! let vars = json!({"id": "0x9"}).as_object().unwrap().clone();
//! substitute_vars_in_body(&ctx, &mut body, &vars).unwrap();
//! assert_eq!(body.to_json(), json!({"post": "0x9"}));
//! ```
//!
//! [A good place to start learning more about this crate is the `schema` module...](schema)

pub mod context;
pub mod error;
pub mod schema;
pub mod template;
pub mod validate;

pub use bumpalo;
