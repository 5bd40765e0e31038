//! # Custom Resolver Request Templates
//!
//! The `graphql_bridge::template` module contains the mini-language used to
//! describe the outbound HTTP requests of custom field resolvers, and the
//! substitution of request-time variables into them.
//!
//! A body template looks like JSON with unquoted keys and `$name` variable
//! tokens. It is parsed once per configuration (or cached), and each request
//! substitutes its own variables into a fresh tree:
//!
//! ```
//! use graphql_bridge::context::ASTContext;
//! use graphql_bridge::template::{parse_body_template, substitute_vars_in_body};
//! use serde_json::json;
//!
//! let ctx = ASTContext::new();
//! let (mut body, required) =
//!     parse_body_template(&ctx, "{ author: $id }").unwrap();
//! assert!(required.contains("id"));
//!
//! let vars = json!({"id": "0x3"}).as_object().unwrap().clone();
//! substitute_vars_in_body(&ctx, &mut body, &vars).unwrap();
//! assert_eq!(body.to_json(), json!({"author": "0x3"}));
//! ```
//!
//! URL templates share the variable token syntax but follow their own rules
//! for optional query parameters, see [substitute_vars_in_url].
//!
//! Substitution mutates a tree in place. A parsed template is either shared
//! immutably across requests or owned and substituted by one request at a
//! time, never both.

mod ast;
mod parser;
mod substitute;
mod url;

pub use self::ast::*;
pub use self::parser::*;
pub use self::substitute::*;
pub use self::url::*;
