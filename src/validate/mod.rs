//! # Payload Validation
//!
//! The `graphql_bridge::validate` module checks mutation payload objects
//! against a schema type before anything is written to storage. The only check
//! this core owns is non-null presence: every non-null field of the type must
//! carry a value, except for one excluded field a mutation may supply
//! out-of-band.

mod non_null;

pub use non_null::*;
