//! crossid-sparql — SPARQL endpoint client.
//!
//! The only asynchronous piece of the system:
//! - a capability-capped HTTP client restricted to the endpoint host
//! - SELECT queries with `format=application/sparql-results+json`
//! - relation expansion over `rdfs:seeAlso` (one query per step)
//! - bulk conversion queries feeding the table projector and exports
//!
//! Failures are never retried; a failed call returns a [`QueryError`] and
//! leaves the caller's session untouched. Malformed bindings inside an
//! otherwise well-formed response are skipped, not raised.

pub mod client;
pub mod convert;
pub mod error;
pub mod http;
pub mod seealso;

pub use client::{parse_identifiers_uri, SparqlClient, DEFAULT_RESULT_LIMIT};
pub use error::QueryError;
pub use http::GuardedClient;
pub use seealso::RelationSource;
