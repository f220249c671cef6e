//! Relation expansion over `rdfs:seeAlso`.
//!
//! One drill-down step issues exactly one SELECT for the chosen
//! namespace+id pair, parses every related identifiers.org URI out of the
//! bindings, and aggregates them per namespace exactly like the input
//! classifier (count + id list, stable descending sort). URIs of any other
//! shape are discarded silently.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crossid_core::classify::{aggregate, Level};

use crate::client::{checked_term, parse_identifiers_uri, term_value, SparqlClient};
use crate::error::QueryError;

/// Source of `rdfs:seeAlso` relations. The UI layer holds a trait object so
/// tests can substitute a canned source for the live endpoint.
#[async_trait]
pub trait RelationSource: Send + Sync {
    /// Expand one namespace+id pair into a new drill-down level.
    async fn expand(&self, namespace: &str, id: &str) -> Result<Level, QueryError>;
}

/// The SELECT issued for one expansion step.
pub fn seealso_query(namespace: &str, id: &str) -> String {
    format!(
        "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n\
         SELECT * WHERE {{\n  <http://identifiers.org/{namespace}/{id}> rdfs:seeAlso ?o\n}}"
    )
}

/// Aggregate `?o` bindings into a level. Bindings without an `o` term or
/// with a non-identifiers.org value contribute nothing.
pub fn parse_seealso_bindings(bindings: &[Value]) -> Level {
    aggregate(
        bindings
            .iter()
            .filter_map(|b| term_value(b, "o"))
            .filter_map(parse_identifiers_uri),
    )
}

#[async_trait]
impl RelationSource for SparqlClient {
    #[instrument(skip(self))]
    async fn expand(&self, namespace: &str, id: &str) -> Result<Level, QueryError> {
        let namespace = checked_term(namespace)?;
        let id = checked_term(id)?;
        let bindings = self.select(&seealso_query(namespace, id)).await?;
        let level = parse_seealso_bindings(&bindings);
        debug!(namespace, namespaces = level.len(), "seeAlso expansion aggregated");
        Ok(level)
    }
}
