//! SPARQL SELECT client.
//!
//! Queries go out as HTTP GET with `query` and
//! `format=application/sparql-results+json` parameters; responses come back
//! as the W3C SPARQL results JSON shape:
//!
//! ```json
//! { "results": { "bindings": [ { "o": { "type": "uri", "value": "…" } } ] } }
//! ```
//!
//! Only `results.bindings` is consumed. A response body that is not JSON is
//! an error; a response missing the expected fields is treated as empty,
//! and individual bindings missing a variable are skipped by the callers.

use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::QueryError;
use crate::http::GuardedClient;

/// Response format requested from the endpoint.
pub const RESULTS_JSON_FORMAT: &str = "application/sparql-results+json";

/// Row limit passed to bulk conversion queries unless the caller overrides.
pub const DEFAULT_RESULT_LIMIT: usize = 100;

/// Client for one configured SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct SparqlClient {
    http: GuardedClient,
    endpoint: Url,
}

impl SparqlClient {
    pub fn new(endpoint: &str) -> Result<Self, QueryError> {
        let endpoint = Url::parse(endpoint)?;
        let http = GuardedClient::for_endpoint(&endpoint)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run a SELECT query and return its bindings.
    #[instrument(skip(self, query))]
    pub async fn select(&self, query: &str) -> Result<Vec<Value>, QueryError> {
        debug!(endpoint = %self.endpoint, "issuing SPARQL query");
        let resp = self
            .http
            .get(self.endpoint.as_str())?
            .query(&[("query", query), ("format", RESULTS_JSON_FORMAT)])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = resp.json().await?;
        let bindings = match body["results"]["bindings"].as_array() {
            Some(rows) => rows.clone(),
            None => {
                warn!("response carries no results.bindings; treating as empty");
                Vec::new()
            }
        };
        debug!(rows = bindings.len(), "SPARQL query returned");
        Ok(bindings)
    }
}

/// The `value` string of variable `var` in one binding, if present.
pub fn term_value<'a>(binding: &'a Value, var: &str) -> Option<&'a str> {
    binding[var]["value"].as_str()
}

/// Parse an identifiers.org URI into its `(namespace, id)` pair.
///
/// Accepts `http://identifiers.org/{ns}/{id}` and the https form; anything
/// else yields `None` and is discarded by the callers.
pub fn parse_identifiers_uri(value: &str) -> Option<(String, String)> {
    let rest = value
        .strip_prefix("http://identifiers.org/")
        .or_else(|| value.strip_prefix("https://identifiers.org/"))?;
    let (namespace, id) = rest.split_once('/')?;
    if namespace.is_empty() || id.is_empty() {
        return None;
    }
    Some((namespace.to_string(), id.to_string()))
}

/// Refuse namespace/id values that cannot be safely interpolated into a
/// query (whitespace or angle brackets would escape the IRI literal).
pub(crate) fn checked_term(value: &str) -> Result<&str, QueryError> {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '\\'))
    {
        return Err(QueryError::UnsafeIdentifier(value.to_string()));
    }
    Ok(value)
}
