//! Capability-capped HTTP client.
//!
//! All outbound traffic goes through [`GuardedClient`], which only allows
//! requests to an approved set of hosts. The cross-reference explorer talks
//! to exactly one SPARQL endpoint plus identifiers.org, so the allowlist is
//! seeded from the configured endpoint rather than hardcoded.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use url::Url;

use crate::error::QueryError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A host-allowlisted `reqwest` wrapper.
#[derive(Debug, Clone)]
pub struct GuardedClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl GuardedClient {
    /// Build a client allowing the given endpoint's host plus
    /// identifiers.org.
    pub fn for_endpoint(endpoint: &Url) -> Result<Self, QueryError> {
        let host = endpoint
            .host_str()
            .ok_or_else(|| QueryError::NoHost(endpoint.to_string()))?;

        let mut allowlist = HashSet::new();
        allowlist.insert(host.to_string());
        allowlist.insert("identifiers.org".to_string());

        let client = ClientBuilder::new().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, allowlist })
    }

    /// Append an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Whether `url` is permitted: its host must equal an allowed domain or
    /// be a subdomain of one.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
    }

    /// A GET request builder, if the URL passes the allowlist.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, QueryError> {
        if !self.is_allowed(url) {
            return Err(QueryError::Blocked(url.to_string()));
        }
        Ok(self.client.get(url))
    }
}
