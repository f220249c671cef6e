//! Bulk conversion queries.
//!
//! Once a route has been drilled out (source database plus one or more
//! `seeAlso` hops), the result table and the exports need the id chains in
//! bulk. One SELECT walks the whole route: a VALUES clause binds the source
//! ids, then one `rdfs:seeAlso` step per hop, each constrained to the next
//! namespace. The steps are OPTIONAL in full mode so a chain that stops
//! early still produces a row, with nulls for the missing tail.
//!
//! Compact mode groups by source id and GROUP_CONCATs each hop column, so
//! one cell may carry several space-separated ids.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::{checked_term, parse_identifiers_uri, term_value, SparqlClient};
use crate::error::QueryError;

const RDFS_PREFIX: &str = "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>";
const IDENTIFIERS_BASE: &str = "http://identifiers.org";

fn values_clause(namespace: &str, ids: &[String]) -> Result<String, QueryError> {
    let namespace = checked_term(namespace)?;
    let mut uris = Vec::with_capacity(ids.len());
    for id in ids {
        uris.push(format!("<{IDENTIFIERS_BASE}/{namespace}/{}>", checked_term(id)?));
    }
    Ok(format!("  VALUES ?v0 {{ {} }}", uris.join(" ")))
}

fn step_pattern(hop: usize, namespace: &str) -> Result<String, QueryError> {
    let namespace = checked_term(namespace)?;
    let prev = hop - 1;
    Ok(format!(
        "?v{prev} rdfs:seeAlso ?v{hop} .\n    \
         FILTER STRSTARTS(STR(?v{hop}), \"{IDENTIFIERS_BASE}/{namespace}/\")"
    ))
}

/// SELECT for full rows: every column, OPTIONAL steps, nulls allowed.
pub fn full_query(route: &[String], ids: &[String], limit: usize) -> Result<String, QueryError> {
    let vars: Vec<String> = (0..route.len()).map(|i| format!("?v{i}")).collect();
    let mut body = vec![values_clause(&route[0], ids)?];
    for (hop, namespace) in route.iter().enumerate().skip(1) {
        body.push(format!("  OPTIONAL {{\n    {}\n  }}", step_pattern(hop, namespace)?));
    }
    Ok(format!(
        "{RDFS_PREFIX}\nSELECT {} WHERE {{\n{}\n}}\nLIMIT {limit}",
        vars.join(" "),
        body.join("\n")
    ))
}

/// SELECT for target ids only: complete chains, final column, DISTINCT.
pub fn target_query(route: &[String], ids: &[String], limit: usize) -> Result<String, QueryError> {
    let last = route.len() - 1;
    let mut body = vec![values_clause(&route[0], ids)?];
    for (hop, namespace) in route.iter().enumerate().skip(1) {
        body.push(format!("  {}", step_pattern(hop, namespace)?));
    }
    Ok(format!(
        "{RDFS_PREFIX}\nSELECT DISTINCT ?v{last} WHERE {{\n{}\n}}\nLIMIT {limit}",
        body.join("\n")
    ))
}

/// SELECT COUNT(*) over complete chains, for the "Showing N of TOTAL"
/// indicator.
pub fn count_query(route: &[String], ids: &[String]) -> Result<String, QueryError> {
    let mut body = vec![values_clause(&route[0], ids)?];
    for (hop, namespace) in route.iter().enumerate().skip(1) {
        body.push(format!("  {}", step_pattern(hop, namespace)?));
    }
    Ok(format!(
        "{RDFS_PREFIX}\nSELECT (COUNT(*) AS ?total) WHERE {{\n{}\n}}",
        body.join("\n")
    ))
}

/// SELECT for compact rows: grouped by source id, each hop column
/// GROUP_CONCATed into a space-separated id list.
pub fn compact_query(route: &[String], ids: &[String], limit: usize) -> Result<String, QueryError> {
    let mut vars = vec!["?v0".to_string()];
    for i in 1..route.len() {
        vars.push(format!("(GROUP_CONCAT(DISTINCT ?i{i}; separator=\" \") AS ?c{i})"));
    }
    let mut body = vec![values_clause(&route[0], ids)?];
    for (hop, namespace) in route.iter().enumerate().skip(1) {
        let ns = checked_term(namespace)?;
        body.push(format!(
            "  OPTIONAL {{\n    {}\n    BIND(STRAFTER(STR(?v{hop}), \"{IDENTIFIERS_BASE}/{ns}/\") AS ?i{hop})\n  }}",
            step_pattern(hop, namespace)?
        ));
    }
    Ok(format!(
        "{RDFS_PREFIX}\nSELECT {} WHERE {{\n{}\n}}\nGROUP BY ?v0\nLIMIT {limit}",
        vars.join(" "),
        body.join("\n")
    ))
}

/// One binding of a full-mode response → one raw row of optional ids.
/// Terms that are missing or not identifiers.org URIs become nulls.
pub fn parse_full_row(binding: &Value, columns: usize) -> Vec<Option<String>> {
    (0..columns)
        .map(|i| {
            term_value(binding, &format!("v{i}"))
                .and_then(parse_identifiers_uri)
                .map(|(_, id)| id)
        })
        .collect()
}

/// One binding of a compact-mode response → one raw row: source id first,
/// then the concatenated id groups (empty group → null).
pub fn parse_compact_row(binding: &Value, columns: usize) -> Vec<Option<String>> {
    let mut row = Vec::with_capacity(columns);
    row.push(
        term_value(binding, "v0")
            .and_then(parse_identifiers_uri)
            .map(|(_, id)| id),
    );
    for i in 1..columns {
        row.push(
            term_value(binding, &format!("c{i}"))
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
    }
    row
}

impl SparqlClient {
    /// Fetch full conversion rows for the route: one row per chain, one
    /// column per route step, nulls where a chain stopped early.
    #[instrument(skip(self, ids))]
    pub async fn convert_full(
        &self,
        route: &[String],
        ids: &[String],
        limit: usize,
    ) -> Result<Vec<Vec<Option<String>>>, QueryError> {
        if route.is_empty() || ids.is_empty() {
            debug!("empty route or id batch; no conversion query issued");
            return Ok(vec![]);
        }
        let bindings = self.select(&full_query(route, ids, limit)?).await?;
        Ok(bindings
            .iter()
            .map(|b| parse_full_row(b, route.len()))
            .collect())
    }

    /// As [`convert_full`](Self::convert_full), with grouped compact cells.
    #[instrument(skip(self, ids))]
    pub async fn convert_compact(
        &self,
        route: &[String],
        ids: &[String],
        limit: usize,
    ) -> Result<Vec<Vec<Option<String>>>, QueryError> {
        if route.is_empty() || ids.is_empty() {
            debug!("empty route or id batch; no conversion query issued");
            return Ok(vec![]);
        }
        let bindings = self.select(&compact_query(route, ids, limit)?).await?;
        Ok(bindings
            .iter()
            .map(|b| parse_compact_row(b, route.len()))
            .collect())
    }

    /// Fetch the distinct target-column ids for the route (id/URL export).
    #[instrument(skip(self, ids))]
    pub async fn convert_target(
        &self,
        route: &[String],
        ids: &[String],
        limit: usize,
    ) -> Result<Vec<String>, QueryError> {
        if route.len() < 2 || ids.is_empty() {
            debug!("route has no target hop; no conversion query issued");
            return Ok(vec![]);
        }
        let last = route.len() - 1;
        let bindings = self.select(&target_query(route, ids, limit)?).await?;
        Ok(bindings
            .iter()
            .filter_map(|b| term_value(b, &format!("v{last}")))
            .filter_map(parse_identifiers_uri)
            .map(|(_, id)| id)
            .collect())
    }

    /// Total number of complete chains for the route, unlimited.
    #[instrument(skip(self, ids))]
    pub async fn count(&self, route: &[String], ids: &[String]) -> Result<u64, QueryError> {
        if route.is_empty() || ids.is_empty() {
            return Ok(0);
        }
        let bindings = self.select(&count_query(route, ids)?).await?;
        let total = bindings
            .first()
            .and_then(|b| term_value(b, "total"))
            .ok_or_else(|| QueryError::Malformed("count query returned no ?total".to_string()))?;
        total
            .parse()
            .map_err(|_| QueryError::Malformed(format!("unparseable count: {total}")))
    }
}
