//! Link configuration registry.
//!
//! Maps `"{source}-{target}"` keys to link metadata and answers which
//! databases are directly linkable from a given source. Matching is on the
//! exact `"{source}-"` prefix, so a key like "pdb" does not pick up
//! "pdbe-…" entries.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CatalogError;

/// Metadata attached to one source→target link. Fields beyond `label` vary
/// by deployment and are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `"{source}-{target}"` → link metadata, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkConfig {
    entries: IndexMap<String, LinkEntry>,
}

impl LinkConfig {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let config: LinkConfig = serde_json::from_str(json)?;
        info!(links = config.entries.len(), "link configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, source: &str, target: &str) -> Option<&LinkEntry> {
        self.entries.get(&format!("{source}-{target}"))
    }

    /// Whether a direct link from `source` to `target` is configured.
    pub fn is_linked(&self, source: &str, target: &str) -> bool {
        self.get(source, target).is_some()
    }

    /// Every target directly linkable from `source`, in file order.
    pub fn targets_of<'a>(&'a self, source: &str) -> Vec<&'a str> {
        let prefix = format!("{source}-");
        self.entries
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "ncbigene-hgnc": { "label": "gene to symbol" },
            "ncbigene-uniprot": {},
            "pdb-uniprot": { "label": "structure to protein" },
            "pdbe-ncbigene": {}
        }"#
    }

    #[test]
    fn test_lookup() {
        let config = LinkConfig::from_json(sample_json()).unwrap();
        assert_eq!(config.len(), 4);
        assert!(config.is_linked("ncbigene", "hgnc"));
        assert!(!config.is_linked("hgnc", "ncbigene"));
        let entry = config.get("pdb", "uniprot").unwrap();
        assert_eq!(entry.label.as_deref(), Some("structure to protein"));
    }

    #[test]
    fn test_targets_of() {
        let config = LinkConfig::from_json(sample_json()).unwrap();
        assert_eq!(config.targets_of("ncbigene"), ["hgnc", "uniprot"]);
        // Exact "{source}-" prefix: "pdb" must not pick up "pdbe-…".
        assert_eq!(config.targets_of("pdb"), ["uniprot"]);
        assert!(config.targets_of("uniprot").is_empty());
    }

    #[test]
    fn test_extra_metadata_carried_through() {
        let config = LinkConfig::from_json(
            r#"{ "a-b": { "label": "x", "predicate": "rdfs:seeAlso" } }"#,
        )
        .unwrap();
        let entry = config.get("a", "b").unwrap();
        assert_eq!(
            entry.extra.get("predicate").and_then(|v| v.as_str()),
            Some("rdfs:seeAlso")
        );
    }
}
