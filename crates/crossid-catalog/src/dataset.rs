//! Database catalogue registry.
//!
//! Loaded once from `dataset.json` and immutable afterwards. Entry order in
//! the file is preserved for display.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crossid_core::table::{FormatTemplate, TableHeading};

use crate::error::CatalogError;

/// One catalogued database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbEntry {
    /// Display name, e.g. "NCBI Gene"
    pub label: String,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub description_ja: Option<String>,
    /// URL prefix resolving a raw id, e.g. "https://www.ncbi.nlm.nih.gov/gene/"
    pub prefix: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub organization_en: Option<String>,
    #[serde(default)]
    pub organization_ja: Option<String>,
    /// Example identifiers
    #[serde(default)]
    pub examples: Vec<String>,
    /// printf-style format templates offered for this database's ids,
    /// e.g. "HGNC:%s"
    #[serde(default)]
    pub formats: Vec<String>,
}

/// Database key → entry, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbCatalog {
    entries: IndexMap<String, DbEntry>,
}

impl DbCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: DbCatalog = serde_json::from_str(json)?;
        for (key, entry) in &catalog.entries {
            if entry.prefix.is_empty() {
                warn!(key = %key, "catalogue entry has an empty URL prefix");
            }
        }
        info!(databases = catalog.entries.len(), "database catalogue loaded");
        Ok(catalog)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn get(&self, key: &str) -> Option<&DbEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DbEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table heading for one database column.
    pub fn heading(&self, key: &str) -> Result<TableHeading, CatalogError> {
        let entry = self
            .get(key)
            .ok_or_else(|| CatalogError::UnknownDatabase(key.to_string()))?;
        Ok(TableHeading {
            label: entry.label.clone(),
            prefix: entry.prefix.clone(),
            category: entry.category.clone(),
        })
    }

    /// Format templates for one database column.
    pub fn templates(&self, key: &str) -> Result<Vec<FormatTemplate>, CatalogError> {
        let entry = self
            .get(key)
            .ok_or_else(|| CatalogError::UnknownDatabase(key.to_string()))?;
        Ok(entry.formats.iter().map(FormatTemplate::new).collect())
    }

    /// Headings for a traversed route of database keys.
    pub fn route_headings(&self, route: &[String]) -> Result<Vec<TableHeading>, CatalogError> {
        route.iter().map(|key| self.heading(key)).collect()
    }

    /// Per-column format templates for a traversed route.
    pub fn route_templates(
        &self,
        route: &[String],
    ) -> Result<Vec<Vec<FormatTemplate>>, CatalogError> {
        route.iter().map(|key| self.templates(key)).collect()
    }
}
