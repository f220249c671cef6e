//! Identifier pattern registry.
//!
//! A fixed table of named ID-pattern regexes, compiled and validated once at
//! startup and immutable afterwards. Matching is full-string: every pattern
//! is wrapped as `^(?:…)$` at compile time, so a pattern like `rs\d+` cannot
//! match in the middle of a longer token.
//!
//! Compilation failures surface at load time, never during classification.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CrossidError, Result};

/// One row of the pattern table, as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Namespace key, e.g. "ncbigene"
    pub name: String,
    /// Human-readable database name, e.g. "NCBI Gene"
    pub label: String,
    /// Uncompiled regex source
    pub regexp: String,
}

impl PatternEntry {
    pub fn new(name: &str, label: &str, regexp: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            regexp: regexp.to_string(),
        }
    }
}

/// A pattern entry with its compiled, anchored regex.
#[derive(Debug)]
pub struct CompiledPattern {
    pub name: String,
    pub label: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Full-string match of `id` against this pattern.
    pub fn is_match(&self, id: &str) -> bool {
        self.regex.is_match(id)
    }
}

/// Registry of compiled patterns, in declaration order.
///
/// Declaration order matters: classification ties are broken by first-seen
/// order, which follows the order patterns are tested in.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Compile a pattern table. Fails on the first invalid regex.
    pub fn from_entries(entries: &[PatternEntry]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(entries.len());
        for entry in entries {
            patterns.push(CompiledPattern {
                name: entry.name.clone(),
                label: entry.label.clone(),
                regex: compile_full_match(&entry.name, &entry.regexp)?,
            });
        }
        tracing::debug!(count = patterns.len(), "pattern registry compiled");
        Ok(Self { patterns })
    }

    /// The built-in pattern table (see [`builtin_entries`]).
    pub fn builtin() -> &'static PatternRegistry {
        &BUILTIN
    }

    pub fn get(&self, name: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile_full_match(name: &str, regexp: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{regexp})$")).map_err(|source| CrossidError::Pattern {
        name: name.to_string(),
        source,
    })
}

lazy_static! {
    static ref BUILTIN: PatternRegistry = PatternRegistry::from_entries(&builtin_entries())
        .expect("built-in pattern table must compile");
}

/// The default namespace pattern table.
///
/// Regex sources follow the identifiers.org entry patterns for each
/// database. Note that several are intentionally broad (ncbigene and
/// clinvar are both all-digit, ncbiprotein overlaps uniprot): an input id
/// fans out to every namespace it matches.
pub fn builtin_entries() -> Vec<PatternEntry> {
    vec![
        PatternEntry::new("ncbigene", "NCBI Gene", r"\d+"),
        PatternEntry::new("kegg.genes", "KEGG Genes", r"\w+:[\w\d.\-]*"),
        PatternEntry::new("hgnc", "HGNC", r"((HGNC|hgnc):)?\d{1,5}"),
        PatternEntry::new("dbsnp", "dbSNP", r"rs\d+"),
        PatternEntry::new("clinvar", "ClinVar Variant", r"\d+"),
        PatternEntry::new(
            "uniprot",
            "UniProt Knowledgebase",
            r"([A-N,R-Z][0-9]([A-Z][A-Z, 0-9][A-Z, 0-9][0-9]){1,2})|([O,P,Q][0-9][A-Z, 0-9][A-Z, 0-9][A-Z, 0-9][0-9])(\.\d+)?",
        ),
        PatternEntry::new("ncbiprotein", "NCBI Protein", r"(\w+\d+(\.\d+)?)|(NP_\d+)"),
        PatternEntry::new("pdb", "Protein Data Bank", r"[0-9][A-Za-z0-9]{3}"),
        PatternEntry::new("interpro", "InterPro", r"IPR\d{6}"),
        PatternEntry::new("pfam", "Pfam", r"PF\d{5}"),
        PatternEntry::new("intact", "IntAct", r"EBI-[0-9]+"),
    ]
}
