//! Identifier classifier.
//!
//! Matches a batch of free-text identifiers against the pattern registry and
//! produces ranked namespace candidates. Classification fans out: an id is
//! credited to every pattern it matches, not just the first.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::PatternRegistry;

/// One matched namespace within a classification or expansion level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Namespace key, e.g. "ncbigene"
    pub name: String,
    /// Number of ids credited to this namespace
    pub value: usize,
    /// The credited ids, in input order
    pub ids: Vec<String>,
}

/// One drill-down step: every namespace matched at that depth.
pub type Level = Vec<ClassificationResult>;

/// An input line that matched no pattern. Excluded from classification but
/// reported so the caller can show a per-line notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedId {
    /// 1-based input line number
    pub line: usize,
    pub id: String,
}

/// Classifier output: ranked matches plus the lines that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub matches: Level,
    pub unmatched: Vec<UnmatchedId>,
}

/// Classify a batch of identifiers against `registry`.
///
/// Every id is credited to every pattern it matches. The result is sorted
/// descending by match count; ties keep first-seen order. An empty input
/// yields an empty level.
pub fn classify(ids: &[String], registry: &PatternRegistry) -> Level {
    classify_report(ids, registry).matches
}

/// Like [`classify`], also reporting the input lines that matched nothing.
pub fn classify_report(ids: &[String], registry: &PatternRegistry) -> ClassificationReport {
    let mut pairs = Vec::new();
    let mut unmatched = Vec::new();

    for (i, id) in ids.iter().enumerate() {
        let mut hit = false;
        for pattern in registry.iter() {
            if pattern.is_match(id) {
                pairs.push((pattern.name.clone(), id.clone()));
                hit = true;
            }
        }
        if !hit {
            unmatched.push(UnmatchedId {
                line: i + 1,
                id: id.clone(),
            });
        }
    }

    let matches = aggregate(pairs);
    debug!(
        inputs = ids.len(),
        namespaces = matches.len(),
        unmatched = unmatched.len(),
        "classified input batch"
    );
    ClassificationReport { matches, unmatched }
}

/// Aggregate `(namespace, id)` pairs into a sorted level.
///
/// Shared by the classifier and the relation expander: both count ids per
/// namespace and sort descending by count with insertion-order tie-break
/// (the sort must be stable).
pub fn aggregate<I>(pairs: I) -> Level
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut level: Level = Vec::new();
    for (name, id) in pairs {
        match level.iter_mut().find(|r| r.name == name) {
            Some(r) => {
                r.value += 1;
                r.ids.push(id);
            }
            None => level.push(ClassificationResult {
                name,
                value: 1,
                ids: vec![id],
            }),
        }
    }
    // sort_by is stable: equal counts keep first-seen order.
    level.sort_by(|a, b| b.value.cmp(&a.value));
    level
}

/// Split pasted input text into identifier lines.
///
/// One id per line; trailing CR is stripped so CRLF input behaves; lines
/// that are empty after trimming are dropped.
pub fn split_input(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{PatternEntry, PatternRegistry};

    fn gene_snp_registry() -> PatternRegistry {
        PatternRegistry::from_entries(&[
            PatternEntry::new("ncbigene", "NCBI Gene", r"\d+"),
            PatternEntry::new("dbsnp", "dbSNP", r"rs\d+"),
        ])
        .unwrap()
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_counts_and_order() {
        let level = classify(&ids(&["123", "456", "rs1"]), &gene_snp_registry());
        assert_eq!(level.len(), 2);
        assert_eq!(level[0].name, "ncbigene");
        assert_eq!(level[0].value, 2);
        assert_eq!(level[0].ids, ids(&["123", "456"]));
        assert_eq!(level[1].name, "dbsnp");
        assert_eq!(level[1].value, 1);
        assert_eq!(level[1].ids, ids(&["rs1"]));
    }

    #[test]
    fn test_fan_out() {
        // "123" matches both all-digit patterns; it must be credited to both.
        let registry = PatternRegistry::from_entries(&[
            PatternEntry::new("ncbigene", "NCBI Gene", r"\d+"),
            PatternEntry::new("clinvar", "ClinVar Variant", r"\d+"),
        ])
        .unwrap();
        let level = classify(&ids(&["123"]), &registry);
        assert_eq!(level.len(), 2);
        assert!(level.iter().all(|r| r.ids == ids(&["123"])));
    }

    #[test]
    fn test_tie_break_is_first_seen_order() {
        // Both namespaces get one match; dbsnp is matched first because
        // "rs1" precedes "123" in the input, so it must sort first.
        let level = classify(&ids(&["rs1", "123"]), &gene_snp_registry());
        assert_eq!(level[0].name, "dbsnp");
        assert_eq!(level[1].name, "ncbigene");
    }

    #[test]
    fn test_empty_input_yields_empty_level() {
        assert!(classify(&[], &gene_snp_registry()).is_empty());
    }

    #[test]
    fn test_unmatched_lines_reported() {
        let report = classify_report(&ids(&["123", "???", "rs7"]), &gene_snp_registry());
        assert_eq!(report.matches.len(), 2);
        assert_eq!(
            report.unmatched,
            vec![UnmatchedId {
                line: 2,
                id: "???".to_string()
            }]
        );
    }

    #[test]
    fn test_value_tracks_id_count() {
        let level = classify(&ids(&["123", "123"]), &gene_snp_registry());
        assert_eq!(level[0].value, 2);
        assert_eq!(level[0].ids.len(), 2);
    }

    #[test]
    fn test_split_input() {
        assert_eq!(
            split_input("123\r\nrs1\n\n  456  \n"),
            ids(&["123", "rs1", "456"])
        );
        assert!(split_input("").is_empty());
    }
}
