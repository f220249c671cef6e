//! Result table projection.
//!
//! Takes the raw rectangular result of a bulk conversion query (rows of id
//! chains, one column per database on the traversed route) and derives the
//! table actually shown: every cell is enriched with formatted variants and
//! a resolved URL, then the table is reshaped for the requested display
//! mode. Projection is a pure function of its inputs; nothing is cached or
//! mutated between calls.
//!
//! Two cell flavors exist. In normal mode a cell holds one id (or none).
//! In compact mode the query returns whitespace-joined id groups, so a cell
//! holds a list of ids and every derived key holds a parallel list.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fixed cell key holding the raw id.
pub const ID_KEY: &str = "id";
/// Fixed cell key holding the resolved URL.
pub const URL_KEY: &str = "url";

/// One column of the result table, sourced from the traversed route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHeading {
    /// Column title, e.g. "NCBI Gene"
    pub label: String,
    /// URL prefix prepended to a raw id, e.g. "https://www.ncbi.nlm.nih.gov/gene/"
    pub prefix: String,
    /// Database category, e.g. "Gene"
    #[serde(default)]
    pub category: Option<String>,
}

/// A printf-style single-argument format template.
///
/// `%s` is replaced by the id, `%%` escapes a literal percent. The template
/// source doubles as the cell key it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatTemplate(String);

impl FormatTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The cell key this template writes to (its own source text).
    pub fn key(&self) -> &str {
        &self.0
    }

    /// Substitute `id` into the template.
    pub fn apply(&self, id: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + id.len());
        let mut rest = self.0.as_str();
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos + 1..];
            match rest.chars().next() {
                Some('s') => {
                    out.push_str(id);
                    rest = &rest[1..];
                }
                Some('%') => {
                    out.push('%');
                    rest = &rest[1..];
                }
                Some(c) => {
                    out.push('%');
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
                None => {
                    out.push('%');
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// A cell value: one optional id-derived string, or a list in compact mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    One(Option<String>),
    Many(Vec<String>),
}

impl CellValue {
    /// Whether the value is non-empty ("truthy" filter used by the
    /// all/pair/target projections).
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::One(v) => v.as_deref().is_some_and(|s| !s.is_empty()),
            CellValue::Many(v) => !v.is_empty(),
        }
    }

    /// Render for display or CSV: compact lists are space-joined.
    pub fn display(&self) -> String {
        match self {
            CellValue::One(v) => v.clone().unwrap_or_default(),
            CellValue::Many(v) => v.join(" "),
        }
    }

    fn values(&self) -> Vec<String> {
        match self {
            CellValue::One(Some(s)) => vec![s.clone()],
            CellValue::One(None) => vec![],
            CellValue::Many(v) => v.clone(),
        }
    }
}

/// An enriched cell: insertion-ordered map from format key to value, with
/// one entry per column template followed by the fixed `id` and `url` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellRecord {
    entries: IndexMap<String, CellValue>,
}

impl CellRecord {
    /// Enrich one raw cell in normal mode.
    ///
    /// `id` keeps the raw value as-is (even an empty string); `url` and the
    /// template keys are only produced for a non-empty raw value.
    pub fn single(raw: Option<&str>, heading: &TableHeading, templates: &[FormatTemplate]) -> Self {
        let present = raw.filter(|w| !w.is_empty());
        let mut entries = IndexMap::new();
        for t in templates {
            entries.insert(t.key().to_string(), CellValue::One(present.map(|w| t.apply(w))));
        }
        entries.insert(ID_KEY.to_string(), CellValue::One(raw.map(String::from)));
        entries.insert(
            URL_KEY.to_string(),
            CellValue::One(present.map(|w| format!("{}{}", heading.prefix, w))),
        );
        Self { entries }
    }

    /// Enrich one raw cell in compact mode: the raw value is split on
    /// whitespace and every key holds one entry per token. Empty input
    /// yields empty lists, not null.
    pub fn multi(raw: Option<&str>, heading: &TableHeading, templates: &[FormatTemplate]) -> Self {
        let tokens: Vec<&str> = raw
            .filter(|w| !w.is_empty())
            .map(|w| w.split_whitespace().collect())
            .unwrap_or_default();
        let mut entries = IndexMap::new();
        for t in templates {
            entries.insert(
                t.key().to_string(),
                CellValue::Many(tokens.iter().map(|tok| t.apply(tok)).collect()),
            );
        }
        entries.insert(
            ID_KEY.to_string(),
            CellValue::Many(tokens.iter().map(|tok| tok.to_string()).collect()),
        );
        entries.insert(
            URL_KEY.to_string(),
            CellValue::Many(
                tokens
                    .iter()
                    .map(|tok| format!("{}{}", heading.prefix, tok))
                    .collect(),
            ),
        );
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.entries.get(key)
    }

    pub fn id(&self) -> Option<&CellValue> {
        self.get(ID_KEY)
    }

    pub fn url(&self) -> Option<&CellValue> {
        self.get(URL_KEY)
    }

    /// Filter predicate for the all/pair/target projections.
    pub fn url_is_present(&self) -> bool {
        self.url().is_some_and(CellValue::is_present)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Merge `other` into `self` per key with set semantics: values already
    /// seen are dropped, new values keep first-occurrence order.
    fn union_in_place(&mut self, other: &CellRecord) {
        for (key, value) in &other.entries {
            let merged = self
                .entries
                .entry(key.clone())
                .or_insert_with(|| CellValue::Many(vec![]));
            let mut acc = merged.values();
            for v in value.values() {
                if !acc.contains(&v) {
                    acc.push(v);
                }
            }
            *merged = CellValue::Many(acc);
        }
    }

    /// Dedup the values of every key in place, keeping first occurrence.
    fn dedup_values(&mut self) {
        for value in self.entries.values_mut() {
            if let CellValue::Many(v) = value {
                let mut seen = Vec::with_capacity(v.len());
                for s in v.drain(..) {
                    if !seen.contains(&s) {
                        seen.push(s);
                    }
                }
                *v = seen;
            }
        }
    }
}

/// Display shape of the projected table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Every row and column, unfiltered.
    Full,
    /// Every column; only rows whose final cell resolved.
    All,
    /// Source and target columns only.
    Pair,
    /// Target column only.
    Target,
}

/// The derived table: recomputed whenever the raw rows or mode change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedTable {
    pub heading: Vec<TableHeading>,
    pub rows: Vec<Vec<CellRecord>>,
}

impl ProjectedTable {
    pub fn empty() -> Self {
        Self {
            heading: vec![],
            rows: vec![],
        }
    }
}

/// Enrich raw rows into cell records without reshaping.
pub fn build_base_table(
    raw_rows: &[Vec<Option<String>>],
    heading: &[TableHeading],
    prefix_templates: &[Vec<FormatTemplate>],
    compact: bool,
) -> Vec<Vec<CellRecord>> {
    raw_rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(heading)
                .enumerate()
                .map(|(i, (raw, h))| {
                    let templates = prefix_templates.get(i).map(Vec::as_slice).unwrap_or(&[]);
                    let raw = raw.as_deref();
                    if compact {
                        CellRecord::multi(raw, h, templates)
                    } else {
                        CellRecord::single(raw, h, templates)
                    }
                })
                .collect()
        })
        .collect()
}

/// Project raw conversion rows into the requested display shape.
///
/// Pure: the same inputs always produce the same table.
pub fn project(
    raw_rows: &[Vec<Option<String>>],
    heading: &[TableHeading],
    prefix_templates: &[Vec<FormatTemplate>],
    mode: DisplayMode,
    compact: bool,
) -> ProjectedTable {
    let (Some(first), Some(last)) = (heading.first(), heading.last()) else {
        return ProjectedTable::empty();
    };
    let base = build_base_table(raw_rows, heading, prefix_templates, compact);

    match mode {
        DisplayMode::Full => ProjectedTable {
            heading: heading.to_vec(),
            rows: base,
        },
        DisplayMode::All => ProjectedTable {
            heading: heading.to_vec(),
            rows: base
                .into_iter()
                .filter(|row| row.last().is_some_and(CellRecord::url_is_present))
                .collect(),
        },
        DisplayMode::Pair => {
            let rows = base
                .into_iter()
                .filter(|row| row.last().is_some_and(CellRecord::url_is_present))
                .filter_map(|row| {
                    let first_cell = row.first()?.clone();
                    let last_cell = row.last()?.clone();
                    Some(vec![first_cell, last_cell])
                });
            let rows = if compact {
                // Compact pair intentionally does not deduplicate; only
                // the non-compact branch does.
                rows.collect()
            } else {
                let mut seen: Vec<(Option<CellValue>, Option<CellValue>)> = Vec::new();
                rows.filter(|pair| {
                    let key = (pair[0].url().cloned(), pair[1].url().cloned());
                    if seen.contains(&key) {
                        false
                    } else {
                        seen.push(key);
                        true
                    }
                })
                .collect()
            };
            ProjectedTable {
                heading: vec![first.clone(), last.clone()],
                rows,
            }
        }
        DisplayMode::Target => {
            let cells: Vec<CellRecord> = base
                .into_iter()
                .filter_map(|row| row.into_iter().last())
                .filter(CellRecord::url_is_present)
                .collect();
            let rows = if compact {
                aggregate_target_cells(cells)
            } else {
                let mut seen: Vec<Option<CellValue>> = Vec::new();
                cells
                    .into_iter()
                    .filter(|cell| {
                        let key = cell.url().cloned();
                        if seen.contains(&key) {
                            false
                        } else {
                            seen.push(key);
                            true
                        }
                    })
                    .map(|cell| vec![cell])
                    .collect()
            };
            ProjectedTable {
                heading: vec![last.clone()],
                rows,
            }
        }
    }
}

/// Compact target mode: merge every qualifying final cell into a single
/// aggregate row whose every key is the set union of that key's values,
/// first-occurrence order. No qualifying cells → no rows.
fn aggregate_target_cells(cells: Vec<CellRecord>) -> Vec<Vec<CellRecord>> {
    let mut iter = cells.into_iter();
    let Some(mut agg) = iter.next() else {
        return vec![];
    };
    agg.dedup_values();
    for cell in iter {
        agg.union_in_place(&cell);
    }
    vec![vec![agg]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(label: &str, prefix: &str) -> TableHeading {
        TableHeading {
            label: label.to_string(),
            prefix: prefix.to_string(),
            category: None,
        }
    }

    fn two_column_heading() -> Vec<TableHeading> {
        vec![
            heading("NCBI Gene", "https://ncbi.example/gene/"),
            heading("HGNC", "https://hgnc.example/"),
        ]
    }

    fn raw(rows: &[&[Option<&str>]]) -> Vec<Vec<Option<String>>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.map(String::from)).collect())
            .collect()
    }

    fn no_templates() -> Vec<Vec<FormatTemplate>> {
        vec![vec![], vec![]]
    }

    #[test]
    fn test_format_template_apply() {
        let t = FormatTemplate::new("HGNC:%s");
        assert_eq!(t.apply("6407"), "HGNC:6407");
        assert_eq!(FormatTemplate::new("%s").apply("x"), "x");
        assert_eq!(FormatTemplate::new("100%%-%s").apply("y"), "100%-y");
        assert_eq!(FormatTemplate::new("no placeholder").apply("z"), "no placeholder");
    }

    #[test]
    fn test_single_cell_enrichment() {
        let h = heading("HGNC", "https://hgnc.example/");
        let templates = vec![FormatTemplate::new("HGNC:%s")];
        let cell = CellRecord::single(Some("6407"), &h, &templates);
        assert_eq!(
            cell.get("HGNC:%s"),
            Some(&CellValue::One(Some("HGNC:6407".to_string())))
        );
        assert_eq!(cell.id(), Some(&CellValue::One(Some("6407".to_string()))));
        assert_eq!(
            cell.url(),
            Some(&CellValue::One(Some("https://hgnc.example/6407".to_string())))
        );
        // Key order: template keys first, then id, then url.
        assert_eq!(cell.keys().collect::<Vec<_>>(), ["HGNC:%s", "id", "url"]);

        let empty = CellRecord::single(None, &h, &templates);
        assert_eq!(empty.id(), Some(&CellValue::One(None)));
        assert_eq!(empty.url(), Some(&CellValue::One(None)));
        assert!(!empty.url_is_present());
    }

    #[test]
    fn test_multi_cell_enrichment() {
        let h = heading("HGNC", "https://hgnc.example/");
        let templates = vec![FormatTemplate::new("HGNC:%s")];
        let cell = CellRecord::multi(Some("1 2"), &h, &templates);
        assert_eq!(
            cell.get("HGNC:%s"),
            Some(&CellValue::Many(vec!["HGNC:1".to_string(), "HGNC:2".to_string()]))
        );
        assert_eq!(
            cell.url(),
            Some(&CellValue::Many(vec![
                "https://hgnc.example/1".to_string(),
                "https://hgnc.example/2".to_string(),
            ]))
        );

        // Null input yields empty lists, not null.
        let empty = CellRecord::multi(None, &h, &templates);
        assert_eq!(empty.id(), Some(&CellValue::Many(vec![])));
        assert!(!empty.url_is_present());
    }

    #[test]
    fn test_full_mode_is_identity_on_shape() {
        let rows = raw(&[
            &[Some("1"), Some("a")],
            &[Some("2"), None],
            &[Some("3"), Some("c")],
        ]);
        let table = project(&rows, &two_column_heading(), &no_templates(), DisplayMode::Full, false);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.heading.len(), 2);
    }

    #[test]
    fn test_all_mode_filters_unresolved_rows() {
        let rows = raw(&[&[Some("1"), Some("a")], &[Some("2"), None]]);
        let table = project(&rows, &two_column_heading(), &no_templates(), DisplayMode::All, false);
        assert_eq!(table.heading.len(), 2);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0].id(), Some(&CellValue::One(Some("1".to_string()))));
    }

    #[test]
    fn test_pair_mode_reduces_and_dedups() {
        let rows = raw(&[
            &[Some("a"), Some("x")],
            &[Some("a"), Some("y")],
            &[Some("a"), Some("x")],
        ]);
        let table = project(&rows, &two_column_heading(), &no_templates(), DisplayMode::Pair, false);
        assert_eq!(table.heading.len(), 2);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_compact_pair_mode_keeps_duplicates() {
        let rows = raw(&[&[Some("a"), Some("x")], &[Some("a"), Some("x")]]);
        let table = project(&rows, &two_column_heading(), &no_templates(), DisplayMode::Pair, true);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_target_mode_dedups_by_url() {
        let rows = raw(&[
            &[Some("a"), Some("x")],
            &[Some("a"), Some("y")],
            &[Some("b"), Some("x")],
        ]);
        let table =
            project(&rows, &two_column_heading(), &no_templates(), DisplayMode::Target, false);
        assert_eq!(table.heading.len(), 1);
        assert_eq!(table.heading[0].label, "HGNC");
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_identical_urls_collapse_to_one_row() {
        let rows = raw(&[
            &[Some("a"), Some("x")],
            &[Some("a"), Some("x")],
            &[Some("a"), Some("x")],
        ]);
        let table =
            project(&rows, &two_column_heading(), &no_templates(), DisplayMode::Target, false);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_compact_target_aggregates_to_set_union() {
        let rows = raw(&[&[Some("s"), Some("a b")], &[Some("s"), Some("b c")]]);
        let table =
            project(&rows, &two_column_heading(), &no_templates(), DisplayMode::Target, true);
        assert_eq!(table.rows.len(), 1);
        let agg = &table.rows[0][0];
        assert_eq!(
            agg.id(),
            Some(&CellValue::Many(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
            ]))
        );
    }

    #[test]
    fn test_compact_target_with_nothing_qualifying() {
        let rows = raw(&[&[Some("s"), None]]);
        let table =
            project(&rows, &two_column_heading(), &no_templates(), DisplayMode::Target, true);
        assert!(table.rows.is_empty());
        assert_eq!(table.heading.len(), 1);
    }

    #[test]
    fn test_empty_heading_yields_empty_table() {
        let table = project(&raw(&[&[Some("1")]]), &[], &[], DisplayMode::Full, false);
        assert!(table.heading.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_projection_is_pure() {
        let rows = raw(&[&[Some("a"), Some("x")], &[Some("b"), None]]);
        let h = two_column_heading();
        let t = no_templates();
        let once = project(&rows, &h, &t, DisplayMode::Pair, false);
        let twice = project(&rows, &h, &t, DisplayMode::Pair, false);
        assert_eq!(once, twice);
    }
}
