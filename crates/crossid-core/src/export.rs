//! Export formatting.
//!
//! Produces the text handed to the UI layer's download/clipboard plumbing:
//! CSV of a projected table or of raw conversion rows, and CRLF-joined
//! plain-text id/URL lists. Nothing here touches the filesystem.

use csv::WriterBuilder;

use crate::error::Result;
use crate::table::{ProjectedTable, TableHeading};

/// CSV of a projected table: one heading row of column labels, then the
/// data rows in order. Compact cells render space-joined.
pub fn to_csv(table: &ProjectedTable) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(table.heading.iter().map(|h| h.label.as_str()))?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|cell| {
            cell.id().map(|v| v.display()).unwrap_or_default()
        }))?;
    }
    let buf = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(buf)?)
}

/// CSV straight from a bulk conversion result, before any enrichment.
/// Missing cells render as empty fields.
pub fn raw_csv(heading: &[TableHeading], rows: &[Vec<Option<String>>]) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(heading.iter().map(|h| h.label.as_str()))?;
    for row in rows {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    let buf = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(buf)?)
}

/// Plain-text id list, CRLF-joined.
pub fn id_list(ids: &[String]) -> String {
    ids.join("\r\n")
}

/// Plain-text URL list: each id prefixed with the target database's URL
/// prefix, CRLF-joined.
pub fn url_list(prefix: &str, ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("{prefix}{id}"))
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// The converted ids of the final column, one per row: the clipboard-copy
/// text of the result view.
pub fn last_column_ids(table: &ProjectedTable) -> Vec<String> {
    table
        .rows
        .iter()
        .filter_map(|row| row.last())
        .filter_map(|cell| cell.id().map(|v| v.display()))
        .collect()
}
