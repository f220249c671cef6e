//! crossid-core — Identifier classification and result projection.
//!
//! The synchronous heart of the cross-reference explorer:
//! - Pattern registry: named ID-pattern regexes, compiled once at startup
//! - Classifier: free-text identifiers → ranked namespace candidates
//! - Session: immutable drill-down history with pure reducer transitions
//! - Table: cell enrichment and full/all/pair/target projections
//! - Export: CSV and plain-text output formatting

pub mod classify;
pub mod error;
pub mod export;
pub mod patterns;
pub mod session;
pub mod table;

// Re-export commonly used types
pub use classify::{ClassificationResult, Level};
pub use error::{CrossidError, Result};
pub use patterns::{PatternEntry, PatternRegistry};
pub use session::SessionState;
pub use table::{CellRecord, DisplayMode, FormatTemplate, ProjectedTable, TableHeading};
