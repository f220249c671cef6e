//! crossid-catalog — Static configuration registries.
//!
//! Two read-only registries loaded once at startup:
//! - the database catalogue (`dataset.json`): database key → label,
//!   descriptions, URL prefix, category, organization, example ids
//! - the link configuration (`config.json`): `"{source}-{target}"` →
//!   link metadata, from which direct linkability is derived

pub mod dataset;
pub mod error;
pub mod links;

pub use dataset::{DbCatalog, DbEntry};
pub use error::CatalogError;
pub use links::{LinkConfig, LinkEntry};
