//! Schema registry
//!
//! Databases, their tables, and the CREATE TABLE importer.

pub mod sql;
pub mod store;

pub use sql::parse_create_table;
pub use store::SchemaRegistry;
