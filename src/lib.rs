//! # schema-index — Portable Index Naming for Schema Layers
//!
//! Derives stable, engine-portable names for multi-column indexes and renders
//! the DDL to create and drop them.
//!
//! ## Design Principles
//!
//! 1. **Names are pure**: `(table, columns, type)` → name, nothing else
//! 2. **30-char ceiling**: every generated name fits the strictest backend
//! 3. **Late binding**: an `Index` is declared first, attached to its table later
//! 4. **Editor owns dialect**: quoting and templates come from `SchemaEditor`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use schema_index::{Index, TableMeta, StandardEditor};
//!
//! # fn example() -> schema_index::Result<()> {
//! let table = Arc::new(TableMeta::new("model_indexes_book"));
//! let index = Index::new(["author", "title"])?.with_table(table);
//!
//! assert_eq!(index.name()?, "model_index_author_de9d81_idx");
//!
//! let sql = index.statements(&StandardEditor::new())?;
//! assert_eq!(
//!     sql.create,
//!     r#"CREATE INDEX "model_index_author_de9d81_idx" ON "model_indexes_book" ("author", "title")"#
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod index;
pub mod sql;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::TableMeta;

pub use index::{
    Index, IndexKind, Deconstructed, Fields,
    NamingPolicy, generate_name, generate_name_with,
    MAX_NAME_LENGTH,
};

pub use sql::{SchemaEditor, StandardEditor, SqlTemplate, IndexStatements};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Not bound: {0}")]
    NotBound(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
