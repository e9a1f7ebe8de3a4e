//! # SQL Rendering
//!
//! Turns a resolved index into `CREATE INDEX` / `DROP INDEX` text. Quoting,
//! tablespace syntax and statement templates come from a [`SchemaEditor`];
//! nothing here talks to a database.
//!
//! ## Placeholders
//!
//! | Placeholder | Create | Drop | Value |
//! |-------------|--------|------|-------|
//! | `{table}`   | yes    | yes  | quoted table name |
//! | `{name}`    | yes    | yes  | quoted index name |
//! | `{columns}` | yes    | no   | quoted columns, `", "`-joined |
//! | `{extra}`   | yes    | no   | `" TABLESPACE …"` or empty |

pub mod template;

pub use template::SqlTemplate;

use crate::model::TableMeta;
use crate::Result;

// ============================================================================
// SchemaEditor Trait
// ============================================================================

/// Backend-specific primitives the renderer needs.
pub trait SchemaEditor {
    /// Quote an identifier for this backend.
    fn quote_name(&self, name: &str) -> String;

    /// Clause placing an object in `tablespace`, without leading space.
    fn tablespace_sql(&self, tablespace: &str) -> String;

    fn sql_create_index(&self) -> &SqlTemplate;

    fn sql_delete_index(&self) -> &SqlTemplate;
}

/// Rendered DDL for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatements {
    pub create: String,
    pub drop: String,
}

/// Render the create statement for an index named `name` over `columns`.
pub fn create_index_sql<E, S>(
    editor: &E,
    table: &TableMeta,
    name: &str,
    columns: &[S],
) -> Result<String>
where
    E: SchemaEditor + ?Sized,
    S: AsRef<str>,
{
    let extra = match table.index_tablespace(columns) {
        Some(tablespace) => {
            let clause = editor.tablespace_sql(tablespace);
            if clause.is_empty() { clause } else { format!(" {clause}") }
        }
        None => String::new(),
    };
    let columns = columns
        .iter()
        .map(|column| editor.quote_name(column.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");

    let quoted_table = editor.quote_name(&table.db_table);
    let quoted_name = editor.quote_name(name);

    editor.sql_create_index().render(&[
        ("table", quoted_table.as_str()),
        ("name", quoted_name.as_str()),
        ("columns", columns.as_str()),
        ("extra", extra.as_str()),
    ])
}

/// Render the drop statement for the index named `name`.
pub fn drop_index_sql<E>(editor: &E, table: &TableMeta, name: &str) -> Result<String>
where
    E: SchemaEditor + ?Sized,
{
    let quoted_table = editor.quote_name(&table.db_table);
    let quoted_name = editor.quote_name(name);

    editor.sql_delete_index().render(&[
        ("table", quoted_table.as_str()),
        ("name", quoted_name.as_str()),
    ])
}

// ============================================================================
// StandardEditor
// ============================================================================

/// ANSI-style editor: double-quoted identifiers, `TABLESPACE` clauses.
#[derive(Debug, Clone)]
pub struct StandardEditor {
    create_index: SqlTemplate,
    delete_index: SqlTemplate,
}

impl StandardEditor {
    pub const CREATE_INDEX: &'static str = "CREATE INDEX {name} ON {table} ({columns}){extra}";
    pub const DELETE_INDEX: &'static str = "DROP INDEX {name}";

    pub fn new() -> Self {
        Self {
            create_index: SqlTemplate::new(Self::CREATE_INDEX),
            delete_index: SqlTemplate::new(Self::DELETE_INDEX),
        }
    }

    pub fn with_create_index(mut self, template: SqlTemplate) -> Self {
        self.create_index = template;
        self
    }

    pub fn with_delete_index(mut self, template: SqlTemplate) -> Self {
        self.delete_index = template;
        self
    }
}

impl Default for StandardEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEditor for StandardEditor {
    fn quote_name(&self, name: &str) -> String {
        if name.len() > 1 && name.starts_with('"') && name.ends_with('"') {
            return name.to_string();
        }
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn tablespace_sql(&self, tablespace: &str) -> String {
        format!("TABLESPACE {}", self.quote_name(tablespace))
    }

    fn sql_create_index(&self) -> &SqlTemplate {
        &self.create_index
    }

    fn sql_delete_index(&self) -> &SqlTemplate {
        &self.delete_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_name() {
        let editor = StandardEditor::new();
        assert_eq!(editor.quote_name("book"), "\"book\"");
        assert_eq!(editor.quote_name("\"book\""), "\"book\"");
        assert_eq!(editor.quote_name("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_create_without_tablespace() {
        let editor = StandardEditor::new();
        let table = TableMeta::new("book");
        let sql = create_index_sql(&editor, &table, "book_idx", &["author", "title"]).unwrap();
        assert_eq!(sql, "CREATE INDEX \"book_idx\" ON \"book\" (\"author\", \"title\")");
    }

    #[test]
    fn test_create_with_column_tablespace() {
        let editor = StandardEditor::new();
        let table = TableMeta::new("book").with_column_tablespace("title", "fast");
        let sql = create_index_sql(&editor, &table, "book_idx", &["title"]).unwrap();
        assert_eq!(
            sql,
            "CREATE INDEX \"book_idx\" ON \"book\" (\"title\") TABLESPACE \"fast\""
        );
    }

    #[test]
    fn test_drop() {
        let editor = StandardEditor::new();
        let table = TableMeta::new("book");
        assert_eq!(drop_index_sql(&editor, &table, "book_idx").unwrap(), "DROP INDEX \"book_idx\"");
    }

    struct NoTablespaces(StandardEditor);

    impl SchemaEditor for NoTablespaces {
        fn quote_name(&self, name: &str) -> String {
            self.0.quote_name(name)
        }
        fn tablespace_sql(&self, _tablespace: &str) -> String {
            String::new()
        }
        fn sql_create_index(&self) -> &SqlTemplate {
            self.0.sql_create_index()
        }
        fn sql_delete_index(&self) -> &SqlTemplate {
            self.0.sql_delete_index()
        }
    }

    #[test]
    fn test_empty_tablespace_clause_adds_no_space() {
        let editor = NoTablespaces(StandardEditor::new());
        let table = TableMeta::new("book").with_tablespace("slow");
        let sql = create_index_sql(&editor, &table, "book_idx", &["title"]).unwrap();
        assert!(sql.ends_with("(\"title\")"));
    }
}
