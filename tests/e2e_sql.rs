//! End-to-end tests for CREATE / DROP INDEX rendering.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use schema_index::{Error, Index, SchemaEditor, SqlTemplate, StandardEditor, TableMeta};

// ============================================================================
// Helper: a minimal MySQL-flavoured editor.
// ============================================================================

struct BacktickEditor {
    create_index: SqlTemplate,
    delete_index: SqlTemplate,
}

impl BacktickEditor {
    fn new() -> Self {
        Self {
            create_index: SqlTemplate::parse("CREATE INDEX {name} ON {table} ({columns}){extra}").unwrap(),
            delete_index: SqlTemplate::parse("DROP INDEX {name} ON {table}").unwrap(),
        }
    }
}

impl SchemaEditor for BacktickEditor {
    fn quote_name(&self, name: &str) -> String {
        format!("`{name}`")
    }

    fn tablespace_sql(&self, tablespace: &str) -> String {
        format!("TABLESPACE {tablespace}")
    }

    fn sql_create_index(&self) -> &SqlTemplate {
        &self.create_index
    }

    fn sql_delete_index(&self) -> &SqlTemplate {
        &self.delete_index
    }
}

// ============================================================================
// 1. Standard editor
// ============================================================================

#[test]
fn test_generated_name_statements() {
    let table = Arc::new(TableMeta::new("model_indexes_book"));
    let index = Index::new(["author", "title"]).unwrap().with_table(table);
    let sql = index.statements(&StandardEditor::new()).unwrap();

    assert_eq!(
        sql.create,
        r#"CREATE INDEX "model_index_author_de9d81_idx" ON "model_indexes_book" ("author", "title")"#
    );
    assert_eq!(sql.drop, r#"DROP INDEX "model_index_author_de9d81_idx""#);
}

#[test]
fn test_single_column_tablespace_wins() {
    let table = Arc::new(
        TableMeta::new("book")
            .with_tablespace("tbl")
            .with_column_tablespace("title", "col"),
    );
    let index = Index::named(["title"], "book_title").unwrap().with_table(table);
    assert_eq!(
        index.create_sql(&StandardEditor::new()).unwrap(),
        r#"CREATE INDEX "book_title" ON "book" ("title") TABLESPACE "col""#
    );
}

#[test]
fn test_multi_column_uses_table_tablespace() {
    let table = Arc::new(
        TableMeta::new("book")
            .with_tablespace("tbl")
            .with_column_tablespace("title", "col"),
    );
    let index = Index::named(["title", "author"], "book_title_author").unwrap().with_table(table);
    assert_eq!(
        index.create_sql(&StandardEditor::new()).unwrap(),
        r#"CREATE INDEX "book_title_author" ON "book" ("title", "author") TABLESPACE "tbl""#
    );
}

#[test]
fn test_gin_template() {
    let editor = StandardEditor::new().with_create_index(
        SqlTemplate::parse("CREATE INDEX {name} ON {table} USING gin ({columns}){extra}").unwrap(),
    );
    let table = Arc::new(TableMeta::new("postgres_tests_integerarraymodel"));
    let index = Index::named(["field"], "integer_array_model_field_gin")
        .unwrap()
        .with_table(table);
    assert_eq!(
        index.create_sql(&editor).unwrap(),
        r#"CREATE INDEX "integer_array_model_field_gin" ON "postgres_tests_integerarraymodel" USING gin ("field")"#
    );
}

// ============================================================================
// 2. Custom editor through a trait object
// ============================================================================

#[test]
fn test_dyn_editor() {
    let editor: Box<dyn SchemaEditor> = Box::new(BacktickEditor::new());
    let table = Arc::new(TableMeta::new("book").with_tablespace("slow"));
    let index = Index::named(["title"], "book_title").unwrap().with_table(table);
    let sql = index.statements(editor.as_ref()).unwrap();
    assert_eq!(sql.create, "CREATE INDEX `book_title` ON `book` (`title`) TABLESPACE slow");
    assert_eq!(sql.drop, "DROP INDEX `book_title` ON `book`");
}

// ============================================================================
// 3. Failures
// ============================================================================

#[test]
fn test_unbound_render_fails() {
    let index = Index::named(["title"], "book_title").unwrap();
    assert!(matches!(index.create_sql(&StandardEditor::new()), Err(Error::NotBound(_))));
    assert!(matches!(index.drop_sql(&StandardEditor::new()), Err(Error::NotBound(_))));
}

#[test]
fn test_bad_template_surfaces_at_render() {
    let editor = StandardEditor::new().with_delete_index(SqlTemplate::new("DROP INDEX {idx}"));
    let index = Index::named(["title"], "book_title")
        .unwrap()
        .with_table(Arc::new(TableMeta::new("book")));
    assert!(matches!(index.drop_sql(&editor), Err(Error::TemplateError(_))));
}
