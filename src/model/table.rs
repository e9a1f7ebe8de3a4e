//! Table metadata supplied by the surrounding schema layer.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// What an index needs to know about the table it lives on.
///
/// The schema layer owns this; indexes only hold a shared reference to it
/// (see [`crate::Index::bind_to_table`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Database table name, as it appears in DDL before quoting.
    pub db_table: String,
    /// Table-level default tablespace.
    pub db_tablespace: Option<String>,
    /// Per-column tablespace overrides, keyed by column name.
    pub column_tablespaces: HashMap<String, String>,
}

impl TableMeta {
    pub fn new(db_table: impl Into<String>) -> Self {
        Self {
            db_table: db_table.into(),
            db_tablespace: None,
            column_tablespaces: HashMap::new(),
        }
    }

    pub fn with_tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.db_tablespace = Some(tablespace.into());
        self
    }

    pub fn with_column_tablespace(
        mut self,
        column: impl Into<String>,
        tablespace: impl Into<String>,
    ) -> Self {
        self.column_tablespaces.insert(column.into(), tablespace.into());
        self
    }

    pub fn column_tablespace(&self, column: &str) -> Option<&str> {
        self.column_tablespaces.get(column).map(String::as_str)
    }

    /// Tablespace an index over `columns` should be created in.
    ///
    /// A single-column index inherits its column's tablespace; otherwise the
    /// table default applies.
    pub fn index_tablespace<S: AsRef<str>>(&self, columns: &[S]) -> Option<&str> {
        if let [only] = columns {
            if let Some(ts) = self.column_tablespace(only.as_ref()) {
                return Some(ts);
            }
        }
        self.db_tablespace.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_prefers_column_tablespace() {
        let meta = TableMeta::new("books")
            .with_tablespace("tbl_space")
            .with_column_tablespace("title", "col_space");
        assert_eq!(meta.index_tablespace(&["title"]), Some("col_space"));
    }

    #[test]
    fn test_multi_column_uses_table_tablespace() {
        let meta = TableMeta::new("books")
            .with_tablespace("tbl_space")
            .with_column_tablespace("title", "col_space");
        assert_eq!(meta.index_tablespace(&["title", "author"]), Some("tbl_space"));
    }

    #[test]
    fn test_no_tablespace() {
        let meta = TableMeta::new("books");
        assert_eq!(meta.index_tablespace(&["title"]), None);
    }
}
