//! # Index Descriptors
//!
//! An [`Index`] records which columns an index covers, its kind, and an
//! optional explicit name. When no name is given one is generated from the
//! bound table (see [`naming`]) on first access and memoized.
//!
//! ```text
//! Index::new(["author", "title"])   construct (fields validated)
//!   .with_table(Arc<TableMeta>)     late-bound table reference
//!   .name()                         generated once, then cached
//!   .statements(&editor)            CREATE / DROP SQL
//! ```

pub mod naming;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::TableMeta;
use crate::sql::{self, IndexStatements, SchemaEditor};
use crate::{Error, Result};

pub use naming::{
    NamingPolicy, fingerprint, generate_name, generate_name_with,
    MAX_NAME_LENGTH, DEFAULT_HASH_WIDTH, DIGIT_MARKER,
};

/// Ordered column list of an index. Most indexes cover a handful of columns.
pub type Fields = SmallVec<[String; 4]>;

// ============================================================================
// Index kinds
// ============================================================================

/// Closed set of index variants.
///
/// Each variant carries its type tag (used in generated names and hashed into
/// the fingerprint) and the canonical path used by [`Index::deconstruct`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Plain index, backend default access method.
    #[default]
    Btree,
    /// PostgreSQL generalized inverted index.
    Gin,
}

impl IndexKind {
    pub const ALL: [IndexKind; 2] = [IndexKind::Btree, IndexKind::Gin];

    pub fn type_tag(self) -> &'static str {
        match self {
            IndexKind::Btree => "idx",
            IndexKind::Gin => "gin",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            IndexKind::Btree => "schema_index::Index",
            IndexKind::Gin => "schema_index::postgres::GinIndex",
        }
    }

    /// Short name used in diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            IndexKind::Btree => "Index",
            IndexKind::Gin => "GinIndex",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }
}

// ============================================================================
// Deconstructed form
// ============================================================================

/// Structural description of an [`Index`]: variant path plus constructor
/// arguments. Enough to rebuild an equal index via [`Index::reconstruct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deconstructed {
    pub path: String,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kwargs: BTreeMap<String, String>,
}

// ============================================================================
// Index
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameState {
    Unresolved,
    Resolved(String),
}

/// A multi-column index definition.
#[derive(Debug)]
pub struct Index {
    kind: IndexKind,
    fields: Fields,
    explicit_name: Option<String>,
    name: RwLock<NameState>,
    table: Option<Arc<TableMeta>>,
}

impl Index {
    /// Plain index over `fields`, name generated on demand.
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        Self::with_kind(IndexKind::Btree, fields, None::<String>)
    }

    /// Plain index with an explicit name.
    pub fn named(
        fields: impl IntoIterator<Item = impl Into<String>>,
        name: impl Into<String>,
    ) -> Result<Self> {
        Self::with_kind(IndexKind::Btree, fields, Some(name))
    }

    /// GIN index over `fields`, name generated on demand.
    pub fn gin(fields: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        Self::with_kind(IndexKind::Gin, fields, None::<String>)
    }

    /// Construct an index of any kind.
    ///
    /// Fails with [`Error::ConfigurationError`] when `fields` is empty, a
    /// field is an empty string, or the explicit name is longer than
    /// [`MAX_NAME_LENGTH`] or starts with `_` or a digit. An empty explicit
    /// name counts as no name.
    pub fn with_kind(
        kind: IndexKind,
        fields: impl IntoIterator<Item = impl Into<String>>,
        name: Option<impl Into<String>>,
    ) -> Result<Self> {
        let fields: Fields = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(Error::ConfigurationError(
                "at least one field is required".into(),
            ));
        }
        if fields.iter().any(String::is_empty) {
            return Err(Error::ConfigurationError(
                "index field names cannot be empty".into(),
            ));
        }

        let explicit_name = name.map(Into::into).filter(|n: &String| !n.is_empty());
        if let Some(name) = &explicit_name {
            validate_name(name)?;
        }
        let state = match &explicit_name {
            Some(name) => NameState::Resolved(name.clone()),
            None => NameState::Unresolved,
        };

        Ok(Self {
            kind,
            fields,
            explicit_name,
            name: RwLock::new(state),
            table: None,
        })
    }

    /// Builder form of [`Index::bind_to_table`].
    pub fn with_table(mut self, table: Arc<TableMeta>) -> Self {
        self.bind_to_table(table);
        self
    }

    /// Attach the table this index belongs to.
    ///
    /// Rebinding replaces the table reference but never a name that has
    /// already been resolved.
    pub fn bind_to_table(&mut self, table: Arc<TableMeta>) {
        self.table = Some(table);
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn explicit_name(&self) -> Option<&str> {
        self.explicit_name.as_deref()
    }

    pub fn table(&self) -> Option<&Arc<TableMeta>> {
        self.table.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.table.is_some()
    }

    pub fn is_name_resolved(&self) -> bool {
        matches!(*self.name.read(), NameState::Resolved(_))
    }

    /// The index name: the explicit one, or the generated one.
    ///
    /// Generation happens at most once per instance. Concurrent first calls
    /// may both compute the (identical) name; the first write wins.
    pub fn name(&self) -> Result<String> {
        if let NameState::Resolved(name) = &*self.name.read() {
            tracing::trace!(name = %name, "index name cache hit");
            return Ok(name.clone());
        }

        let table = self.bound_table()?;
        let generated = generate_name(&table.db_table, self.fields.as_slice(), self.kind.type_tag());

        let mut state = self.name.write();
        match &*state {
            NameState::Resolved(existing) => Ok(existing.clone()),
            NameState::Unresolved => {
                *state = NameState::Resolved(generated.clone());
                Ok(generated)
            }
        }
    }

    // ========================================================================
    // Deconstruction
    // ========================================================================

    pub fn deconstruct(&self) -> Deconstructed {
        let mut kwargs = BTreeMap::new();
        if let Some(name) = &self.explicit_name {
            kwargs.insert("name".to_string(), name.clone());
        }
        Deconstructed {
            path: self.kind.path().to_string(),
            args: self.fields.to_vec(),
            kwargs,
        }
    }

    /// Rebuild an index from [`Index::deconstruct`] output.
    pub fn reconstruct(parts: &Deconstructed) -> Result<Self> {
        let kind = IndexKind::from_path(&parts.path).ok_or_else(|| {
            Error::ConfigurationError(format!("unknown index type path {:?}", parts.path))
        })?;
        if let Some(key) = parts.kwargs.keys().find(|key| key.as_str() != "name") {
            return Err(Error::ConfigurationError(format!(
                "unexpected index argument {key:?}"
            )));
        }
        Self::with_kind(kind, parts.args.iter().cloned(), parts.kwargs.get("name").cloned())
    }

    /// Serialize the deconstructed form as JSON.
    pub fn to_snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.deconstruct())?)
    }

    pub fn from_snapshot(json: &str) -> Result<Self> {
        let parts: Deconstructed = serde_json::from_str(json)?;
        Self::reconstruct(&parts)
    }

    // ========================================================================
    // SQL
    // ========================================================================

    pub fn create_sql<E: SchemaEditor + ?Sized>(&self, editor: &E) -> Result<String> {
        let table = self.bound_table()?;
        sql::create_index_sql(editor, table, &self.name()?, self.fields.as_slice())
    }

    pub fn drop_sql<E: SchemaEditor + ?Sized>(&self, editor: &E) -> Result<String> {
        let table = self.bound_table()?;
        sql::drop_index_sql(editor, table, &self.name()?)
    }

    /// Both statements at once.
    pub fn statements<E: SchemaEditor + ?Sized>(&self, editor: &E) -> Result<IndexStatements> {
        Ok(IndexStatements {
            create: self.create_sql(editor)?,
            drop: self.drop_sql(editor)?,
        })
    }

    fn bound_table(&self) -> Result<&TableMeta> {
        self.table
            .as_deref()
            .ok_or_else(|| Error::NotBound(format!("{self} is not bound to a table")))
    }
}

/// Explicit names skip generation, so they are checked directly.
fn validate_name(name: &str) -> Result<()> {
    let len = naming::char_len(name);
    if len > MAX_NAME_LENGTH {
        return Err(Error::ConfigurationError(format!(
            "index names cannot be longer than {MAX_NAME_LENGTH} characters, got {len}: {name:?}"
        )));
    }
    match name.chars().next() {
        Some('_') => Err(Error::ConfigurationError(format!(
            "index names cannot start with an underscore: {name:?}"
        ))),
        Some(c) if c.is_numeric() => Err(Error::ConfigurationError(format!(
            "index names cannot start with a digit: {name:?}"
        ))),
        _ => Ok(()),
    }
}

impl Clone for Index {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            fields: self.fields.clone(),
            explicit_name: self.explicit_name.clone(),
            name: RwLock::new(self.name.read().clone()),
            table: self.table.clone(),
        }
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.deconstruct() == other.deconstruct()
    }
}

impl Eq for Index {}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}: fields=\"{}\">",
            self.kind.display_name(),
            self.fields.join(", ")
        )
    }
}
