//! Index name generation.
//!
//! Generated names look like `<table>_<column>_<fingerprint>_<type>`:
//!
//! ```text
//! model_index_author_de9d81_idx
//! └─ table ──┘└ col ┘└ hash ┘└type
//! ```
//!
//! Only the table segment is ever truncated. The fingerprint hashes the full
//! table name, every column and the type tag, so two indexes that share a
//! table and leading column still get distinct names.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier ceiling shared by every supported backend (Oracle's limit).
pub const MAX_NAME_LENGTH: usize = 30;

/// Hex characters of the MD5 digest kept in a generated name.
pub const DEFAULT_HASH_WIDTH: usize = 6;

/// Prepended when a generated name would start with a digit.
pub const DIGIT_MARKER: char = 'D';

const MD5_HEX_LEN: usize = 32;

// ============================================================================
// Policy
// ============================================================================

/// Tunable constants of the name generator.
///
/// The defaults are what [`generate_name`] and [`crate::Index`] use. A policy
/// can also be loaded from JSON, e.g. `{"hash_width": 8}`; missing keys fall
/// back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingPolicy {
    pub max_length: usize,
    pub hash_width: usize,
    pub digit_marker: char,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            max_length: MAX_NAME_LENGTH,
            hash_width: DEFAULT_HASH_WIDTH,
            digit_marker: DIGIT_MARKER,
        }
    }
}

impl NamingPolicy {
    /// Parse and validate a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hash_width == 0 || self.hash_width > MD5_HEX_LEN {
            return Err(Error::ConfigurationError(format!(
                "hash width must be between 1 and {MD5_HEX_LEN}, got {}",
                self.hash_width
            )));
        }
        // `_` + hash + `_` + one type char, plus the digit headroom.
        let minimum = self.hash_width + 4;
        if self.max_length < minimum {
            return Err(Error::ConfigurationError(format!(
                "max name length must be at least {minimum} for a {}-char hash",
                self.hash_width
            )));
        }
        if !self.digit_marker.is_ascii_alphabetic() {
            return Err(Error::ConfigurationError(format!(
                "digit marker must be an ASCII letter, got {:?}",
                self.digit_marker
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Hex prefix of `md5(table ‖ columns… ‖ index_type)`.
pub fn fingerprint<S: AsRef<str>>(
    width: usize,
    table: &str,
    columns: &[S],
    index_type: &str,
) -> String {
    let mut hasher = Md5::new();
    hasher.update(table.as_bytes());
    for column in columns {
        hasher.update(column.as_ref().as_bytes());
    }
    hasher.update(index_type.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(width.min(MD5_HEX_LEN));
    hex
}

/// Generate an index name with the default [`NamingPolicy`].
pub fn generate_name<S: AsRef<str>>(table: &str, columns: &[S], index_type: &str) -> String {
    generate_name_with(&NamingPolicy::default(), table, columns, index_type)
}

/// Generate an index name.
///
/// Total over its inputs: a type tag so long that `_<hash>_<type>` alone
/// exceeds the ceiling produces an over-long name (logged) instead of an
/// error. Callers that hit this need shorter identifiers.
pub fn generate_name_with<S: AsRef<str>>(
    policy: &NamingPolicy,
    table: &str,
    columns: &[S],
    index_type: &str,
) -> String {
    let hash = fingerprint(policy.hash_width, table, columns, index_type);
    let table_part = identifier_part(table);
    let column_part = identifier_part(columns.first().map_or("", AsRef::as_ref));

    // Keep one char free for the digit marker.
    let ceiling = policy.max_length.saturating_sub(1);

    let mut prefix = table_part;
    let mut suffix = format!("_{column_part}_{hash}_{index_type}");
    if char_len(&suffix) >= ceiling {
        // Column too long to sit in the tail: fuse it to the table instead.
        prefix = format!("{prefix}_{column_part}");
        suffix = format!("_{hash}_{index_type}");
    }
    let budget = ceiling.saturating_sub(char_len(&suffix));
    let raw = format!("{}{suffix}", truncate_chars(&prefix, budget));
    let name = strip_reserved_start(&raw, policy.digit_marker);

    if char_len(&name) > policy.max_length {
        tracing::warn!(
            table,
            index_type,
            name = %name,
            max_length = policy.max_length,
            "generated index name exceeds the identifier ceiling"
        );
    }
    tracing::debug!(table, index_type, name = %name, "generated index name");
    name
}

/// Drop quoting artifacts that cannot appear in an unquoted identifier.
fn identifier_part(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '"' | '.')).collect()
}

/// Leading underscores are removed; a leading digit gets the marker prepended.
fn strip_reserved_start(name: &str, marker: char) -> String {
    let trimmed = name.trim_start_matches('_');
    match trimmed.chars().next() {
        Some(c) if c.is_numeric() => format!("{marker}{trimmed}"),
        _ => trimmed.to_string(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
