//! `{placeholder}` substitution for DDL templates.

use crate::{Error, Result};

/// Placeholders a create/drop template may reference.
pub const PLACEHOLDERS: [&str; 4] = ["table", "name", "columns", "extra"];

/// A statement template such as `DROP INDEX {name}`.
///
/// Substitution is a single left-to-right pass, so substituted values are
/// never re-scanned for placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTemplate {
    source: String,
}

impl SqlTemplate {
    /// Wrap a template without checking it. Errors surface at render time.
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Wrap a template, rejecting unknown or unterminated placeholders.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let template = Self::new(source);
        let probe: Vec<(&str, &str)> = PLACEHOLDERS.iter().map(|key| (*key, "")).collect();
        template.render(&probe)?;
        Ok(template)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Substitute `vars` into the template.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                Error::TemplateError(format!("unterminated placeholder in {:?}", self.source))
            })?;
            let key = &after[..close];
            let value = vars
                .iter()
                .find_map(|(k, v)| (*k == key).then_some(*v))
                .ok_or_else(|| {
                    Error::TemplateError(format!(
                        "unknown placeholder {{{key}}} in {:?}",
                        self.source
                    ))
                })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
