//! Resource domain rules: name validation, update preconditions and the
//! list filter.
//!
//! Both the HTTP handlers and the client-side editor run names through
//! [`validate_name`] so the two sides reject exactly the same input.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Entity name used in error messages.
pub const ENTITY: &str = "Resource";

/// Message returned when a create (or editor submit) has no usable name.
pub const NAME_REQUIRED: &str = "Name is required.";

/// Message returned when an update carries neither mutable field.
pub const EMPTY_UPDATE: &str = "No update data provided. Provide name or description.";

/// Validate a resource name, returning it trimmed.
///
/// Missing, empty and whitespace-only names are rejected.
pub fn validate_name(name: Option<&str>) -> Result<String, CoreError> {
    match name.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(CoreError::Validation(NAME_REQUIRED.to_string())),
    }
}

/// Validate the payload of a partial update.
///
/// At least one of `name` / `description` must be supplied. An explicit
/// `null` description (`Some(None)`) counts as supplied and clears the
/// field. A supplied name must pass [`validate_name`]; the returned value is
/// the trimmed name, if any.
pub fn validate_update(
    name: Option<&str>,
    description: Option<Option<&str>>,
) -> Result<Option<String>, CoreError> {
    if name.is_none() && description.is_none() {
        return Err(CoreError::Validation(EMPTY_UPDATE.to_string()));
    }
    name.map(|n| validate_name(Some(n))).transpose()
}

/// Case-insensitive substring filter for listing resources.
///
/// Doubles as the `?name=&description=` query string on both the server
/// (deserialized) and the client (serialized). Empty fields impose no
/// constraint and are not sent over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFilter {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub description: Option<String>,
}

impl ResourceFilter {
    /// The name fragment to match, if it constrains the result.
    pub fn name_fragment(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    /// The description fragment to match, if it constrains the result.
    pub fn description_fragment(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    /// Whether no field constrains the result.
    pub fn is_empty(&self) -> bool {
        self.name_fragment().is_none() && self.description_fragment().is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    non_empty(value.as_deref()).is_none()
}

/// Build an `ILIKE` pattern matching `fragment` anywhere in the column.
///
/// `\`, `%` and `_` are escaped so the fragment is matched literally
/// (PostgreSQL's default `LIKE` escape character is `\`).
pub fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
