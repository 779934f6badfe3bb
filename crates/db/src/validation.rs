use std::{fmt::Display, str::FromStr};

use strum::IntoEnumIterator;
use thiserror::Error;

/// One or more field violations found before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join(", "))]
pub struct ValidationError(pub Vec<String>);

impl ValidationError {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Payloads that can report their own violations.
pub trait Validate {
    /// Human-readable violations; empty means valid.
    fn validate(&self) -> Vec<String>;

    fn ensure_valid(&self) -> Result<(), ValidationError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(errors))
        }
    }
}

pub(crate) fn require_text(value: &str, message: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(message.to_string());
    }
}

/// Patch variant of [`require_text`]: only checks when the field is present.
pub(crate) fn reject_blank(value: Option<&str>, field: &str, errors: &mut Vec<String>) {
    if value.is_some_and(|v| v.trim().is_empty()) {
        errors.push(format!("{field} cannot be empty"));
    }
}

pub(crate) fn require_id<T>(value: Option<&T>, message: &str, errors: &mut Vec<String>) {
    if value.is_none() {
        errors.push(message.to_string());
    }
}

/// Checks `value` against every variant of `E`.
pub(crate) fn check_enum<E>(value: Option<&str>, field: &str, errors: &mut Vec<String>)
where
    E: FromStr + IntoEnumIterator + Display,
{
    if let Some(raw) = value
        && E::from_str(raw).is_err()
    {
        errors.push(format!(
            "Invalid {field}: {raw}. Must be one of: {}",
            allowed_values::<E>().join(", ")
        ));
    }
}

pub fn allowed_values<E: IntoEnumIterator + Display>() -> Vec<String> {
    E::iter().map(|variant| variant.to_string()).collect()
}

/// Parse a value that has already passed [`check_enum`].
pub(crate) fn parse_or_default<E: FromStr + Default>(value: Option<&str>) -> E {
    value.and_then(|raw| raw.parse().ok()).unwrap_or_default()
}

/// Trim, drop blanks and de-duplicate while keeping first-seen order.
pub(crate) fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|existing| existing == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// `#rgb` or `#rrggbb`.
pub(crate) fn check_color(value: Option<&str>, errors: &mut Vec<String>) {
    if let Some(color) = value {
        let valid = color
            .strip_prefix('#')
            .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
        if !valid {
            errors.push(format!("Invalid color: {color}. Expected #rgb or #rrggbb"));
        }
    }
}
