//! Helpers shared by the request validators.
//!
//! Validation is performed with the [`validator`] crate. Errors are reported
//! to clients as a mapping of field names to human readable messages, with
//! errors that don't belong to a single field collected under
//! `non_field_errors`.

use std::borrow::Cow;

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

/// Key used for errors spanning more than one field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Key [`validator`] uses for errors produced by struct level validators.
const SCHEMA_ERRORS: &str = "__all__";

/// Message reported when a required field was not provided.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message reported when a text field receives a value of another type.
pub const NOT_A_STRING_MESSAGE: &str = "Not a valid string.";

/// Field errors in the shape they are sent to clients.
///
/// Fields are serialized in the order they were first added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        let field = field.into();

        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.0.push((field, vec![message.into()])),
        }
    }

    /// Collect a set of validation errors.
    ///
    /// # Arguments
    ///
    /// * `errors` - The errors reported by [`validator`].
    /// * `fields` - Field names in the order they should be reported. Fields
    ///   missing from this list follow in name order, and errors that span
    ///   several fields come last.
    pub fn ordered(errors: ValidationErrors, fields: &[&str]) -> Self {
        let mut by_field = errors.field_errors();
        let schema_errors = by_field.remove(SCHEMA_ERRORS);

        let mut unlisted: Vec<_> = by_field
            .keys()
            .copied()
            .filter(|field| !fields.contains(field))
            .collect();
        unlisted.sort_unstable();

        let mut field_errors = Self::new();
        for field in fields.iter().copied().chain(unlisted) {
            if let Some(errors) = by_field.get(field) {
                for error in errors.iter() {
                    field_errors.add(field, message_for(error));
                }
            }
        }

        for error in schema_errors.into_iter().flatten() {
            field_errors.add(NON_FIELD_ERRORS, message_for(error));
        }

        field_errors
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }

        map.end()
    }
}

fn message_for(error: &ValidationError) -> String {
    match error.message {
        Some(ref message) => message.to_string(),
        None => error.code.to_string(),
    }
}

/// Build a validation error with a client facing message.
pub fn invalid<M: Into<Cow<'static, str>>>(code: &'static str, message: M) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());

    error
}

/// Read the text of a field that should hold a string.
///
/// Numbers are accepted and read as the text they were written with. Any
/// other type of value is rejected.
pub fn text_value(value: &Value) -> Result<Cow<'_, str>, ValidationError> {
    match value {
        Value::String(text) => Ok(Cow::Borrowed(text)),
        Value::Number(number) => Ok(Cow::Owned(number.to_string())),
        _ => Err(invalid("invalid", NOT_A_STRING_MESSAGE)),
    }
}

/// Ensure a text value is not blank and does not exceed a maximum number of
/// characters once surrounding whitespace is removed.
pub fn check_text(value: &str, max_chars: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(invalid("blank", "This field may not be blank."));
    }

    check_max_chars(trimmed, max_chars)
}

/// Ensure a text value does not exceed a maximum number of characters.
pub fn check_max_chars(value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() > max_chars {
        return Err(invalid(
            "max_length",
            format!(
                "Ensure this field has no more than {} characters.",
                max_chars
            ),
        ));
    }

    Ok(())
}
