use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::validation::{
    check_max_chars, check_text, text_value, FieldErrors, NOT_A_STRING_MESSAGE, REQUIRED_MESSAGE,
};

pub const CATEGORY_CODE_MAX_CHARS: usize = 20;
pub const NAME_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// A stored category.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Category {
    pub category_code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Data for a new category provided by a client.
///
/// Fields are kept as raw JSON so that values of the wrong type are reported
/// against the field they were sent in.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct NewCategoryData {
    #[validate(
        required(message = "This field is required."),
        custom = "validate_category_code"
    )]
    pub category_code: Option<Value>,

    #[validate(required(message = "This field is required."), custom = "validate_name")]
    pub name: Option<Value>,

    #[validate(custom = "validate_description")]
    pub description: Option<Value>,
}

impl NewCategoryData {
    /// Fields in the order their errors are reported.
    const FIELDS: &'static [&'static str] = &["category_code", "name", "description"];
}

fn validate_category_code(code: &Value) -> Result<(), ValidationError> {
    check_text(&text_value(code)?, CATEGORY_CODE_MAX_CHARS)
}

fn validate_name(name: &Value) -> Result<(), ValidationError> {
    check_text(&text_value(name)?, NAME_MAX_CHARS)
}

fn validate_description(description: &Value) -> Result<(), ValidationError> {
    check_max_chars(&text_value(description)?, DESCRIPTION_MAX_CHARS)
}

/// A category that has passed validation and is ready to be stored.
///
/// Category codes are not required to be unique.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewCategory {
    category_code: String,
    name: String,
    description: Option<String>,
}

impl NewCategory {
    /// Construct a new category from a set of input data.
    ///
    /// Surrounding whitespace is removed from every field.
    ///
    /// # Returns
    ///
    /// The new category if the data is valid, or the [`FieldErrors`]
    /// describing every invalid field otherwise.
    pub fn from_data(data: NewCategoryData) -> Result<Self, FieldErrors> {
        if let Err(validation_error) = data.validate() {
            debug!(?validation_error, "New category failed validation.");

            return Err(FieldErrors::ordered(
                validation_error,
                NewCategoryData::FIELDS,
            ));
        }

        let description = match data.description {
            Some(description) => Some(text_field("description", &description)?),
            None => None,
        };

        Ok(Self {
            category_code: required_text_field("category_code", data.category_code)?,
            name: required_text_field("name", data.name)?,
            description,
        })
    }

    pub fn category_code(&self) -> &str {
        &self.category_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn text_field(field: &'static str, value: &Value) -> Result<String, FieldErrors> {
    text_value(value)
        .map(|text| text.trim().to_owned())
        .map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.add(field, NOT_A_STRING_MESSAGE);

            errors
        })
}

fn required_text_field(field: &'static str, value: Option<Value>) -> Result<String, FieldErrors> {
    match value {
        Some(value) => text_field(field, &value),
        None => {
            let mut errors = FieldErrors::new();
            errors.add(field, REQUIRED_MESSAGE);

            Err(errors)
        }
    }
}
