use std::borrow::Cow;

use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

/// Build a field error with a code, a message and the expected type (if any)
pub fn field_error(code: &'static str, message: String, expected: Option<&str>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    if let Some(expected) = expected {
        error.add_param(Cow::from("expected"), &expected);
    }
    error
}

/// Error for a request body that is not a JSON object
pub fn not_an_object() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "body",
        field_error(
            "type",
            "request body must be a JSON object".to_string(),
            Some("a JSON object"),
        ),
    );
    errors
}

/// Typed reader over a decoded JSON object
///
/// Every accessor records a field error instead of failing, so a single pass
/// over the input collects all problems at once. A key holding `null` is
/// treated the same as a missing key.
pub struct FieldReader<'a> {
    data: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a Map<String, Value>) -> Self {
        Self {
            data,
            errors: ValidationErrors::new(),
        }
    }

    fn value(&self, field: &str) -> Option<&'a Value> {
        match self.data.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    pub fn is_present(&self, field: &str) -> bool {
        self.value(field).is_some()
    }

    fn wrong_type(&mut self, field: &'static str, expected: &str) {
        self.errors.add(
            field,
            field_error("type", format!("{} must be {}", field, expected), Some(expected)),
        );
    }

    /// Plain text field
    pub fn text(&mut self, field: &'static str) -> Option<String> {
        match self.value(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.wrong_type(field, "a string");
                None
            }
        }
    }

    /// Non-negative count; accepts a JSON integer or a decimal string
    pub fn count(&mut self, field: &'static str) -> Option<u32> {
        let parsed = match self.value(field)? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.wrong_type(field, "a non-negative integer");
        }
        parsed
    }

    /// Integer carried as text; accepts a decimal string or a JSON integer
    pub fn integer_text(&mut self, field: &'static str) -> Option<String> {
        let text = match self.value(field)? {
            Value::Number(n) if n.is_u64() => Some(n.to_string()),
            Value::String(s) if s.trim().parse::<u64>().is_ok() => Some(s.clone()),
            _ => None,
        };
        if text.is_none() {
            self.wrong_type(field, "a non-negative integer");
        }
        text
    }

    /// Ordered list of strings
    pub fn text_list(&mut self, field: &'static str) -> Option<Vec<String>> {
        let list = match self.value(field)? {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };
        if list.is_none() {
            self.wrong_type(field, "a list of strings");
        }
        list
    }

    /// Record a missing-field error unless the key holds a value
    pub fn require(&mut self, field: &'static str) {
        if !self.is_present(field) {
            self.errors.add(
                field,
                field_error("required", format!("{} is required", field), None),
            );
        }
    }

    pub fn add(&mut self, field: &'static str, error: ValidationError) {
        self.errors.add(field, error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}
