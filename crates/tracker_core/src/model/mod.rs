//! Tracker domain model.
//!
//! # Responsibility
//! - Define the entity and junction records persisted by the store.
//! - Validate writable fields before they reach SQL.
//!
//! # Invariants
//! - Every entity is identified by a store-assigned integer id.
//! - Calendar dates are persisted as `YYYY-MM-DD` text.
//! - Input parsing reports the first offending field only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod link;
pub mod milestone;
pub mod project;
pub mod risk;
pub mod task;
pub mod team;

/// Store-assigned row identifier shared by every entity table.
pub type EntityId = i64;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Returns whether `value` has the `YYYY-MM-DD` shape accepted by the store.
///
/// Only the shape is checked; `2024-02-31` passes.
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE_RE.is_match(value)
}

/// Field-level validation failure for entity and junction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Request body is not a JSON object.
    NotAnObject,
    /// Required field is absent or has the wrong type/shape.
    InvalidField(&'static str),
    /// Optional `description` is present but not a string.
    InvalidDescription,
    /// Task progress outside `[0, 100]`.
    ProgressOutOfRange,
    /// Dependency points at its own source.
    SelfDependency,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "Request body must be a JSON object"),
            Self::InvalidField(field) => write!(f, "Invalid or missing {field}"),
            Self::InvalidDescription => write!(f, "Invalid description"),
            Self::ProgressOutOfRange => write!(f, "Progress must be between 0 and 100"),
            Self::SelfDependency => write!(f, "Dependency source and target must differ"),
        }
    }
}

impl Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Typed accessor over one JSON request object.
///
/// A field with the wrong JSON type is
/// reported exactly like a missing field.
pub(crate) struct JsonFields<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> JsonFields<'a> {
    pub(crate) fn new(value: &'a Value) -> ValidationResult<Self> {
        value
            .as_object()
            .map(|object| Self { object })
            .ok_or(ValidationError::NotAnObject)
    }

    pub(crate) fn string(&self, field: &'static str) -> ValidationResult<String> {
        self.object
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ValidationError::InvalidField(field))
    }

    pub(crate) fn date(&self, field: &'static str) -> ValidationResult<String> {
        let value = self.string(field)?;
        if is_iso_date(&value) {
            Ok(value)
        } else {
            Err(ValidationError::InvalidField(field))
        }
    }

    pub(crate) fn number(&self, field: &'static str) -> ValidationResult<f64> {
        self.optional_number(field)?
            .ok_or(ValidationError::InvalidField(field))
    }

    /// `None` when the field is absent or `null`; error when it has another type.
    pub(crate) fn optional_number(&self, field: &'static str) -> ValidationResult<Option<f64>> {
        match self.object.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or(ValidationError::InvalidField(field)),
        }
    }

    /// Integer field; integral floats such as `3.0` are accepted.
    pub(crate) fn id(&self, field: &'static str) -> ValidationResult<i64> {
        self.object
            .get(field)
            .and_then(integral)
            .ok_or(ValidationError::InvalidField(field))
    }

    pub(crate) fn optional_id(&self, field: &'static str) -> ValidationResult<Option<i64>> {
        match self.object.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => integral(value)
                .map(Some)
                .ok_or(ValidationError::InvalidField(field)),
        }
    }

    pub(crate) fn description(&self) -> ValidationResult<Option<String>> {
        match self.object.get("description") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(ValidationError::InvalidDescription),
        }
    }
}

pub(crate) fn ensure_date(field: &'static str, value: &str) -> ValidationResult<()> {
    if is_iso_date(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidField(field))
    }
}

fn integral(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    let float = value.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}
