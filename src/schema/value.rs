//! Native field values
//!
//! `FieldValue` is the in-memory form a field takes once it has been
//! coerced. Map views hand these out unchanged; text views render them
//! through `to_json`.

use std::fmt::Write;

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use crate::record::AutomobileType;

/// ISO calendar date format used when feeding values back into validation
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A coerced field value in its native type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Uuid(Uuid),
    Date(NaiveDate),
    Kind(AutomobileType),
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Renders the value as JSON, formatting dates with `date_format`.
    ///
    /// The format is checked when configuration is loaded; should rendering
    /// still fail the ISO form is used.
    pub fn to_json(&self, date_format: &str) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::Uuid(id) => Value::String(id.hyphenated().to_string()),
            FieldValue::Date(d) => Value::String(format_date(*d, date_format)),
            FieldValue::Kind(kind) => Value::String(kind.display_name().to_string()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        value.to_json(ISO_DATE_FORMAT)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<AutomobileType> for FieldValue {
    fn from(value: AutomobileType) -> Self {
        FieldValue::Kind(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        return date.format(ISO_DATE_FORMAT).to_string();
    }
    out
}
