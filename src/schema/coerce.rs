//! Lax coercion of JSON input values into native field values
//!
//! Both input channels (JSON text and mappings) pass through here, so they
//! accept exactly the same shapes. Strings are trimmed before anything else
//! looks at them.

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use super::errors::Violation;
use super::types::FieldType;
use super::value::FieldValue;
use crate::country;
use crate::record::AutomobileType;

const TRUE_WORDS: [&str; 6] = ["true", "yes", "on", "t", "y", "1"];
const FALSE_WORDS: [&str; 6] = ["false", "no", "off", "f", "n", "0"];

/// Coerces a non-null input value to the field's type.
///
/// `key` is the name the caller supplied and is used in the violation.
pub fn coerce(key: &str, field_type: &FieldType, value: &Value) -> Result<FieldValue, Violation> {
    match field_type {
        FieldType::String => coerce_string(key, value).map(FieldValue::Str),
        FieldType::Bool => coerce_bool(key, value),
        FieldType::Int => coerce_int(key, value),
        FieldType::Float => coerce_float(key, value),
        FieldType::Uuid4 => coerce_uuid(key, value),
        FieldType::Date => coerce_date(key, value),
        FieldType::Enum { variants } => {
            let s = value
                .as_str()
                .ok_or_else(|| Violation::type_mismatch(key, "enum", json_type_name(value)))?;
            variants
                .iter()
                .any(|name| *name == s)
                .then(|| AutomobileType::from_display_name(s))
                .flatten()
                .map(FieldValue::Kind)
                .ok_or_else(|| Violation::invalid_enum(key, variants, s))
        }
        FieldType::StringList => {
            let items = value.as_array().ok_or_else(|| {
                Violation::type_mismatch(key, "list of strings", json_type_name(value))
            })?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| coerce_string(&format!("{}[{}]", key, i), item))
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List)
        }
        FieldType::Country => {
            let name = coerce_string(key, value)?;
            country::lookup(&name)
                .map(|c| FieldValue::Str(c.name.to_string()))
                .ok_or_else(|| Violation::lookup_miss(key, &name))
        }
    }
}

fn coerce_string(key: &str, value: &Value) -> Result<String, Violation> {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| Violation::type_mismatch(key, "string", json_type_name(value)))
}

fn coerce_bool(key: &str, value: &Value) -> Result<FieldValue, Violation> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => {
            let word = s.trim().to_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Some(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };
    parsed
        .map(FieldValue::Bool)
        .ok_or_else(|| Violation::type_mismatch(key, "bool", describe(value)))
}

fn coerce_int(key: &str, value: &Value) -> Result<FieldValue, Violation> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .map(FieldValue::Int)
        .ok_or_else(|| Violation::type_mismatch(key, "int", describe(value)))
}

fn coerce_float(key: &str, value: &Value) -> Result<FieldValue, Violation> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    };
    parsed
        .map(FieldValue::Float)
        .ok_or_else(|| Violation::type_mismatch(key, "float", describe(value)))
}

fn coerce_uuid(key: &str, value: &Value) -> Result<FieldValue, Violation> {
    let text = coerce_string(key, value)?;
    let id = Uuid::parse_str(&text)
        .map_err(|_| Violation::type_mismatch(key, "uuid", format!("'{}'", text)))?;
    if id.get_version_num() != 4 {
        return Err(Violation::type_mismatch(
            key,
            "uuid version 4",
            format!("version {}", id.get_version_num()),
        ));
    }
    Ok(FieldValue::Uuid(id))
}

fn coerce_date(key: &str, value: &Value) -> Result<FieldValue, Violation> {
    let text = coerce_string(key, value)?;
    date_layout(&text)
        .and_then(|format| NaiveDate::parse_from_str(&text, format).ok())
        .map(FieldValue::Date)
        .ok_or_else(|| Violation::type_mismatch(key, "date (YYYY-MM-DD)", format!("'{}'", text)))
}

/// Parse format for zero-padded `YYYY-MM-DD` or `YYYY/MM/DD` text.
///
/// chrono accepts unpadded months and days, so the shape is checked first.
fn date_layout(text: &str) -> Option<&'static str> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let digits = [0, 1, 2, 3, 5, 6, 8, 9]
        .iter()
        .all(|&i| bytes[i].is_ascii_digit());
    match (digits, bytes[4], bytes[7]) {
        (true, b'-', b'-') => Some("%Y-%m-%d"),
        (true, b'/', b'/') => Some("%Y/%m/%d"),
        _ => None,
    }
}

/// Type name plus the offending scalar, for messages
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        Value::Number(n) => n.to_string(),
        other => json_type_name(other).to_string(),
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::ViolationKind;
    use serde_json::json;

    fn kind_of(result: Result<FieldValue, Violation>) -> ViolationKind {
        result.unwrap_err().kind
    }

    #[test]
    fn test_strings_are_trimmed() {
        let value = coerce("vin", &FieldType::String, &json!("  ABC  ")).unwrap();
        assert_eq!(value, FieldValue::Str("ABC".into()));
    }

    #[test]
    fn test_string_rejects_numbers() {
        let result = coerce("vin", &FieldType::String, &json!(123));
        assert_eq!(kind_of(result), ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_bool_lax_forms() {
        for input in [json!(true), json!("yes"), json!(" TRUE "), json!(1)] {
            assert_eq!(coerce("b", &FieldType::Bool, &input).unwrap(), FieldValue::Bool(true));
        }
        for input in [json!(false), json!("off"), json!(0)] {
            assert_eq!(coerce("b", &FieldType::Bool, &input).unwrap(), FieldValue::Bool(false));
        }
        assert!(coerce("b", &FieldType::Bool, &json!(2)).is_err());
        assert!(coerce("b", &FieldType::Bool, &json!("maybe")).is_err());
    }

    #[test]
    fn test_int_accepts_whole_floats_and_numeric_strings() {
        assert_eq!(coerce("d", &FieldType::Int, &json!(2.0)).unwrap(), FieldValue::Int(2));
        assert_eq!(coerce("d", &FieldType::Int, &json!("4")).unwrap(), FieldValue::Int(4));
        assert!(coerce("d", &FieldType::Int, &json!(2.5)).is_err());
        assert!(coerce("d", &FieldType::Int, &json!("four")).is_err());
    }

    #[test]
    fn test_float_accepts_integers() {
        assert_eq!(
            coerce("p", &FieldType::Float, &json!(93300)).unwrap(),
            FieldValue::Float(93300.0)
        );
        assert_eq!(
            coerce("p", &FieldType::Float, &json!("99.5")).unwrap(),
            FieldValue::Float(99.5)
        );
        assert!(coerce("p", &FieldType::Float, &json!("inf")).is_err());
    }

    #[test]
    fn test_dates_in_both_layouts() {
        let expected = FieldValue::Date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(coerce("d", &FieldType::Date, &json!("2023-01-01")).unwrap(), expected);
        assert_eq!(coerce("d", &FieldType::Date, &json!("2023/01/01")).unwrap(), expected);
        assert!(coerce("d", &FieldType::Date, &json!("01.01.2023")).is_err());
        assert!(coerce("d", &FieldType::Date, &json!("2023-02-30")).is_err());
    }

    #[test]
    fn test_dates_must_be_zero_padded() {
        for input in ["2023-1-1", "2023-01-1", "2023/1/01", "2023-01/01", "23-01-01", "20230101"] {
            let result = coerce("d", &FieldType::Date, &json!(input));
            assert_eq!(kind_of(result), ViolationKind::TypeMismatch, "input {:?}", input);
        }
        assert!(coerce("d", &FieldType::Date, &json!(" 2023-01-01 ")).is_ok());
    }

    #[test]
    fn test_uuid_must_be_version_4() {
        let v4 = Uuid::new_v4();
        assert_eq!(
            coerce("id", &FieldType::Uuid4, &json!(v4.to_string())).unwrap(),
            FieldValue::Uuid(v4)
        );
        let v1 = "c232ab00-9414-11ec-b3c8-9f6bdeced846";
        assert!(coerce("id", &FieldType::Uuid4, &json!(v1)).is_err());
        assert!(coerce("id", &FieldType::Uuid4, &json!("not-a-uuid")).is_err());
    }

    #[test]
    fn test_enum_is_exact() {
        let field_type = FieldType::Enum {
            variants: &["Sedan", "SUV"],
        };
        assert_eq!(
            coerce("type", &field_type, &json!("SUV")).unwrap(),
            FieldValue::Kind(AutomobileType::Suv)
        );
        assert_eq!(
            kind_of(coerce("type", &field_type, &json!("suv"))),
            ViolationKind::InvalidEnum
        );
        assert_eq!(
            kind_of(coerce("type", &field_type, &json!(3))),
            ViolationKind::TypeMismatch
        );
    }

    #[test]
    fn test_list_items_are_trimmed_and_typed() {
        let value = coerce("f", &FieldType::StringList, &json!([" GPS ", "ABS"])).unwrap();
        assert_eq!(value, FieldValue::List(vec!["GPS".into(), "ABS".into()]));
        let err = coerce("f", &FieldType::StringList, &json!(["GPS", 7])).unwrap_err();
        assert_eq!(err.field, "f[1]");
    }

    #[test]
    fn test_country_is_normalized() {
        assert_eq!(
            coerce("c", &FieldType::Country, &json!(" great britain ")).unwrap(),
            FieldValue::Str("United Kingdom".into())
        );
        let err = coerce("c", &FieldType::Country, &json!("Narnia")).unwrap_err();
        assert_eq!(err.kind, ViolationKind::LookupMiss);
        assert!(err.message.contains("Narnia"));
    }
}
