//! Record validator
//!
//! Validation order:
//! 1. Resolve every input key to a field (aliases accepted, unknown keys and
//!    duplicates reported)
//! 2. Coerce and bound-check each field independently, trimming strings first
//! 3. Apply defaults to absent fields; absent fields without one are missing
//! 4. Evaluate cross-field rules over fields that individually passed
//! 5. Check any computed field the caller supplied against its recomputation
//!
//! Violations from every stage are accumulated. Validation is all-or-nothing:
//! either every field is accepted or a single error lists every offence.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::coerce::{coerce, json_type_name};
use super::errors::{ValidationError, ValidationResult, Violation};
use super::fields::schema_for;
use super::types::{FieldDef, Schema, SchemaProfile};
use super::value::FieldValue;

/// Stored field values of a record that passed validation, keyed by
/// internal name in schema order. Computed fields are never included.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    profile: SchemaProfile,
    values: IndexMap<&'static str, FieldValue>,
}

impl ValidatedFields {
    pub fn profile(&self) -> SchemaProfile {
        self.profile
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Removes a value, yielding `Null` for fields the profile lacks
    pub fn take(&mut self, name: &str) -> FieldValue {
        self.values.shift_remove(name).unwrap_or(FieldValue::Null)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validator enforcing one profile's schema on untrusted input.
///
/// Validator does not mutate its input.
/// Validation is deterministic apart from generated identifiers.
#[derive(Debug, Clone, Copy)]
pub struct RecordValidator {
    schema: &'static Schema,
}

impl RecordValidator {
    /// Creates a validator for the given profile.
    pub fn new(profile: SchemaProfile) -> Self {
        Self {
            schema: schema_for(profile),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Parses JSON text and validates the resulting object.
    ///
    /// # Errors
    ///
    /// Text that is not valid JSON yields a single `AUTO_MALFORMED_INPUT`
    /// violation; otherwise see [`RecordValidator::validate_map`].
    pub fn validate_json(&self, text: &str) -> ValidationResult<ValidatedFields> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ValidationError::single(Violation::malformed_input(e)))?;
        self.validate_value(&value)
    }

    /// Validates a JSON value, which must be an object.
    pub fn validate_value(&self, value: &Value) -> ValidationResult<ValidatedFields> {
        let obj = value.as_object().ok_or_else(|| {
            ValidationError::single(Violation::type_mismatch(
                "$root",
                "object",
                json_type_name(value),
            ))
        })?;
        self.validate_map(obj)
    }

    /// Validates a mapping of field names to loosely-typed values.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` listing every unknown, duplicate, missing,
    /// mistyped, out-of-bounds or inconsistent field.
    pub fn validate_map(&self, input: &Map<String, Value>) -> ValidationResult<ValidatedFields> {
        let mut violations = Vec::new();

        // Presence resolution
        let mut supplied: HashMap<&'static str, (&str, &Value)> = HashMap::new();
        for (key, value) in input {
            let Some(field) = self.schema.resolve(key) else {
                violations.push(Violation::unknown_field(key.as_str()));
                continue;
            };
            if let Some((first, _)) = supplied.get(field.name) {
                violations.push(Violation::duplicate_field(key.as_str(), first));
                continue;
            }
            trace!(field = field.name, key = key.as_str(), "resolved input field");
            supplied.insert(field.name, (key.as_str(), value));
        }

        // Per-field coercion and bounds
        let mut values: IndexMap<&'static str, FieldValue> = IndexMap::new();
        for field in self.schema.fields().iter().filter(|f| !f.is_derived()) {
            match supplied.get(field.name) {
                Some(&(key, value)) => match self.validate_field(field, key, value) {
                    Ok(accepted) => {
                        values.insert(field.name, accepted);
                    }
                    Err(violation) => violations.push(violation),
                },
                None => match &field.default {
                    Some(default) => {
                        values.insert(field.name, default.produce());
                    }
                    None => violations.push(Violation::missing_field(field.external)),
                },
            }
        }

        // Cross-field rules, only over fields that passed on their own
        for rule in self.schema.rules() {
            if rule.fields().iter().any(|name| !values.contains_key(name)) {
                continue;
            }
            if let Err(message) = rule.check(|name| values.get(name).cloned()) {
                let key = self.key_for(rule.target(), &supplied);
                violations.push(Violation::cross_field(key, message));
            }
        }

        // Computed fields echoed back from serialized output
        for field in self.schema.fields() {
            let (Some(derivation), Some(&(key, value))) = (field.derived, supplied.get(field.name))
            else {
                continue;
            };
            if !values.contains_key(derivation.source()) {
                continue;
            }
            let expected = derivation.compute(values.get(derivation.source()));
            if !matches_computed(value, &expected) {
                violations.push(Violation::cross_field(
                    key,
                    format!(
                        "computed field disagrees with {}: expected {}",
                        self.key_for(derivation.source(), &supplied),
                        Value::from(expected)
                    ),
                ));
            }
        }

        if !violations.is_empty() {
            debug!(
                profile = self.schema.profile().name(),
                violations = violations.len(),
                "record rejected"
            );
            return Err(ValidationError::new(violations));
        }

        Ok(ValidatedFields {
            profile: self.schema.profile(),
            values,
        })
    }

    /// Runs a single supplied value through coercion and its constraints.
    fn validate_field(&self, field: &FieldDef, key: &str, value: &Value) -> Result<FieldValue, Violation> {
        if value.is_null() {
            return if field.nullable {
                Ok(FieldValue::Null)
            } else {
                Err(Violation::type_mismatch(key, field.field_type.type_name(), "null"))
            };
        }

        let coerced = coerce(key, &field.field_type, value)?;
        for constraint in &field.constraints {
            constraint
                .check(&coerced)
                .map_err(|message| Violation::out_of_bounds(key, message))?;
        }
        Ok(coerced)
    }

    /// Name to report a field under: the caller's key if supplied, else external
    fn key_for(&self, name: &str, supplied: &HashMap<&'static str, (&str, &Value)>) -> String {
        supplied
            .get(name)
            .map(|(key, _)| key.to_string())
            .or_else(|| self.schema.field(name).map(|f| f.external.to_string()))
            .unwrap_or_else(|| name.to_string())
    }
}

fn matches_computed(supplied: &Value, expected: &FieldValue) -> bool {
    match (supplied, expected) {
        (Value::Null, FieldValue::Null) => true,
        (Value::String(s), FieldValue::Str(e)) => s.trim() == e,
        _ => false,
    }
}
