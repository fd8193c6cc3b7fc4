//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string, trimmed before checks
//! - bool, int, float
//! - uuid4: version 4 identifier
//! - date: calendar date
//! - enum: one of a fixed set of display names
//! - string_list: ordered list of strings
//! - country: string normalized through the country table

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value::FieldValue;
use crate::country;

/// Revision of the automobile schema a record is validated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaProfile {
    /// Dual naming only, no bounds
    Aliased,
    /// Adds bounds, collections, registration date and ordering rule
    Constrained,
    /// Adds country normalization and the derived country code
    #[default]
    Normalized,
}

impl SchemaProfile {
    pub const ALL: [SchemaProfile; 3] = [
        SchemaProfile::Aliased,
        SchemaProfile::Constrained,
        SchemaProfile::Normalized,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchemaProfile::Aliased => "aliased",
            SchemaProfile::Constrained => "constrained",
            SchemaProfile::Normalized => "normalized",
        }
    }
}

/// Field data types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Bool,
    Int,
    Float,
    Uuid4,
    Date,
    /// Exact match against one of the display names, yielding the body type
    Enum { variants: &'static [&'static str] },
    StringList,
    /// String normalized to a canonical country name
    Country,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Uuid4 => "uuid4",
            FieldType::Date => "date",
            FieldType::Enum { .. } => "enum",
            FieldType::StringList => "list of strings",
            FieldType::Country => "country",
        }
    }
}

/// Declarative per-field bound, evaluated after coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    MinValue(f64),
    MaxValue(f64),
    MultipleOf(i64),
    MinItems(usize),
    MaxItems(usize),
    /// Length bounds applied to every list item
    ItemLength { min: usize, max: usize },
    /// Earliest accepted date
    NotBefore(NaiveDate),
}

impl Constraint {
    /// Checks a coerced value, returning a description of the violation.
    ///
    /// Constraints that do not apply to the value's type pass.
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        match (self, value) {
            (Constraint::MinLength(min), FieldValue::Str(s)) => {
                let len = s.chars().count();
                if len < *min {
                    return Err(format!("must have at least {} characters, got {}", min, len));
                }
            }
            (Constraint::MaxLength(max), FieldValue::Str(s)) => {
                let len = s.chars().count();
                if len > *max {
                    return Err(format!("must have at most {} characters, got {}", max, len));
                }
            }
            (Constraint::MinValue(min), FieldValue::Int(n)) => {
                if (*n as f64) < *min {
                    return Err(format!("must be greater than or equal to {}, got {}", min, n));
                }
            }
            (Constraint::MinValue(min), FieldValue::Float(n)) => {
                if n < min {
                    return Err(format!("must be greater than or equal to {}, got {}", min, n));
                }
            }
            (Constraint::MaxValue(max), FieldValue::Int(n)) => {
                if (*n as f64) > *max {
                    return Err(format!("must be less than or equal to {}, got {}", max, n));
                }
            }
            (Constraint::MaxValue(max), FieldValue::Float(n)) => {
                if n > max {
                    return Err(format!("must be less than or equal to {}, got {}", max, n));
                }
            }
            (Constraint::MultipleOf(step), FieldValue::Int(n)) => {
                if *step != 0 && n % step != 0 {
                    return Err(format!("must be a multiple of {}, got {}", step, n));
                }
            }
            (Constraint::MinItems(min), FieldValue::List(items)) => {
                if items.len() < *min {
                    return Err(format!("must have at least {} items, got {}", min, items.len()));
                }
            }
            (Constraint::MaxItems(max), FieldValue::List(items)) => {
                if items.len() > *max {
                    return Err(format!("must have at most {} items, got {}", max, items.len()));
                }
            }
            (Constraint::ItemLength { min, max }, FieldValue::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let len = item.chars().count();
                    if len < *min || len > *max {
                        return Err(format!(
                            "item [{}] must have between {} and {} characters, got {}",
                            i, min, max, len
                        ));
                    }
                }
            }
            (Constraint::NotBefore(floor), FieldValue::Date(d)) => {
                if d < floor {
                    return Err(format!("must be on or after {}, got {}", floor, d));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Default applied when a field is absent from the payload
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    Null,
    Bool(bool),
    Int(i64),
    /// Fresh version 4 identifier per construction
    GenerateUuid,
}

impl FieldDefault {
    /// Produces the default value; evaluated anew on every call
    pub fn produce(&self) -> FieldValue {
        match self {
            FieldDefault::Null => FieldValue::Null,
            FieldDefault::Bool(b) => FieldValue::Bool(*b),
            FieldDefault::Int(i) => FieldValue::Int(*i),
            FieldDefault::GenerateUuid => FieldValue::Uuid(Uuid::new_v4()),
        }
    }
}

/// How a computed field is derived from stored fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// ISO-3 code of the canonical country held in `source`
    CountryCode { source: &'static str },
}

impl Derivation {
    /// Internal name of the field this derivation reads
    pub fn source(&self) -> &'static str {
        match self {
            Derivation::CountryCode { source } => *source,
        }
    }

    /// Computes the derived value from the source field's value
    pub fn compute(&self, source: Option<&FieldValue>) -> FieldValue {
        match self {
            Derivation::CountryCode { .. } => source
                .and_then(FieldValue::as_str)
                .and_then(country::code_for)
                .map_or(FieldValue::Null, |code| FieldValue::Str(code.to_string())),
        }
    }
}

/// Rule evaluated over several already-valid fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// `field` must not be earlier than `other` when both are present
    DateNotBefore {
        field: &'static str,
        other: &'static str,
    },
}

impl CrossFieldRule {
    /// Internal names of every field the rule reads
    pub fn fields(&self) -> [&'static str; 2] {
        match self {
            CrossFieldRule::DateNotBefore { field, other } => [*field, *other],
        }
    }

    /// Field the violation is reported against
    pub fn target(&self) -> &'static str {
        match self {
            CrossFieldRule::DateNotBefore { field, .. } => *field,
        }
    }

    pub fn check(&self, lookup: impl Fn(&str) -> Option<FieldValue>) -> Result<(), String> {
        match self {
            CrossFieldRule::DateNotBefore { field, other } => {
                let value = lookup(*field).and_then(|v| v.as_date());
                let floor = lookup(*other).and_then(|v| v.as_date());
                if let (Some(value), Some(floor)) = (value, floor) {
                    if value < floor {
                        return Err(format!(
                            "must be on or after {} ({}), got {}",
                            other, floor, value
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Internal (snake_case) name
    pub name: &'static str,
    /// External (camelCase) name used on output
    pub external: &'static str,
    /// Additional names accepted on input only
    pub input_aliases: &'static [&'static str],
    /// Field data type
    pub field_type: FieldType,
    /// Whether `null` is an accepted value
    pub nullable: bool,
    /// Value used when absent; `None` makes the field required
    pub default: Option<FieldDefault>,
    /// Bounds checked after coercion
    pub constraints: Vec<Constraint>,
    /// Set for computed fields, which are never stored
    pub derived: Option<Derivation>,
}

impl FieldDef {
    /// Create a required field
    pub fn required(name: &'static str, external: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            external,
            input_aliases: &[],
            field_type,
            nullable: false,
            default: None,
            constraints: Vec::new(),
            derived: None,
        }
    }

    /// Create a nullable field defaulting to null
    pub fn optional(name: &'static str, external: &'static str, field_type: FieldType) -> Self {
        Self {
            nullable: true,
            default: Some(FieldDefault::Null),
            ..Self::required(name, external, field_type)
        }
    }

    /// Create a read-only computed field
    pub fn computed(name: &'static str, external: &'static str, derivation: Derivation) -> Self {
        Self {
            nullable: true,
            derived: Some(derivation),
            ..Self::required(name, external, FieldType::String)
        }
    }

    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.input_aliases = aliases;
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds inclusive string length bounds
    pub fn with_length(self, min: usize, max: usize) -> Self {
        self.with_constraint(Constraint::MinLength(min))
            .with_constraint(Constraint::MaxLength(max))
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && self.derived.is_none()
    }

    pub fn is_derived(&self) -> bool {
        self.derived.is_some()
    }

    /// Every name accepted on input, internal name first
    pub fn accepted_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        let mut names = vec![self.name];
        if self.external != self.name {
            names.push(self.external);
        }
        names.extend(self.input_aliases.iter().copied());
        names.into_iter()
    }
}

/// Complete schema for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    profile: SchemaProfile,
    fields: Vec<FieldDef>,
    rules: Vec<CrossFieldRule>,
    /// Accepted input name -> index into `fields`
    input_index: HashMap<&'static str, usize>,
}

impl Schema {
    /// Create a new schema, indexing every accepted input name
    pub fn new(profile: SchemaProfile, fields: Vec<FieldDef>, rules: Vec<CrossFieldRule>) -> Self {
        let mut input_index = HashMap::new();
        for (i, field) in fields.iter().enumerate() {
            for name in field.accepted_names() {
                input_index.entry(name).or_insert(i);
            }
        }
        Self {
            profile,
            fields,
            rules,
            input_index,
        }
    }

    pub fn profile(&self) -> SchemaProfile {
        self.profile
    }

    /// Field definitions in declaration (and output) order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    /// Looks up a field by internal name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolves any accepted input name to its field
    pub fn resolve(&self, key: &str) -> Option<&FieldDef> {
        self.input_index.get(key).map(|&i| &self.fields[i])
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for field in &self.fields {
            for name in field.accepted_names() {
                if let Some(owner) = owners.insert(name, field.name) {
                    if owner != field.name {
                        return Err(format!(
                            "input name '{}' claimed by both '{}' and '{}'",
                            name, owner, field.name
                        ));
                    }
                }
            }
        }

        for rule in &self.rules {
            for name in rule.fields() {
                if self.field(name).is_none() {
                    return Err(format!("cross-field rule references unknown field '{}'", name));
                }
            }
        }

        for field in &self.fields {
            if let Some(derivation) = field.derived {
                if self.field(derivation.source()).is_none() {
                    return Err(format!(
                        "computed field '{}' reads unknown field '{}'",
                        field.name,
                        derivation.source()
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(
            SchemaProfile::Constrained,
            vec![
                FieldDef::required("manufacturer", "manufacturer", FieldType::String)
                    .with_length(2, 50),
                FieldDef::required("number_of_doors", "numberOfDoors", FieldType::Int)
                    .with_aliases(&["doors"])
                    .with_default(FieldDefault::Int(4)),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_resolve_accepts_every_name() {
        let schema = sample_schema();
        for key in ["number_of_doors", "numberOfDoors", "doors"] {
            assert_eq!(schema.resolve(key).unwrap().name, "number_of_doors");
        }
        assert!(schema.resolve("color").is_none());
    }

    #[test]
    fn test_conflicting_alias_rejected() {
        let schema = Schema::new(
            SchemaProfile::Aliased,
            vec![
                FieldDef::required("a", "a", FieldType::String).with_aliases(&["x"]),
                FieldDef::required("b", "b", FieldType::String).with_aliases(&["x"]),
            ],
            Vec::new(),
        );
        let result = schema.validate_structure();
        assert!(result.unwrap_err().contains("'x'"));
    }

    #[test]
    fn test_rule_must_reference_known_fields() {
        let schema = Schema::new(
            SchemaProfile::Constrained,
            vec![FieldDef::required("a", "a", FieldType::Date)],
            vec![CrossFieldRule::DateNotBefore {
                field: "a",
                other: "b",
            }],
        );
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_length_bounds() {
        let min = Constraint::MinLength(2);
        assert!(min.check(&FieldValue::Str("B".into())).is_err());
        assert!(min.check(&FieldValue::Str("BM".into())).is_ok());
        let max = Constraint::MaxLength(3);
        assert!(max.check(&FieldValue::Str("abcd".into())).is_err());
    }

    #[test]
    fn test_multiple_of_and_range() {
        let step = Constraint::MultipleOf(2);
        assert!(step.check(&FieldValue::Int(4)).is_ok());
        assert!(step.check(&FieldValue::Int(3)).is_err());
        assert!(Constraint::MinValue(0.0).check(&FieldValue::Float(-0.5)).is_err());
        assert!(Constraint::MaxValue(4.0).check(&FieldValue::Int(6)).is_err());
    }

    #[test]
    fn test_item_length_reports_index() {
        let c = Constraint::ItemLength { min: 2, max: 5 };
        let err = c
            .check(&FieldValue::List(vec!["ok".into(), "x".into()]))
            .unwrap_err();
        assert!(err.contains("[1]"));
    }

    #[test]
    fn test_constraint_ignores_other_types() {
        assert!(Constraint::MinLength(10).check(&FieldValue::Int(1)).is_ok());
        assert!(Constraint::MultipleOf(2).check(&FieldValue::Null).is_ok());
    }

    #[test]
    fn test_generated_defaults_are_fresh() {
        let a = FieldDefault::GenerateUuid.produce();
        let b = FieldDefault::GenerateUuid.produce();
        assert_ne!(a, b);
    }

    #[test]
    fn test_date_not_before_rule() {
        let rule = CrossFieldRule::DateNotBefore {
            field: "registration_date",
            other: "manufactured_date",
        };
        let made = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let earlier = NaiveDate::from_ymd_opt(2020, 4, 30).unwrap();
        let lookup = |reg: NaiveDate| {
            move |name: &str| match name {
                "registration_date" => Some(FieldValue::Date(reg)),
                "manufactured_date" => Some(FieldValue::Date(made)),
                _ => None,
            }
        };
        assert!(rule.check(lookup(made)).is_ok());
        assert!(rule.check(lookup(earlier)).is_err());
        assert!(rule.check(|_: &str| None).is_ok());
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(SchemaProfile::default(), SchemaProfile::Normalized);
        assert_eq!(SchemaProfile::Aliased.name(), "aliased");
    }
}
