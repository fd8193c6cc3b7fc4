//! The automobile record
//!
//! A record only exists once its fields have passed validation. Every
//! assignment re-runs the full pipeline under the record's profile, so the
//! invariants that hold after construction hold after each mutation:
//! - strings are trimmed and within bounds
//! - `registration_date` is not earlier than `manufactured_date`
//! - `registration_country_code` agrees with `registration_country`
//!
//! A failed assignment leaves the record untouched.

use std::cell::OnceCell;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::kind::AutomobileType;
use crate::country;
use crate::schema::fields::{
    BASE_MSRP_USD, ID, IS_ELECTRIC, LICENSE_PLATE, MANUFACTURED_DATE, MANUFACTURER,
    NUMBER_OF_DOORS, REGISTRATION_COUNTRY, REGISTRATION_COUNTRY_CODE, REGISTRATION_DATE,
    SERIES_NAME, TOP_FEATURES, TYPE, VIN,
};
use crate::schema::{
    schema_for, FieldValue, RecordValidator, Schema, SchemaProfile, ValidatedFields,
    ValidationError, ValidationResult, Violation,
};

/// A validated automobile
#[derive(Debug, Clone)]
pub struct AutomobileRecord {
    profile: SchemaProfile,
    id: Option<Uuid>,
    manufacturer: String,
    series_name: String,
    kind: AutomobileType,
    is_electric: bool,
    manufactured_date: NaiveDate,
    base_msrp_usd: f64,
    top_features: Option<Vec<String>>,
    vin: String,
    number_of_doors: i64,
    registration_country: Option<String>,
    registration_date: Option<NaiveDate>,
    license_plate: Option<String>,
    /// Memoized derived code; a fresh cell comes with every revalidation
    country_code: OnceCell<Option<&'static str>>,
}

impl AutomobileRecord {
    /// Validates JSON text under the default profile.
    pub fn from_json_str(text: &str) -> ValidationResult<Self> {
        Self::from_json_str_with(text, SchemaProfile::default())
    }

    pub fn from_json_str_with(text: &str, profile: SchemaProfile) -> ValidationResult<Self> {
        let fields = RecordValidator::new(profile).validate_json(text)?;
        Self::from_validated(fields)
    }

    /// Validates a JSON value under the default profile.
    pub fn from_value(value: &Value) -> ValidationResult<Self> {
        Self::from_value_with(value, SchemaProfile::default())
    }

    pub fn from_value_with(value: &Value, profile: SchemaProfile) -> ValidationResult<Self> {
        let fields = RecordValidator::new(profile).validate_value(value)?;
        Self::from_validated(fields)
    }

    /// Validates a loosely-typed mapping under the default profile.
    pub fn from_map(map: &Map<String, Value>) -> ValidationResult<Self> {
        Self::from_map_with(map, SchemaProfile::default())
    }

    pub fn from_map_with(map: &Map<String, Value>, profile: SchemaProfile) -> ValidationResult<Self> {
        let fields = RecordValidator::new(profile).validate_map(map)?;
        Self::from_validated(fields)
    }

    /// Validates a mapping of native values, such as a serialized map view,
    /// under the default profile.
    pub fn from_fields<K: Into<String>>(fields: IndexMap<K, FieldValue>) -> ValidationResult<Self> {
        Self::from_fields_with(fields, SchemaProfile::default())
    }

    pub fn from_fields_with<K: Into<String>>(
        fields: IndexMap<K, FieldValue>,
        profile: SchemaProfile,
    ) -> ValidationResult<Self> {
        let map: Map<String, Value> = fields
            .into_iter()
            .map(|(key, value)| (key.into(), Value::from(value)))
            .collect();
        Self::from_map_with(&map, profile)
    }

    /// Builds a record from fields that already passed validation.
    fn from_validated(mut fields: ValidatedFields) -> ValidationResult<Self> {
        let profile = fields.profile();
        let record = Self {
            profile,
            id: match fields.take(ID) {
                FieldValue::Uuid(id) => Some(id),
                FieldValue::Null => None,
                other => return Err(internal_mismatch(ID, "uuid", &other)),
            },
            manufacturer: take_string(&mut fields, MANUFACTURER)?,
            series_name: take_string(&mut fields, SERIES_NAME)?,
            kind: match fields.take(TYPE) {
                FieldValue::Kind(kind) => kind,
                other => return Err(internal_mismatch(TYPE, "enum", &other)),
            },
            is_electric: match fields.take(IS_ELECTRIC) {
                FieldValue::Bool(b) => b,
                other => return Err(internal_mismatch(IS_ELECTRIC, "bool", &other)),
            },
            manufactured_date: match fields.take(MANUFACTURED_DATE) {
                FieldValue::Date(d) => d,
                other => return Err(internal_mismatch(MANUFACTURED_DATE, "date", &other)),
            },
            base_msrp_usd: match fields.take(BASE_MSRP_USD) {
                FieldValue::Float(f) => f,
                other => return Err(internal_mismatch(BASE_MSRP_USD, "float", &other)),
            },
            top_features: match fields.take(TOP_FEATURES) {
                FieldValue::List(items) => Some(items),
                FieldValue::Null => None,
                other => return Err(internal_mismatch(TOP_FEATURES, "list of strings", &other)),
            },
            vin: take_string(&mut fields, VIN)?,
            number_of_doors: match fields.take(NUMBER_OF_DOORS) {
                FieldValue::Int(n) => n,
                other => return Err(internal_mismatch(NUMBER_OF_DOORS, "int", &other)),
            },
            registration_country: take_optional_string(&mut fields, REGISTRATION_COUNTRY)?,
            registration_date: match fields.take(REGISTRATION_DATE) {
                FieldValue::Date(d) => Some(d),
                FieldValue::Null => None,
                other => return Err(internal_mismatch(REGISTRATION_DATE, "date", &other)),
            },
            license_plate: take_optional_string(&mut fields, LICENSE_PLATE)?,
            country_code: OnceCell::new(),
        };
        debug!(profile = profile.name(), vin = %record.vin, "record accepted");
        Ok(record)
    }

    /// Profile the record was validated under
    pub fn profile(&self) -> SchemaProfile {
        self.profile
    }

    pub fn schema(&self) -> &'static Schema {
        schema_for(self.profile)
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn series_name(&self) -> &str {
        &self.series_name
    }

    pub fn kind(&self) -> AutomobileType {
        self.kind
    }

    pub fn is_electric(&self) -> bool {
        self.is_electric
    }

    pub fn manufactured_date(&self) -> NaiveDate {
        self.manufactured_date
    }

    pub fn base_msrp_usd(&self) -> f64 {
        self.base_msrp_usd
    }

    pub fn top_features(&self) -> Option<&[String]> {
        self.top_features.as_deref()
    }

    pub fn vin(&self) -> &str {
        &self.vin
    }

    pub fn number_of_doors(&self) -> i64 {
        self.number_of_doors
    }

    pub fn registration_country(&self) -> Option<&str> {
        self.registration_country.as_deref()
    }

    pub fn registration_date(&self) -> Option<NaiveDate> {
        self.registration_date
    }

    pub fn license_plate(&self) -> Option<&str> {
        self.license_plate.as_deref()
    }

    /// ISO-3 code of the registration country.
    ///
    /// Computed on first access and memoized; always `None` under profiles
    /// that do not normalize the country.
    pub fn registration_country_code(&self) -> Option<&'static str> {
        self.schema().field(REGISTRATION_COUNTRY_CODE)?;
        *self.country_code.get_or_init(|| {
            self.registration_country
                .as_deref()
                .and_then(country::code_for)
        })
    }

    /// Value of a stored or computed field by internal name
    pub fn field_value(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            ID => self.id.into(),
            MANUFACTURER => self.manufacturer.clone().into(),
            SERIES_NAME => self.series_name.clone().into(),
            TYPE => self.kind.into(),
            IS_ELECTRIC => self.is_electric.into(),
            MANUFACTURED_DATE => self.manufactured_date.into(),
            BASE_MSRP_USD => self.base_msrp_usd.into(),
            TOP_FEATURES => self
                .top_features
                .clone()
                .map_or(FieldValue::Null, FieldValue::List),
            VIN => self.vin.clone().into(),
            NUMBER_OF_DOORS => self.number_of_doors.into(),
            REGISTRATION_COUNTRY => self.registration_country.clone().into(),
            REGISTRATION_COUNTRY_CODE => self.registration_country_code().into(),
            REGISTRATION_DATE => self.registration_date.into(),
            LICENSE_PLATE => self.license_plate.clone().into(),
            _ => return None,
        };
        Some(value)
    }

    /// Assigns a field by any accepted input name and revalidates.
    ///
    /// # Errors
    ///
    /// Unknown names, computed fields and values failing any check are
    /// rejected; the record is left unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ValidationResult<()> {
        let schema = self.schema();
        let field = schema
            .resolve(name)
            .ok_or_else(|| ValidationError::single(Violation::unknown_field(name)))?;
        if field.is_derived() {
            return Err(ValidationError::single(Violation::read_only(name)));
        }

        let mut payload = self.stored_fields();
        payload.insert(field.name.to_string(), value.into());
        let fields = RecordValidator::new(self.profile).validate_map(&payload)?;
        *self = Self::from_validated(fields)?;
        debug!(field = field.name, "field assigned");
        Ok(())
    }

    pub fn set_manufacturer(&mut self, manufacturer: &str) -> ValidationResult<()> {
        self.set(MANUFACTURER, manufacturer)
    }

    pub fn set_vin(&mut self, vin: &str) -> ValidationResult<()> {
        self.set(VIN, vin)
    }

    pub fn set_number_of_doors(&mut self, doors: i64) -> ValidationResult<()> {
        self.set(NUMBER_OF_DOORS, doors)
    }

    pub fn set_registration_country(&mut self, country: Option<&str>) -> ValidationResult<()> {
        self.set(REGISTRATION_COUNTRY, country)
    }

    pub fn set_manufactured_date(&mut self, date: NaiveDate) -> ValidationResult<()> {
        self.set(MANUFACTURED_DATE, FieldValue::Date(date))
    }

    pub fn set_registration_date(&mut self, date: Option<NaiveDate>) -> ValidationResult<()> {
        self.set(REGISTRATION_DATE, FieldValue::from(date))
    }

    /// Stored fields keyed by internal name, as validation input
    fn stored_fields(&self) -> Map<String, Value> {
        self.schema()
            .fields()
            .iter()
            .filter(|f| !f.is_derived())
            .filter_map(|f| {
                self.field_value(f.name)
                    .map(|value| (f.name.to_string(), Value::from(value)))
            })
            .collect()
    }
}

/// Equality over stored fields; the memoized code is derived and ignored
impl PartialEq for AutomobileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.profile == other.profile
            && self.id == other.id
            && self.manufacturer == other.manufacturer
            && self.series_name == other.series_name
            && self.kind == other.kind
            && self.is_electric == other.is_electric
            && self.manufactured_date == other.manufactured_date
            && self.base_msrp_usd == other.base_msrp_usd
            && self.top_features == other.top_features
            && self.vin == other.vin
            && self.number_of_doors == other.number_of_doors
            && self.registration_country == other.registration_country
            && self.registration_date == other.registration_date
            && self.license_plate == other.license_plate
    }
}

fn take_string(fields: &mut ValidatedFields, name: &'static str) -> ValidationResult<String> {
    match fields.take(name) {
        FieldValue::Str(s) => Ok(s),
        other => Err(internal_mismatch(name, "string", &other)),
    }
}

fn take_optional_string(
    fields: &mut ValidatedFields,
    name: &'static str,
) -> ValidationResult<Option<String>> {
    match fields.take(name) {
        FieldValue::Str(s) => Ok(Some(s)),
        FieldValue::Null => Ok(None),
        other => Err(internal_mismatch(name, "string", &other)),
    }
}

/// A validated value of the wrong native type; only reachable if a field
/// table disagrees with the record layout.
fn internal_mismatch(name: &str, expected: &str, actual: &FieldValue) -> ValidationError {
    ValidationError::single(Violation::type_mismatch(name, expected, format!("{:?}", actual)))
}
