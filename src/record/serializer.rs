//! Record views
//!
//! A validated record can be dumped under either naming convention, as a
//! map of native values or as JSON text. Dates are formatted only in text
//! output; map views carry `NaiveDate` values untouched. Dumping never fails.

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::automobile::AutomobileRecord;
use crate::schema::{FieldValue, SchemaProfile};

/// Default text rendering for dates
pub const JSON_DATE_FORMAT: &str = "%Y/%m/%d";

/// Key convention of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// snake_case internal field names
    Internal,
    /// camelCase external names
    External,
}

/// Output options shared by every view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// Omit fields whose value is null
    pub exclude_none: bool,
    /// chrono format string for dates in text output
    pub json_date_format: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            exclude_none: false,
            json_date_format: JSON_DATE_FORMAT.to_string(),
        }
    }
}

impl AutomobileRecord {
    /// Native-valued view in schema order, computed fields included
    pub fn dump(&self, naming: Naming, options: &DumpOptions) -> IndexMap<&'static str, FieldValue> {
        self.schema()
            .fields()
            .iter()
            .filter_map(|field| {
                let value = self.field_value(field.name)?;
                if options.exclude_none && value.is_null() {
                    return None;
                }
                let key = match naming {
                    Naming::Internal => field.name,
                    Naming::External => field.external,
                };
                Some((key, value))
            })
            .collect()
    }

    /// JSON object text in schema order, dates rendered with the configured format
    pub fn dump_json(&self, naming: Naming, options: &DumpOptions) -> String {
        self.dump_value(naming, options).to_string()
    }

    fn dump_value(&self, naming: Naming, options: &DumpOptions) -> Value {
        let object: Map<String, Value> = self
            .dump(naming, options)
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_json(&options.json_date_format)))
            .collect();
        Value::Object(object)
    }

    pub fn to_internal_map(&self) -> IndexMap<&'static str, FieldValue> {
        self.dump(Naming::Internal, &DumpOptions::default())
    }

    pub fn to_external_map(&self) -> IndexMap<&'static str, FieldValue> {
        self.dump(Naming::External, &DumpOptions::default())
    }

    pub fn to_internal_json(&self) -> String {
        self.dump_json(Naming::Internal, &DumpOptions::default())
    }

    pub fn to_external_json(&self) -> String {
        self.dump_json(Naming::External, &DumpOptions::default())
    }
}

/// Serializes as the external JSON view.
///
/// `Deserialize` validates under the default profile, so only records of that
/// profile serialize through serde; other profiles are refused rather than
/// written in a shape that cannot be read back. Use
/// [`AutomobileRecord::to_external_json`] and
/// [`AutomobileRecord::from_json_str_with`] for those.
impl Serialize for AutomobileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let profile = self.profile();
        if profile != SchemaProfile::default() {
            return Err(ser::Error::custom(format!(
                "serde serialization covers the '{}' profile only, record uses '{}'",
                SchemaProfile::default().name(),
                profile.name()
            )));
        }
        let options = DumpOptions::default();
        let view = self.dump(Naming::External, &options);
        let mut map = serializer.serialize_map(Some(view.len()))?;
        for (key, value) in view {
            map.serialize_entry(key, &value.to_json(&options.json_date_format))?;
        }
        map.end()
    }
}

/// Deserializes through full validation under the default profile.
impl<'de> Deserialize<'de> for AutomobileRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AutomobileRecord::from_value(&value).map_err(de::Error::custom)
    }
}
