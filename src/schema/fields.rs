//! Automobile field tables, one per schema profile
//!
//! Field order here is the output order of every serialized view.

use std::sync::LazyLock;

use chrono::NaiveDate;

use super::types::{
    Constraint, CrossFieldRule, Derivation, FieldDef, FieldDefault, FieldType, Schema,
    SchemaProfile,
};
use crate::record::AutomobileType;

pub const ID: &str = "id";
pub const MANUFACTURER: &str = "manufacturer";
pub const SERIES_NAME: &str = "series_name";
pub const TYPE: &str = "type";
pub const IS_ELECTRIC: &str = "is_electric";
pub const MANUFACTURED_DATE: &str = "manufactured_date";
pub const BASE_MSRP_USD: &str = "base_msrp_usd";
pub const TOP_FEATURES: &str = "top_features";
pub const VIN: &str = "vin";
pub const NUMBER_OF_DOORS: &str = "number_of_doors";
pub const REGISTRATION_COUNTRY: &str = "registration_country";
pub const REGISTRATION_COUNTRY_CODE: &str = "registration_country_code";
pub const REGISTRATION_DATE: &str = "registration_date";
pub const LICENSE_PLATE: &str = "license_plate";

const MIN_TEXT: usize = 2;
const MAX_TEXT: usize = 50;

static ALIASED: LazyLock<Schema> = LazyLock::new(aliased);
static CONSTRAINED: LazyLock<Schema> = LazyLock::new(|| constrained(SchemaProfile::Constrained));
static NORMALIZED: LazyLock<Schema> = LazyLock::new(|| constrained(SchemaProfile::Normalized));

/// Returns the schema for a profile
pub fn schema_for(profile: SchemaProfile) -> &'static Schema {
    match profile {
        SchemaProfile::Aliased => &*ALIASED,
        SchemaProfile::Constrained => &*CONSTRAINED,
        SchemaProfile::Normalized => &*NORMALIZED,
    }
}

fn type_field() -> FieldDef {
    FieldDef::required(
        TYPE,
        "type",
        FieldType::Enum {
            variants: AutomobileType::DISPLAY_NAMES,
        },
    )
}

fn manufactured_date() -> FieldDef {
    FieldDef::required(MANUFACTURED_DATE, "manufacturedDate", FieldType::Date)
        .with_aliases(&["completionDate"])
}

fn base_msrp_usd() -> FieldDef {
    FieldDef::required(BASE_MSRP_USD, "baseMSRPUSD", FieldType::Float).with_aliases(&["msrpUSD"])
}

fn number_of_doors() -> FieldDef {
    FieldDef::required(NUMBER_OF_DOORS, "numberOfDoors", FieldType::Int)
        .with_aliases(&["doors"])
        .with_default(FieldDefault::Int(4))
}

fn is_electric() -> FieldDef {
    FieldDef::required(IS_ELECTRIC, "isElectric", FieldType::Bool)
        .with_default(FieldDefault::Bool(false))
}

fn aliased() -> Schema {
    Schema::new(
        SchemaProfile::Aliased,
        vec![
            FieldDef::optional(ID, "id", FieldType::Uuid4),
            FieldDef::required(MANUFACTURER, "manufacturer", FieldType::String),
            FieldDef::required(SERIES_NAME, "seriesName", FieldType::String),
            type_field(),
            is_electric(),
            manufactured_date(),
            base_msrp_usd(),
            FieldDef::required(VIN, "vin", FieldType::String),
            number_of_doors(),
            FieldDef::optional(REGISTRATION_COUNTRY, "registrationCountry", FieldType::String),
            FieldDef::optional(LICENSE_PLATE, "licensePlate", FieldType::String),
        ],
        Vec::new(),
    )
}

fn constrained(profile: SchemaProfile) -> Schema {
    let earliest = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or(NaiveDate::MIN);

    let mut fields = vec![
        FieldDef::required(ID, "id", FieldType::Uuid4).with_default(FieldDefault::GenerateUuid),
        FieldDef::required(MANUFACTURER, "manufacturer", FieldType::String)
            .with_length(MIN_TEXT, MAX_TEXT),
        FieldDef::required(SERIES_NAME, "seriesName", FieldType::String)
            .with_length(MIN_TEXT, MAX_TEXT),
        type_field(),
        is_electric(),
        manufactured_date().with_constraint(Constraint::NotBefore(earliest)),
        base_msrp_usd().with_constraint(Constraint::MinValue(0.0)),
        FieldDef::optional(TOP_FEATURES, "topFeatures", FieldType::StringList)
            .with_constraint(Constraint::MinItems(1))
            .with_constraint(Constraint::MaxItems(5))
            .with_constraint(Constraint::ItemLength {
                min: MIN_TEXT,
                max: MAX_TEXT,
            }),
        FieldDef::required(VIN, "vin", FieldType::String).with_length(MIN_TEXT, MAX_TEXT),
        number_of_doors()
            .with_constraint(Constraint::MinValue(2.0))
            .with_constraint(Constraint::MaxValue(4.0))
            .with_constraint(Constraint::MultipleOf(2)),
    ];

    if profile == SchemaProfile::Normalized {
        fields.push(FieldDef::optional(
            REGISTRATION_COUNTRY,
            "registrationCountry",
            FieldType::Country,
        ));
        fields.push(FieldDef::computed(
            REGISTRATION_COUNTRY_CODE,
            "registrationCountryCode",
            Derivation::CountryCode {
                source: REGISTRATION_COUNTRY,
            },
        ));
    } else {
        fields.push(
            FieldDef::optional(REGISTRATION_COUNTRY, "registrationCountry", FieldType::String)
                .with_length(MIN_TEXT, MAX_TEXT),
        );
    }

    fields.push(FieldDef::optional(
        REGISTRATION_DATE,
        "registrationDate",
        FieldType::Date,
    ));
    fields.push(
        FieldDef::optional(LICENSE_PLATE, "licensePlate", FieldType::String)
            .with_length(MIN_TEXT, MAX_TEXT),
    );

    Schema::new(
        profile,
        fields,
        vec![CrossFieldRule::DateNotBefore {
            field: REGISTRATION_DATE,
            other: MANUFACTURED_DATE,
        }],
    )
}
