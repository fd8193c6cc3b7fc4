//! Serialization Tests
//!
//! Tests for the record views:
//! - Internal and external naming
//! - Native values in map views, formatted text in JSON views
//! - Round-trips through both views

use automobile_record::schema::FieldValue;
use automobile_record::{
    AutomobileRecord, AutomobileType, DumpOptions, Naming, RecordConfig, SchemaProfile,
};
use chrono::NaiveDate;
use indexmap::IndexMap;

const DATA_JSON: &str = r#"
{
    "manufacturer": "BMW",
    "seriesName": "M4",
    "type": "Convertible",
    "isElectric": false,
    "completionDate": "2023-01-01",
    "msrpUSD": 93300,
    "vin": "1234567890",
    "doors": 2,
    "registrationCountry": "France",
    "licensePlate": "AAA-BBB"
}
"#;

fn first_of_2023() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

// =============================================================================
// View Shape Tests
// =============================================================================

#[test]
fn test_internal_map_view() {
    let car = AutomobileRecord::from_json_str_with(DATA_JSON, SchemaProfile::Aliased).unwrap();
    let options = DumpOptions {
        exclude_none: true,
        ..DumpOptions::default()
    };

    let expected: IndexMap<&str, FieldValue> = IndexMap::from([
        ("manufacturer", FieldValue::Str("BMW".into())),
        ("series_name", FieldValue::Str("M4".into())),
        ("type", FieldValue::Kind(AutomobileType::Convertible)),
        ("is_electric", FieldValue::Bool(false)),
        ("manufactured_date", FieldValue::Date(first_of_2023())),
        ("base_msrp_usd", FieldValue::Float(93300.0)),
        ("vin", FieldValue::Str("1234567890".into())),
        ("number_of_doors", FieldValue::Int(2)),
        ("registration_country", FieldValue::Str("France".into())),
        ("license_plate", FieldValue::Str("AAA-BBB".into())),
    ]);
    assert_eq!(car.dump(Naming::Internal, &options), expected);
}

#[test]
fn test_external_map_view() {
    let car = AutomobileRecord::from_json_str_with(DATA_JSON, SchemaProfile::Aliased).unwrap();
    let options = DumpOptions {
        exclude_none: true,
        ..DumpOptions::default()
    };

    let expected: IndexMap<&str, FieldValue> = IndexMap::from([
        ("manufacturer", FieldValue::Str("BMW".into())),
        ("seriesName", FieldValue::Str("M4".into())),
        ("type", FieldValue::Kind(AutomobileType::Convertible)),
        ("isElectric", FieldValue::Bool(false)),
        ("manufacturedDate", FieldValue::Date(first_of_2023())),
        ("baseMSRPUSD", FieldValue::Float(93300.0)),
        ("vin", FieldValue::Str("1234567890".into())),
        ("numberOfDoors", FieldValue::Int(2)),
        ("registrationCountry", FieldValue::Str("France".into())),
        ("licensePlate", FieldValue::Str("AAA-BBB".into())),
    ]);
    assert_eq!(car.dump(Naming::External, &options), expected);
}

#[test]
fn test_external_json_view() {
    let car = AutomobileRecord::from_json_str_with(DATA_JSON, SchemaProfile::Aliased).unwrap();
    let options = DumpOptions {
        exclude_none: true,
        ..DumpOptions::default()
    };

    let expected = concat!(
        r#"{"manufacturer":"BMW","seriesName":"M4","type":"Convertible","#,
        r#""isElectric":false,"manufacturedDate":"2023/01/01","baseMSRPUSD":93300.0,"#,
        r#""vin":"1234567890","numberOfDoors":2,"registrationCountry":"France","#,
        r#""licensePlate":"AAA-BBB"}"#
    );
    assert_eq!(car.dump_json(Naming::External, &options), expected);
}

#[test]
fn test_aliased_profile_emits_null_id_by_default() {
    let car = AutomobileRecord::from_json_str_with(DATA_JSON, SchemaProfile::Aliased).unwrap();
    assert!(car.to_external_json().starts_with(r#"{"id":null,"manufacturer":"BMW""#));
}

#[test]
fn test_normalized_views_include_country_code() {
    let car = AutomobileRecord::from_json_str(DATA_JSON).unwrap();
    let view = car.to_external_map();
    assert_eq!(view["registrationCountry"], FieldValue::Str("France".into()));
    assert_eq!(view["registrationCountryCode"], FieldValue::Str("FRA".into()));
    assert!(car
        .to_external_json()
        .contains(r#""registrationCountry":"France","registrationCountryCode":"FRA""#));
}

/// Dates are native in maps and formatted only in text.
#[test]
fn test_date_format_is_representation_specific() {
    let car = AutomobileRecord::from_json_str(DATA_JSON).unwrap();
    assert_eq!(
        car.to_external_map()["manufacturedDate"],
        FieldValue::Date(first_of_2023())
    );
    assert!(car
        .to_external_json()
        .contains(r#""manufacturedDate":"2023/01/01""#));
}

#[test]
fn test_config_driven_dump() {
    let config = RecordConfig::from_json_str(
        r#"{ "profile": "constrained", "json_date_format": "%Y-%m-%d", "exclude_none": true }"#,
    )
    .unwrap();
    let car = config.parse(DATA_JSON).unwrap();
    assert_eq!(car.profile(), SchemaProfile::Constrained);

    let json = car.dump_json(Naming::External, &config.dump_options());
    assert!(json.contains(r#""manufacturedDate":"2023-01-01""#));
    assert!(!json.contains("registrationCountryCode"));
    assert!(!json.contains("null"));
}

// =============================================================================
// Round-trip Tests
// =============================================================================

/// validate(serialize_internal(validate(P))) == validate(P)
#[test]
fn test_internal_map_round_trip() {
    for profile in SchemaProfile::ALL {
        let car = AutomobileRecord::from_json_str_with(DATA_JSON, profile).unwrap();
        let again = AutomobileRecord::from_fields_with(car.to_internal_map(), profile).unwrap();
        assert_eq!(again, car, "profile {}", profile.name());
    }
}

#[test]
fn test_external_map_round_trip() {
    let car = AutomobileRecord::from_json_str(DATA_JSON).unwrap();
    let again = AutomobileRecord::from_fields(car.to_external_map()).unwrap();
    assert_eq!(again, car);
    assert_eq!(again.registration_country_code(), car.registration_country_code());
}

/// deserialize_external_json(serialize_external_json(R)) == R
#[test]
fn test_external_json_round_trip() {
    for profile in SchemaProfile::ALL {
        let mut car = AutomobileRecord::from_json_str_with(DATA_JSON, profile).unwrap();
        if profile != SchemaProfile::Aliased {
            car.set("topFeatures", serde_json::json!(["GPS", "Sunroof"])).unwrap();
            car.set("registrationDate", "2023-03-15").unwrap();
        }

        let again = AutomobileRecord::from_json_str_with(&car.to_external_json(), profile).unwrap();
        assert_eq!(again, car, "profile {}", profile.name());
        assert_eq!(again.registration_country_code(), car.registration_country_code());
    }
}

#[test]
fn test_internal_json_round_trip() {
    let car = AutomobileRecord::from_json_str(DATA_JSON).unwrap();
    let again = AutomobileRecord::from_json_str(&car.to_internal_json()).unwrap();
    assert_eq!(again, car);
}

/// serde writes only what serde can read back.
#[test]
fn test_serde_round_trip_per_profile() {
    let payload = DATA_JSON.replace("\"France\"", "\"Narnia\"");
    for profile in SchemaProfile::ALL {
        let text = if profile == SchemaProfile::Normalized {
            DATA_JSON.to_string()
        } else {
            payload.clone()
        };
        let car = AutomobileRecord::from_json_str_with(&text, profile).unwrap();

        match serde_json::to_string(&car) {
            Ok(json) => {
                assert_eq!(profile, SchemaProfile::default());
                let back: AutomobileRecord = serde_json::from_str(&json).unwrap();
                assert_eq!(back, car);
            }
            Err(err) => {
                assert_ne!(profile, SchemaProfile::default());
                assert!(err.to_string().contains(profile.name()));
                let back =
                    AutomobileRecord::from_json_str_with(&car.to_external_json(), profile).unwrap();
                assert_eq!(back, car);
            }
        }
    }
}

#[test]
fn test_serialization_never_revalidates() {
    let car = AutomobileRecord::from_json_str(DATA_JSON).unwrap();
    for _ in 0..10 {
        assert_eq!(car.to_external_json(), car.to_external_json());
    }
}
