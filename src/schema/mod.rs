//! Record schema and validation pipeline
//!
//! Schemas are static field tables, one per profile. Each field declares its
//! names, type, nullability, default and bounds; the validator evaluates
//! them generically.
//!
//! # Design Principles
//!
//! - Closed schema: undeclared keys are rejected
//! - Every violation is reported, not only the first
//! - Defaults are produced fresh per record
//! - Cross-field rules only see fields that passed on their own
//! - Computed fields are never stored

mod coerce;
mod errors;
pub mod fields;
mod types;
mod validator;
mod value;

pub use coerce::json_type_name;
pub use errors::{ValidationError, ValidationResult, Violation, ViolationKind};
pub use fields::schema_for;
pub use types::{
    Constraint, CrossFieldRule, Derivation, FieldDef, FieldDefault, FieldType, Schema,
    SchemaProfile,
};
pub use validator::{RecordValidator, ValidatedFields};
pub use value::{FieldValue, ISO_DATE_FORMAT};
