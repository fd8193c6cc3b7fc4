//! automobile-record - validation and serialization for automobile records
//!
//! Untrusted input (JSON text or a loosely-typed mapping) is validated
//! against a fixed field schema into an `AutomobileRecord`, which can be
//! dumped under internal snake_case or external camelCase names.

pub mod config;
pub mod country;
pub mod record;
pub mod schema;

pub use config::{ConfigError, RecordConfig};
pub use record::{AutomobileRecord, AutomobileType, DumpOptions, Naming};
pub use schema::{SchemaProfile, ValidationError, ValidationResult, Violation, ViolationKind};
