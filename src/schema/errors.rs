//! Validation error types
//!
//! Every rejected payload or assignment surfaces as one `ValidationError`
//! listing a `Violation` per offending field. Violation codes:
//! - AUTO_MISSING_FIELD
//! - AUTO_UNKNOWN_FIELD
//! - AUTO_DUPLICATE_FIELD
//! - AUTO_READ_ONLY_FIELD
//! - AUTO_TYPE_MISMATCH
//! - AUTO_OUT_OF_BOUNDS
//! - AUTO_INVALID_ENUM
//! - AUTO_CROSS_FIELD
//! - AUTO_LOOKUP_MISS
//! - AUTO_MALFORMED_INPUT

use std::fmt;

use thiserror::Error;

/// Category of a single field violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Required field absent from the payload
    MissingField,
    /// Key not declared by the schema
    UnknownField,
    /// Same field supplied under two accepted names
    DuplicateField,
    /// Attempt to supply or assign a computed field
    ReadOnlyField,
    /// Value could not be coerced to the field type
    TypeMismatch,
    /// Length, range, multiple-of or collection size violated
    OutOfBounds,
    /// Value is not one of the enumerated display names
    InvalidEnum,
    /// Rule spanning several fields violated
    CrossField,
    /// Value not found in a normalization table
    LookupMiss,
    /// Input text is not a JSON object
    MalformedInput,
}

impl ViolationKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "AUTO_MISSING_FIELD",
            ViolationKind::UnknownField => "AUTO_UNKNOWN_FIELD",
            ViolationKind::DuplicateField => "AUTO_DUPLICATE_FIELD",
            ViolationKind::ReadOnlyField => "AUTO_READ_ONLY_FIELD",
            ViolationKind::TypeMismatch => "AUTO_TYPE_MISMATCH",
            ViolationKind::OutOfBounds => "AUTO_OUT_OF_BOUNDS",
            ViolationKind::InvalidEnum => "AUTO_INVALID_ENUM",
            ViolationKind::CrossField => "AUTO_CROSS_FIELD",
            ViolationKind::LookupMiss => "AUTO_LOOKUP_MISS",
            ViolationKind::MalformedInput => "AUTO_MALFORMED_INPUT",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field name as supplied by the caller, or `$root`
    pub field: String,
    /// Violation category
    pub kind: ViolationKind,
    /// Human-readable description
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::MissingField, "field required")
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::UnknownField, "extra fields are not permitted")
    }

    pub fn duplicate_field(field: impl Into<String>, first: &str) -> Self {
        Self::new(
            field,
            ViolationKind::DuplicateField,
            format!("field already supplied as '{}'", first),
        )
    }

    pub fn read_only(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::ReadOnlyField, "computed field cannot be assigned")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &str, actual: impl fmt::Display) -> Self {
        Self::new(
            field,
            ViolationKind::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }

    pub fn out_of_bounds(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::OutOfBounds, message)
    }

    pub fn invalid_enum(field: impl Into<String>, allowed: &[&str], actual: &str) -> Self {
        let allowed = allowed
            .iter()
            .map(|name| format!("'{}'", name))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            field,
            ViolationKind::InvalidEnum,
            format!("input should be one of {}, got '{}'", allowed, actual),
        )
    }

    pub fn cross_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::CrossField, message)
    }

    pub fn lookup_miss(field: impl Into<String>, input: &str) -> Self {
        Self::new(
            field,
            ViolationKind::LookupMiss,
            format!("unrecognized country '{}'", input),
        )
    }

    pub fn malformed_input(reason: impl fmt::Display) -> Self {
        Self::new(
            "$root",
            ViolationKind::MalformedInput,
            format!("invalid JSON: {}", reason),
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {} [{}]", self.field, self.message, self.kind)
    }
}

/// Rejection of a whole record, listing every violation found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} validation error(s): {}", .violations.len(), join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an error from the collected violations
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Creates an error carrying a single violation
    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Returns all violations in detection order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Returns whether any violation has the given kind
    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Returns the violations reported against `field`
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.field == field)
    }

    /// Returns the offending field names
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
