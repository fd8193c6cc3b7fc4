//! Automobile record: construction, typed access, assignment and views

mod automobile;
mod kind;
mod serializer;

pub use automobile::AutomobileRecord;
pub use kind::AutomobileType;
pub use serializer::{DumpOptions, Naming, JSON_DATE_FORMAT};
