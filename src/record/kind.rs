//! Automobile body type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body type, matched and serialized by its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutomobileType {
    Sedan,
    Coupe,
    Convertible,
    #[serde(rename = "SUV")]
    Suv,
    Truck,
}

impl AutomobileType {
    pub const ALL: [AutomobileType; 5] = [
        AutomobileType::Sedan,
        AutomobileType::Coupe,
        AutomobileType::Convertible,
        AutomobileType::Suv,
        AutomobileType::Truck,
    ];

    /// Display names in declaration order
    pub const DISPLAY_NAMES: &'static [&'static str] =
        &["Sedan", "Coupe", "Convertible", "SUV", "Truck"];

    pub fn display_name(&self) -> &'static str {
        match self {
            AutomobileType::Sedan => "Sedan",
            AutomobileType::Coupe => "Coupe",
            AutomobileType::Convertible => "Convertible",
            AutomobileType::Suv => "SUV",
            AutomobileType::Truck => "Truck",
        }
    }

    /// Exact, case-sensitive match on the display name
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.display_name() == name)
    }
}

impl fmt::Display for AutomobileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AutomobileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_display_name(s).ok_or_else(|| format!("unknown automobile type '{}'", s))
    }
}
