//! Country normalization table
//!
//! Maps country names, aliases and abbreviations (case-insensitive,
//! surrounding whitespace ignored) to a canonical display name and ISO 3166
//! alpha-3 code. The reverse map, display name to code, is derived once from
//! the forward table. Both maps are immutable after first use.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical country entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Country {
    /// Canonical display name
    pub name: &'static str,
    /// ISO 3166 alpha-3 code
    pub code: &'static str,
}

const UNITED_KINGDOM: Country = Country { name: "United Kingdom", code: "GBR" };
const UNITED_STATES: Country = Country { name: "United States", code: "USA" };
const FRANCE: Country = Country { name: "France", code: "FRA" };
const GERMANY: Country = Country { name: "Germany", code: "DEU" };
const ITALY: Country = Country { name: "Italy", code: "ITA" };
const SPAIN: Country = Country { name: "Spain", code: "ESP" };
const JAPAN: Country = Country { name: "Japan", code: "JPN" };
const SOUTH_KOREA: Country = Country { name: "South Korea", code: "KOR" };
const CHINA: Country = Country { name: "China", code: "CHN" };
const CANADA: Country = Country { name: "Canada", code: "CAN" };
const MEXICO: Country = Country { name: "Mexico", code: "MEX" };
const SWEDEN: Country = Country { name: "Sweden", code: "SWE" };
const NETHERLANDS: Country = Country { name: "Netherlands", code: "NLD" };
const INDIA: Country = Country { name: "India", code: "IND" };
const BRAZIL: Country = Country { name: "Brazil", code: "BRA" };
const AUSTRALIA: Country = Country { name: "Australia", code: "AUS" };

/// Lowercase lookup keys
const ENTRIES: &[(&str, Country)] = &[
    ("uk", UNITED_KINGDOM),
    ("u.k.", UNITED_KINGDOM),
    ("britain", UNITED_KINGDOM),
    ("great britain", UNITED_KINGDOM),
    ("united kingdom", UNITED_KINGDOM),
    ("england", UNITED_KINGDOM),
    ("us", UNITED_STATES),
    ("usa", UNITED_STATES),
    ("u.s.", UNITED_STATES),
    ("u.s.a.", UNITED_STATES),
    ("america", UNITED_STATES),
    ("united states", UNITED_STATES),
    ("united states of america", UNITED_STATES),
    ("france", FRANCE),
    ("germany", GERMANY),
    ("deutschland", GERMANY),
    ("italy", ITALY),
    ("spain", SPAIN),
    ("espana", SPAIN),
    ("japan", JAPAN),
    ("south korea", SOUTH_KOREA),
    ("korea", SOUTH_KOREA),
    ("republic of korea", SOUTH_KOREA),
    ("china", CHINA),
    ("prc", CHINA),
    ("canada", CANADA),
    ("mexico", MEXICO),
    ("sweden", SWEDEN),
    ("netherlands", NETHERLANDS),
    ("the netherlands", NETHERLANDS),
    ("holland", NETHERLANDS),
    ("india", INDIA),
    ("brazil", BRAZIL),
    ("australia", AUSTRALIA),
];

static FORWARD: LazyLock<HashMap<&'static str, Country>> =
    LazyLock::new(|| ENTRIES.iter().copied().collect());

static REVERSE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    FORWARD
        .values()
        .map(|country| (country.name, country.code))
        .collect()
});

/// Looks up a country by any recognized name.
pub fn lookup(input: &str) -> Option<Country> {
    let key = input.trim().to_lowercase();
    FORWARD.get(key.as_str()).copied()
}

/// Returns the code for a canonical display name.
///
/// Only exact display names match; use [`lookup`] for free-form input.
pub fn code_for(display_name: &str) -> Option<&'static str> {
    REVERSE.get(display_name).copied()
}

/// Returns every canonical country, sorted by display name
pub fn canonical_countries() -> Vec<Country> {
    let mut countries: Vec<Country> = REVERSE
        .iter()
        .map(|(&name, &code)| Country { name, code })
        .collect();
    countries.sort_by_key(|c| c.name);
    countries
}
