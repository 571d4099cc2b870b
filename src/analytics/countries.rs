//! ISO country code to display name lookup.

/// Maps ISO country codes to display names, falling back to the code
/// itself for anything not in the table.
#[derive(Debug, Clone, Default)]
pub struct CountryNames;

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("ES", "Spain"),
    ("IT", "Italy"),
    ("NL", "Netherlands"),
    ("BE", "Belgium"),
    ("AT", "Austria"),
    ("CH", "Switzerland"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("KR", "South Korea"),
    ("IN", "India"),
    ("BR", "Brazil"),
    ("MX", "Mexico"),
    ("AR", "Argentina"),
    ("RU", "Russia"),
    ("PL", "Poland"),
    ("SE", "Sweden"),
    ("NO", "Norway"),
    ("DK", "Denmark"),
    ("FI", "Finland"),
    ("PT", "Portugal"),
    ("IE", "Ireland"),
    ("NZ", "New Zealand"),
    ("SG", "Singapore"),
    ("HK", "Hong Kong"),
    ("Unknown", "Unknown"),
];

impl CountryNames {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self, code: &str) -> String {
        COUNTRY_NAMES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| code.to_string())
    }
}
