use std::fmt;

use serde::Serialize;

/// Shortcut chips shown under the home search box.
pub const POPULAR_SEARCHES: [&str; 4] = [
    "Dermatologist",
    "Pediatrician",
    "Gynecologist/Obstetrician",
    "Orthopedist",
];

const RESULTS_PATH: &str = "/doctors";

/// Navigation target for the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchLink {
    pub location: Option<String>,
    pub specialty: String,
}

impl SearchLink {
    pub fn specialty(specialty: impl Into<String>) -> Self {
        Self {
            location: None,
            specialty: specialty.into(),
        }
    }

    /// Builds the link for the home search box. A query that is blank after
    /// trimming leads nowhere. Values are passed through untrimmed.
    pub fn from_home_input(location: &str, query: &str) -> Option<Self> {
        if query.trim().is_empty() {
            return None;
        }

        Some(Self {
            location: Some(location.to_string()),
            specialty: query.to_string(),
        })
    }

    pub fn href(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "{RESULTS_PATH}?location={}&specialty={}",
                urlencoding::encode(location),
                urlencoding::encode(&self.specialty)
            ),
            None => write!(
                f,
                "{RESULTS_PATH}?specialty={}",
                urlencoding::encode(&self.specialty)
            ),
        }
    }
}

/// Summary line above the results list.
pub fn results_headline(count: usize, specialty: &str, location: &str) -> String {
    format!("{count} {specialty}s available in {location}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_home_query_yields_no_link() {
        assert_eq!(SearchLink::from_home_input("JP Nagar", ""), None);
        assert_eq!(SearchLink::from_home_input("JP Nagar", "   \t"), None);
    }

    #[test]
    fn home_link_percent_encodes_both_values() {
        let link = SearchLink::from_home_input("JP Nagar", "Gynecologist/Obstetrician")
            .expect("non-blank query");

        assert_eq!(
            link.href(),
            "/doctors?location=JP%20Nagar&specialty=Gynecologist%2FObstetrician"
        );
    }

    #[test]
    fn specialty_only_link_omits_location() {
        let link = SearchLink::specialty("General Physician");
        assert_eq!(link.href(), "/doctors?specialty=General%20Physician");
    }

    #[test]
    fn headline_pluralises_specialty() {
        assert_eq!(
            results_headline(3, "Dermatologist", "JP Nagar"),
            "3 Dermatologists available in JP Nagar"
        );
    }
}
