use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::ProviderRecord;

/// Result ordering. `Relevance` keeps catalog order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Relevance,
    FeeLowToHigh,
    FeeHighToLow,
    Rating,
    PatientStories,
    Experience,
}

/// A location + specialty search with optional refinements.
///
/// An empty filter or the literal `all` (any case) disables that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub available_today: Option<bool>,
    #[serde(default)]
    pub min_experience_years: Option<u32>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl SearchQuery {
    pub fn new(location: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            specialty: specialty.into(),
            ..Self::default()
        }
    }

    pub fn with_available_today(mut self, available_today: bool) -> Self {
        self.available_today = Some(available_today);
        self
    }

    pub fn with_min_experience(mut self, years: u32) -> Self {
        self.min_experience_years = Some(years);
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, record: &ProviderRecord) -> bool {
        let specialty = filter_term(&self.specialty);
        let location = filter_term(&self.location);
        self.matches_terms(record, specialty.as_deref(), location.as_deref())
    }

    /// Filters `records` and orders the survivors. Catalog order is kept for
    /// relevance and for ties under every other ordering.
    pub fn apply(&self, records: &[ProviderRecord]) -> Vec<ProviderRecord> {
        let specialty = filter_term(&self.specialty);
        let location = filter_term(&self.location);

        let mut results: Vec<ProviderRecord> = records
            .iter()
            .filter(|record| self.matches_terms(record, specialty.as_deref(), location.as_deref()))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Relevance => {}
            SortOrder::FeeLowToHigh => results.sort_by_key(|r| r.consultation_fee),
            SortOrder::FeeHighToLow => results.sort_by_key(|r| Reverse(r.consultation_fee)),
            SortOrder::Rating => results.sort_by_key(|r| Reverse(r.rating)),
            SortOrder::PatientStories => results.sort_by_key(|r| Reverse(r.patient_story_count)),
            SortOrder::Experience => {
                results.sort_by_key(|r| Reverse(r.experience_years().unwrap_or(0)))
            }
        }

        results
    }

    fn matches_terms(
        &self,
        record: &ProviderRecord,
        specialty: Option<&str>,
        location: Option<&str>,
    ) -> bool {
        if let Some(term) = specialty {
            if !record.specialty.to_lowercase().contains(term) {
                return false;
            }
        }

        if let Some(term) = location {
            if !record.location.to_lowercase().contains(term) {
                return false;
            }
        }

        if let Some(flag) = self.available_today {
            if record.is_available_today != flag {
                return false;
            }
        }

        if let Some(minimum) = self.min_experience_years {
            match record.experience_years() {
                Some(years) if years >= minimum => {}
                _ => return false,
            }
        }

        true
    }
}

/// Lower-cased filter term, or `None` when the dimension is unfiltered.
fn filter_term(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    if lowered.is_empty() || lowered == "all" {
        None
    } else {
        Some(lowered)
    }
}
