use serde::{Deserialize, Serialize};

/// A single searchable doctor or clinic entry.
///
/// Field names on the wire follow the storefront's JSON contract
/// (`experience`, `clinic`, `patientStories`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(rename = "experience")]
    pub experience_label: String,
    pub location: String,
    #[serde(rename = "clinic")]
    pub clinic_name: String,
    pub consultation_fee: u32,
    /// Percentage of positive ratings, 0-100.
    pub rating: u8,
    #[serde(rename = "patientStories")]
    pub patient_story_count: u32,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "availability")]
    pub availability_label: String,
    /// Declared independently of `availability_label`.
    pub is_available_today: bool,
}

impl ProviderRecord {
    /// Years of experience taken from the first number in the experience label.
    ///
    /// ```
    /// # use carefinder_catalog::Catalog;
    /// let catalog = Catalog::builtin();
    /// let clinic = catalog.get("1").unwrap();
    /// assert_eq!(clinic.experience_label, "11 - 13 years experience");
    /// assert_eq!(clinic.experience_years(), Some(11));
    /// ```
    pub fn experience_years(&self) -> Option<u32> {
        let digits: String = self
            .experience_label
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();

        digits.parse().ok()
    }
}
