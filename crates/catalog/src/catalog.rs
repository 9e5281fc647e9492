use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::info;

use crate::ProviderRecord;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate provider id `{0}`")]
    DuplicateId(String),
    #[error("provider `{id}` has rating {rating}, expected 0-100")]
    RatingOutOfRange { id: String, rating: u8 },
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("provider source unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can hand the search service a list of providers.
pub trait ProviderSource: Send + Sync {
    fn providers(&self) -> Result<&[ProviderRecord], CatalogError>;
}

/// Read-only, validated list of providers in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Arc<[ProviderRecord]>,
}

impl Catalog {
    pub fn new(records: Vec<ProviderRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
            if record.rating > 100 {
                return Err(CatalogError::RatingOutOfRange {
                    id: record.id.clone(),
                    rating: record.rating,
                });
            }
        }

        Ok(Self {
            records: records.into(),
        })
    }

    /// The storefront's canned provider list.
    pub fn builtin() -> Self {
        Self {
            records: BUILTIN_PROVIDERS.clone(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<ProviderRecord> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::new(records)?;
        info!(path = %path.display(), providers = catalog.len(), "loaded provider catalog");
        Ok(catalog)
    }

    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ProviderRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProviderSource for Catalog {
    fn providers(&self) -> Result<&[ProviderRecord], CatalogError> {
        Ok(self.records())
    }
}

#[allow(clippy::too_many_arguments)]
fn provider(
    id: &str,
    name: &str,
    experience: &str,
    location: &str,
    clinic: &str,
    fee: u32,
    rating: u8,
    stories: u32,
    image: &str,
    availability: &str,
    available_today: bool,
) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        name: name.to_string(),
        specialty: "Dermatologist".to_string(),
        experience_label: experience.to_string(),
        location: location.to_string(),
        clinic_name: clinic.to_string(),
        consultation_fee: fee,
        rating,
        patient_story_count: stories,
        image: image.to_string(),
        availability_label: availability.to_string(),
        is_available_today: available_today,
    }
}

static BUILTIN_PROVIDERS: Lazy<Arc<[ProviderRecord]>> = Lazy::new(|| {
    vec![
        provider(
            "1",
            "Aesthetic Heart Dermatology & Cardiology Clinic",
            "11 - 13 years experience",
            "Jayanagar",
            "Aesthetic Heart Dermatology & Cardiology Clinic",
            800,
            97,
            159,
            "/placeholder.svg?height=100&width=100&text=AH&bg=f0f9ff",
            "Available Today",
            true,
        ),
        provider(
            "2",
            "Dr. Sheelavathi Natraj",
            "21 years experience overall",
            "JP Nagar,Bangalore",
            "Sapphire Skin And Aesthetics Clinic + 1 more",
            800,
            94,
            1506,
            "/placeholder.svg?height=100&width=100&text=Dr.SN&bg=fef3c7",
            "Available Today",
            true,
        ),
        provider(
            "3",
            "Dr. Rajesh Kumar",
            "15 years experience overall",
            "JP Nagar,Bangalore",
            "Skin Care Clinic",
            600,
            92,
            890,
            "/placeholder.svg?height=100&width=100&text=Dr.RK&bg=dcfce7",
            "Available Tomorrow",
            false,
        ),
        provider(
            "4",
            "Dr. Priya Sharma",
            "8 years experience overall",
            "JP Nagar,Bangalore",
            "Advanced Dermatology Center",
            700,
            95,
            654,
            "/placeholder.svg?height=100&width=100&text=Dr.PS&bg=fce7f3",
            "Available Today",
            true,
        ),
    ]
    .into()
});
