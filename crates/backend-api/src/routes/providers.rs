use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use carefinder_catalog::{ProviderRecord, SearchQuery, SortOrder};
use carefinder_storefront::{book_appointment, contact_clinic, BookingOutcome, ContactOutcome};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProvidersQuery {
    /// Case-insensitive substring of the provider location. Empty or `all` matches everything.
    pub location: Option<String>,
    /// Case-insensitive substring of the specialty. Empty or `all` matches everything.
    pub specialty: Option<String>,
    #[param(value_type = Option<String>)]
    pub sort: Option<SortOrder>,
    pub available_today: Option<bool>,
    pub min_experience: Option<u32>,
}

impl ProvidersQuery {
    fn into_search(self) -> SearchQuery {
        let mut query = SearchQuery::new(
            self.location.unwrap_or_default(),
            self.specialty.unwrap_or_default(),
        );
        if let Some(available_today) = self.available_today {
            query = query.with_available_today(available_today);
        }
        if let Some(years) = self.min_experience {
            query = query.with_min_experience(years);
        }
        if let Some(sort) = self.sort {
            query = query.with_sort(sort);
        }
        query
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub experience: String,
    pub location: String,
    pub clinic: String,
    pub consultation_fee: u32,
    pub rating: u8,
    pub patient_stories: u32,
    pub image: String,
    pub availability: String,
    pub is_available_today: bool,
}

impl From<ProviderRecord> for ProviderResponse {
    fn from(value: ProviderRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            specialty: value.specialty,
            experience: value.experience_label,
            location: value.location,
            clinic: value.clinic_name,
            consultation_fee: value.consultation_fee,
            rating: value.rating,
            patient_stories: value.patient_story_count,
            image: value.image,
            availability: value.availability_label,
            is_available_today: value.is_available_today,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    /// `confirmed` or `authentication_required`.
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
}

impl From<BookingOutcome> for BookingResponse {
    fn from(value: BookingOutcome) -> Self {
        match value {
            BookingOutcome::AuthenticationRequired { message } => Self {
                status: "authentication_required".to_string(),
                message,
                patient_name: None,
                provider_name: None,
            },
            BookingOutcome::Confirmed {
                patient_name,
                provider_name,
                message,
            } => Self {
                status: "confirmed".to_string(),
                message,
                patient_name: Some(patient_name),
                provider_name: Some(provider_name),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub provider_name: String,
    pub phone: String,
    pub message: String,
}

impl From<ContactOutcome> for ContactResponse {
    fn from(value: ContactOutcome) -> Self {
        Self {
            provider_name: value.provider_name,
            phone: value.phone,
            message: value.message,
        }
    }
}

fn find_provider(state: &AppState, id: &str) -> Result<ProviderRecord, ApiError> {
    state
        .search()
        .provider(id)?
        .ok_or_else(|| ApiError::not_found("provider not found"))
}

#[utoipa::path(
    get,
    path = "/providers",
    tag = "Providers",
    params(ProvidersQuery),
    responses(
        (status = 200, description = "Providers matching the filters, in catalog order unless sorted", body = [ProviderResponse]),
        (status = 400, description = "Malformed query parameters", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to fetch doctors", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_providers(
    State(state): State<AppState>,
    params: Result<Query<ProvidersQuery>, QueryRejection>,
) -> Result<Json<Vec<ProviderResponse>>, ApiError> {
    let Query(params) = params?;
    let records = state.search().search(&params.into_search()).await?;
    Ok(Json(records.into_iter().map(ProviderResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/providers/{provider_id}",
    tag = "Providers",
    params(("provider_id" = String, Path, description = "Provider identifier")),
    responses(
        (status = 200, description = "Provider details", body = ProviderResponse),
        (status = 404, description = "Unknown provider", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to fetch doctors", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
) -> Result<Json<ProviderResponse>, ApiError> {
    let record = find_provider(&state, &provider_id)?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    post,
    path = "/providers/{provider_id}/book",
    tag = "Providers",
    params(("provider_id" = String, Path, description = "Provider identifier")),
    responses(
        (status = 200, description = "Appointment confirmed", body = BookingResponse),
        (status = 401, description = "Login required before booking", body = BookingResponse),
        (status = 404, description = "Unknown provider", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let record = find_provider(&state, &provider_id)?;
    let session = state.session().current_session()?;

    let outcome = book_appointment(session.as_ref(), &record);
    let status = if outcome.is_confirmed() {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    Ok((status, Json(outcome.into())))
}

#[utoipa::path(
    post,
    path = "/providers/{provider_id}/contact",
    tag = "Providers",
    params(("provider_id" = String, Path, description = "Provider identifier")),
    responses(
        (status = 200, description = "Clinic contact details", body = ContactResponse),
        (status = 404, description = "Unknown provider", body = crate::error::ErrorResponse)
    )
)]
pub async fn contact_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
) -> Result<Json<ContactResponse>, ApiError> {
    let record = find_provider(&state, &provider_id)?;
    Ok(Json(contact_clinic(&record).into()))
}
