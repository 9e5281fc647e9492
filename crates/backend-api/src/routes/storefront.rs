use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use carefinder_storefront::{SearchLink, ServiceOutcome, StorefrontService, POPULAR_SEARCHES};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::{ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceTile {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl From<StorefrontService> for ServiceTile {
    fn from(value: StorefrontService) -> Self {
        Self {
            slug: value.slug().to_string(),
            title: value.title().to_string(),
            description: value.description().to_string(),
            badge: value.badge().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StorefrontResponse {
    pub services: Vec<ServiceTile>,
    pub popular_searches: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceOutcomeResponse {
    /// `navigate`, `notice` or `authentication_required`.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ServiceOutcome> for ServiceOutcomeResponse {
    fn from(value: ServiceOutcome) -> Self {
        let (kind, href, message) = match value {
            ServiceOutcome::Navigate { href } => ("navigate", Some(href), None),
            ServiceOutcome::Notice { message } => ("notice", None, Some(message)),
            ServiceOutcome::AuthenticationRequired { message } => {
                ("authentication_required", None, Some(message))
            }
        };
        Self {
            kind: kind.to_string(),
            href,
            message,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchLinkQuery {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchLinkResponse {
    /// Results page to open, or `null` when the query is blank.
    pub href: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/storefront",
    tag = "Storefront",
    responses(
        (status = 200, description = "Home page tiles and popular searches", body = StorefrontResponse)
    )
)]
pub async fn storefront() -> Json<StorefrontResponse> {
    Json(StorefrontResponse {
        services: StorefrontService::ALL
            .into_iter()
            .map(ServiceTile::from)
            .collect(),
        popular_searches: POPULAR_SEARCHES.iter().map(|s| s.to_string()).collect(),
    })
}

#[utoipa::path(
    post,
    path = "/api/storefront/services/{slug}",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Service tile slug, e.g. `consult-doctor`")),
    responses(
        (status = 200, description = "What the tile does for the current session", body = ServiceOutcomeResponse),
        (status = 404, description = "Unknown service", body = crate::error::ErrorResponse)
    )
)]
pub async fn select_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ServiceOutcomeResponse>, ApiError> {
    let service = StorefrontService::from_slug(&slug)
        .ok_or_else(|| ApiError::not_found(format!("unknown service `{slug}`")))?;
    let session = state.session().current_session()?;

    let outcome = service.resolve(session.as_ref());
    debug!(service = service.slug(), outcome = ?outcome, "storefront service selected");
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    get,
    path = "/api/storefront/search-link",
    tag = "Storefront",
    params(SearchLinkQuery),
    responses(
        (status = 200, description = "Navigation target for the home search box", body = SearchLinkResponse),
        (status = 400, description = "Malformed query parameters", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_link(
    params: Result<Query<SearchLinkQuery>, QueryRejection>,
) -> Result<Json<SearchLinkResponse>, ApiError> {
    let Query(params) = params?;
    let href = SearchLink::from_home_input(&params.location, &params.query).map(|link| link.href());
    Ok(Json(SearchLinkResponse { href }))
}
