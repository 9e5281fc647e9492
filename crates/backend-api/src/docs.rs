use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::providers::list_providers,
        crate::routes::providers::get_provider,
        crate::routes::providers::book_provider,
        crate::routes::providers::contact_provider,
        crate::routes::session::current_session,
        crate::routes::session::login,
        crate::routes::session::signup,
        crate::routes::session::logout,
        crate::routes::storefront::storefront,
        crate::routes::storefront::select_service,
        crate::routes::storefront::search_link
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::providers::ProviderResponse,
            crate::routes::providers::BookingResponse,
            crate::routes::providers::ContactResponse,
            crate::routes::session::LoginRequest,
            crate::routes::session::SignupRequest,
            crate::routes::session::SessionResponse,
            crate::routes::session::UserResponse,
            crate::routes::storefront::ServiceTile,
            crate::routes::storefront::StorefrontResponse,
            crate::routes::storefront::ServiceOutcomeResponse,
            crate::routes::storefront::SearchLinkResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Providers", description = "Doctor search, booking and clinic contact"),
        (name = "Session", description = "Login, signup and logout"),
        (name = "Storefront", description = "Home page tiles and search shortcuts")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
