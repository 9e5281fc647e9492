mod docs;
mod error;
mod middleware;
mod state;

pub mod routes;

pub use docs::ApiDoc;
pub use error::{ApiError, ErrorResponse};
pub use middleware::logging_middleware;
pub use state::AppState;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/docs/openapi.json", get(docs::openapi_json))
        // Provider routes
        .route("/providers", get(routes::providers::list_providers))
        .route("/providers/:provider_id", get(routes::providers::get_provider))
        .route(
            "/providers/:provider_id/book",
            post(routes::providers::book_provider),
        )
        .route(
            "/providers/:provider_id/contact",
            post(routes::providers::contact_provider),
        )
        // Session routes
        .route("/api/session", get(routes::session::current_session))
        .route("/api/session/login", post(routes::session::login))
        .route("/api/session/signup", post(routes::session::signup))
        .route("/api/session/logout", post(routes::session::logout))
        // Storefront routes
        .route("/api/storefront", get(routes::storefront::storefront))
        .route(
            "/api/storefront/services/:slug",
            post(routes::storefront::select_service),
        )
        .route(
            "/api/storefront/search-link",
            get(routes::storefront::search_link),
        )
        .with_state(state)
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
