use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_METHOD, CONTENT_TYPE, ORIGIN,
        },
        Method, Request, StatusCode,
    },
    response::{IntoResponse, Response},
    Json, Router,
};
use carefinder_api::{build_router, routes, ApiError, AppState};
use carefinder_auth::{FileStorage, SessionStorage, SessionStore};
use carefinder_catalog::{Catalog, CatalogError, ProviderRecord, ProviderSource, SearchService};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

type TestResult<T = ()> = anyhow::Result<T>;

const NAMESPACE: &str = "healthcare_user";

struct TestContext {
    _temp_dir: TempDir,
    storage: FileStorage,
    store: SessionStore,
    state: AppState,
}

impl TestContext {
    fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let storage = FileStorage::new(temp_dir.path().join("session"));
        let store = SessionStore::with_namespace(storage.clone(), NAMESPACE, Duration::ZERO);
        let search = SearchService::new(Catalog::builtin(), Duration::ZERO);
        let state = AppState::from_store(search, &store);

        Ok(Self {
            _temp_dir: temp_dir,
            storage,
            store,
            state,
        })
    }

    fn state(&self) -> AppState {
        self.state.clone()
    }

    fn router(&self) -> Router {
        build_router(self.state())
    }

    async fn get(&self, uri: &str) -> TestResult<Response> {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        Ok(self.router().oneshot(request).await?)
    }

    async fn post(&self, uri: &str, payload: Option<Value>) -> TestResult<Response> {
        let builder = Request::builder().method(Method::POST).uri(uri);
        let request = match payload {
            Some(payload) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload)?))?,
            None => builder.body(Body::empty())?,
        };
        Ok(self.router().oneshot(request).await?)
    }

    async fn login(&self) -> TestResult<()> {
        let response = self
            .post(
                "/api/session/login",
                Some(json!({ "email": "a@b.com", "password": "pw" })),
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}

async fn json_body(response: Response) -> TestResult<Value> {
    let body = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&body)?)
}

fn ids(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

mod router_tests {
    use super::*;

    #[tokio::test]
    async fn build_router_registers_health_route() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx.get("/health").await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(payload["status"], "ok");
        Ok(())
    }

    #[tokio::test]
    async fn build_router_serves_openapi_document() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx.get("/docs/openapi.json").await?;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(
            content_type.contains("application/json"),
            "expected OpenAPI JSON content-type, got {}",
            content_type
        );

        let payload = json_body(response).await?;
        assert!(payload["paths"]["/providers"].is_object());
        assert!(payload["paths"]["/api/session/login"].is_object());
        Ok(())
    }

    #[tokio::test]
    async fn cors_layer_allows_get_and_post() -> TestResult {
        let ctx = TestContext::new()?;
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/providers")
            .header(ORIGIN, "https://example.com")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())?;

        let response = ctx.router().oneshot(request).await?;
        let status = response.status();
        assert!(
            matches!(status, StatusCode::NO_CONTENT | StatusCode::OK),
            "expected CORS preflight to return 204 or 200, got {}",
            status
        );

        let allow_origin = response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert_eq!(allow_origin, "*");

        let allow_methods = response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_METHODS)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_uppercase();
        assert!(allow_methods.contains("GET") && allow_methods.contains("POST"));
        Ok(())
    }
}

mod provider_route_tests {
    use super::*;

    #[tokio::test]
    async fn list_providers_filters_by_location_and_specialty() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx
            .get("/providers?location=JP%20Nagar&specialty=Dermatologist")
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(ids(&payload), ["2", "3", "4"]);
        assert!(payload[0]["consultationFee"].is_number());
        assert!(payload[0]["patientStories"].is_number());
        assert!(payload[0]["isAvailableToday"].is_boolean());
        Ok(())
    }

    #[tokio::test]
    async fn list_providers_without_filters_returns_catalog() -> TestResult {
        let ctx = TestContext::new()?;

        let plain = json_body(ctx.get("/providers").await?).await?;
        let all = json_body(ctx.get("/providers?location=all&specialty=ALL").await?).await?;

        assert_eq!(ids(&plain), ["1", "2", "3", "4"]);
        assert_eq!(plain, all);
        Ok(())
    }

    #[tokio::test]
    async fn list_providers_applies_refinements() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx
            .get("/providers?location=JP%20Nagar&available_today=true&sort=fee_low_to_high")
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ids(&json_body(response).await?), ["4", "2"]);
        Ok(())
    }

    #[tokio::test]
    async fn list_providers_rejects_unknown_sort() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx.get("/providers?sort=cheapest").await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = json_body(response).await?;
        assert!(payload["error"].as_str().is_some_and(|m| !m.is_empty()));
        Ok(())
    }

    #[tokio::test]
    async fn list_providers_rejects_malformed_flag_as_json() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx.get("/providers?available_today=yes").await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = json_body(response).await?;
        assert!(payload["error"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn get_provider_returns_record_or_404() -> TestResult {
        let ctx = TestContext::new()?;

        let found = ctx.get("/providers/3").await?;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(json_body(found).await?["id"], "3");

        let missing = ctx.get("/providers/99").await?;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(missing).await?["error"], "provider not found");
        Ok(())
    }

    #[tokio::test]
    async fn booking_requires_login() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx.post("/providers/2/book", None).await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let payload = json_body(response).await?;
        assert_eq!(payload["status"], "authentication_required");
        assert_eq!(payload["message"], "Please login to book an appointment");
        Ok(())
    }

    #[tokio::test]
    async fn booking_confirms_for_logged_in_user() -> TestResult {
        let ctx = TestContext::new()?;
        ctx.login().await?;

        let response = ctx.post("/providers/2/book", None).await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(payload["status"], "confirmed");
        assert_eq!(payload["patient_name"], "Shivam");
        assert_eq!(payload["provider_name"], "Dr. Sheelavathi Natraj");
        Ok(())
    }

    #[tokio::test]
    async fn contact_returns_clinic_phone_without_login() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx.post("/providers/1/contact", None).await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(payload["phone"], "+91 80-XXXX-XXXX");
        Ok(())
    }

    struct OfflineSource;

    impl ProviderSource for OfflineSource {
        fn providers(&self) -> Result<&[ProviderRecord], CatalogError> {
            Err(CatalogError::Unavailable("catalog offline".into()))
        }
    }

    #[tokio::test]
    async fn query_failure_maps_to_generic_500() -> TestResult {
        let ctx = TestContext::new()?;
        let offline = SearchService::new(OfflineSource, Duration::ZERO);
        let router = build_router(AppState::from_store(offline, &ctx.store));

        let response = router
            .oneshot(Request::builder().uri("/providers").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = json_body(response).await?;
        assert_eq!(payload["error"], "Failed to fetch doctors");
        Ok(())
    }
}

mod session_route_tests {
    use super::*;

    #[tokio::test]
    async fn session_starts_anonymous() -> TestResult {
        let ctx = TestContext::new()?;
        let payload = json_body(ctx.get("/api/session").await?).await?;

        assert_eq!(payload["state"], "anonymous");
        assert!(payload["user"].is_null());
        Ok(())
    }

    #[tokio::test]
    async fn login_publishes_and_persists_session() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx
            .post(
                "/api/session/login",
                Some(json!({ "email": "a@b.com", "password": "anything" })),
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(payload["state"], "authenticated");
        assert_eq!(payload["user"]["name"], "Shivam");
        assert_eq!(payload["user"]["phone"], "+91 9876543210");
        assert_eq!(payload["user"]["location"], "Bangalore");

        assert!(ctx.storage.get(NAMESPACE)?.is_some());
        let current = json_body(ctx.get("/api/session").await?).await?;
        assert_eq!(current["user"]["email"], "a@b.com");
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_missing_fields() -> TestResult {
        let ctx = TestContext::new()?;

        let response = ctx
            .post("/api/session/login", Some(json!({ "email": "a@b.com" })))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await?["error"], "password is required");

        let blank = ctx
            .post(
                "/api/session/login",
                Some(json!({ "email": "  ", "password": "pw" })),
            )
            .await?;
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ctx.store.current_session(), None);
        Ok(())
    }

    #[tokio::test]
    async fn login_without_json_body_returns_error_object() -> TestResult {
        let ctx = TestContext::new()?;

        let response = ctx.post("/api/session/login", None).await?;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(json_body(response).await?["error"].is_string());
        assert_eq!(ctx.store.current_session(), None);
        Ok(())
    }

    #[tokio::test]
    async fn signup_uses_submitted_profile() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx
            .post(
                "/api/session/signup",
                Some(json!({
                    "name": "Priya",
                    "email": "priya@example.com",
                    "password": "pw",
                    "phone": "+91 9000000000",
                    "location": "JP Nagar"
                })),
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(payload["user"]["name"], "Priya");
        assert_eq!(payload["user"]["location"], "JP Nagar");
        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_missing_phone() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx
            .post(
                "/api/session/signup",
                Some(json!({
                    "name": "Priya",
                    "email": "priya@example.com",
                    "password": "pw",
                    "location": "JP Nagar"
                })),
            )
            .await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await?["error"], "phone is required");
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_session_and_storage() -> TestResult {
        let ctx = TestContext::new()?;
        ctx.login().await?;

        let response = ctx.post("/api/session/logout", None).await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(payload["state"], "anonymous");
        assert_eq!(ctx.storage.get(NAMESPACE)?, None);

        let booking = ctx.post("/providers/2/book", None).await?;
        assert_eq!(booking.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn handlers_fail_fast_once_store_is_dropped() -> TestResult {
        let ctx = TestContext::new()?;
        let TestContext {
            _temp_dir,
            store,
            state,
            ..
        } = ctx;
        drop(store);

        let result = routes::session::current_session(State(state)).await;
        let error = result.expect_err("dropped store must fail");
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.message.contains("outside of its provider scope"));
        Ok(())
    }
}

mod storefront_route_tests {
    use super::*;

    #[tokio::test]
    async fn storefront_lists_tiles_and_popular_searches() -> TestResult {
        let Json(payload) = routes::storefront::storefront().await;

        assert_eq!(payload.services.len(), 6);
        assert_eq!(payload.services[0].slug, "consult-doctor");
        assert_eq!(
            payload.popular_searches,
            [
                "Dermatologist",
                "Pediatrician",
                "Gynecologist/Obstetrician",
                "Orthopedist"
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn consult_tile_navigates_to_general_physician() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx
            .post("/api/storefront/services/consult-doctor", None)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await?;
        assert_eq!(payload["kind"], "navigate");
        assert_eq!(payload["href"], "/doctors?specialty=General%20Physician");
        Ok(())
    }

    #[tokio::test]
    async fn medical_records_tile_is_session_gated() -> TestResult {
        let ctx = TestContext::new()?;

        let anonymous = json_body(
            ctx.post("/api/storefront/services/view-medical-records", None)
                .await?,
        )
        .await?;
        assert_eq!(anonymous["kind"], "authentication_required");

        ctx.login().await?;
        let signed_in = json_body(
            ctx.post("/api/storefront/services/view-medical-records", None)
                .await?,
        )
        .await?;
        assert_eq!(signed_in["kind"], "notice");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_tile_is_not_found() -> TestResult {
        let ctx = TestContext::new()?;
        let response = ctx.post("/api/storefront/services/teleport", None).await?;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn search_link_encodes_home_input() -> TestResult {
        let ctx = TestContext::new()?;

        let link = json_body(
            ctx.get("/api/storefront/search-link?location=JP%20Nagar&query=Dermatologist")
                .await?,
        )
        .await?;
        assert_eq!(
            link["href"],
            "/doctors?location=JP%20Nagar&specialty=Dermatologist"
        );

        let blank = json_body(
            ctx.get("/api/storefront/search-link?location=JP%20Nagar&query=%20%20")
                .await?,
        )
        .await?;
        assert!(blank["href"].is_null());
        Ok(())
    }
}

mod error_handling_tests {
    use super::*;

    #[tokio::test]
    async fn api_error_into_response_sets_status_and_body() -> TestResult {
        let response = ApiError::bad_request("missing payload").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload = json_body(response).await?;
        assert_eq!(payload["error"], "missing payload");
        Ok(())
    }
}
