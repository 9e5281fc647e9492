use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use carefinder_auth::{LoginCredentials, SessionHandle, SessionState, SignupForm, UserSession};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// `anonymous`, `authenticating` or `authenticated`.
    pub state: String,
    pub user: Option<UserResponse>,
}

impl SessionResponse {
    fn read(handle: &SessionHandle) -> Result<Self, ApiError> {
        let state = handle.state()?;
        let user = handle.current_session()?;
        Ok(Self::new(state, user))
    }

    pub fn new(state: SessionState, user: Option<UserSession>) -> Self {
        let state = match state {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated => "authenticated",
        };
        Self {
            state: state.to_string(),
            user: user.map(UserResponse::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl From<UserSession> for UserResponse {
    fn from(value: UserSession) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            location: value.location,
        }
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse),
        (status = 500, description = "Session unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn current_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, ApiError> {
    Ok(Json(SessionResponse::read(state.session())?))
}

#[utoipa::path(
    post,
    path = "/api/session/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 400, description = "Missing email or password", body = crate::error::ErrorResponse),
        (status = 500, description = "Session could not be stored", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(payload) = payload?;
    let credentials = LoginCredentials {
        email: required("email", payload.email)?,
        password: required("password", payload.password)?,
    };

    let user = state.session().login(credentials).await?;
    Ok(Json(SessionResponse::new(
        SessionState::Authenticated,
        Some(user),
    )))
}

#[utoipa::path(
    post,
    path = "/api/session/signup",
    tag = "Session",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created and logged in", body = SessionResponse),
        (status = 400, description = "Missing signup field", body = crate::error::ErrorResponse),
        (status = 500, description = "Session could not be stored", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(payload) = payload?;
    let form = SignupForm {
        name: required("name", payload.name)?,
        email: required("email", payload.email)?,
        password: required("password", payload.password)?,
        phone: required("phone", payload.phone)?,
        location: required("location", payload.location)?,
    };

    let user = state.session().signup(form).await?;
    Ok(Json(SessionResponse::new(
        SessionState::Authenticated,
        Some(user),
    )))
}

#[utoipa::path(
    post,
    path = "/api/session/logout",
    tag = "Session",
    responses(
        (status = 200, description = "Session cleared", body = SessionResponse),
        (status = 500, description = "Stored session could not be removed", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    state.session().logout()?;
    Ok(Json(SessionResponse::read(state.session())?))
}
