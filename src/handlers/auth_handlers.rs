use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::db::DbPool;
use crate::dto::{CreateUserDto, CurrentUserDto, LoginDto, LoginResponseDto};
use crate::errors::ApiError;
use crate::models::{User, ROLE_ADMIN, ROLE_STAFF};
use crate::repo;

/// How long a login session stays valid; injected as an extension by
/// `create_app` so handlers stay on the shared pool state
#[derive(Clone, Copy, Debug)]
pub struct SessionTtl(pub chrono::Duration);

/// The authenticated caller, attached to the request by `require_session`
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: String,
    pub username: String,
    pub role: String,
    /// The bearer token the request authenticated with
    pub token: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid session token
///
/// Expects an `Authorization: Bearer <token>` header carrying a token issued
/// by the login endpoint. On success the `CurrentUser` is attached to the
/// request for downstream handlers; otherwise the request is rejected with
/// 401 before reaching them.
pub async fn require_session(
    State(pool): State<Arc<DbPool>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&request) else {
        debug!("Missing or malformed Authorization header");
        return Err(ApiError::Unauthorized);
    };
    let token = token.to_string();

    let Some((session, user)) = repo::get_valid_session(&pool, &token).map_err(ApiError::Database)?
    else {
        debug!("Unknown or expired session token");
        return Err(ApiError::Unauthorized);
    };

    request.extensions_mut().insert(CurrentUser {
        user_id: session.get_user_id(),
        username: user.get_username(),
        role: user.get_role(),
        token,
    });

    Ok(next.run(request).await)
}

/// Handler for logging in
///
/// This function handles POST requests to `/auth/login`.
///
/// ### Returns
///
/// A bearer token with its expiry, or 401 when the credentials don't match
#[instrument(skip(pool, payload), fields(username = %payload.username))]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    Extension(SessionTtl(ttl)): Extension<SessionTtl>,
    Json(payload): Json<LoginDto>,
) -> Result<Json<LoginResponseDto>, ApiError> {
    debug!("Login attempt");

    let Some(user) = repo::verify_login(&pool, &payload.username, &payload.password)
        .map_err(ApiError::Database)?
    else {
        warn!("Failed login attempt for {}", payload.username);
        return Err(ApiError::Unauthorized);
    };

    let session = repo::create_session(&pool, &user.get_id(), ttl)
        .await
        .map_err(ApiError::Database)?;

    info!("User {} logged in", user.get_username());

    Ok(Json(LoginResponseDto {
        token: session.get_id(),
        expires_at: session.get_expires_at(),
        role: user.get_role(),
    }))
}

/// Handler for logging out
///
/// This function handles POST requests to `/auth/logout`. The session that
/// authenticated the request is deleted; the token stops working immediately.
#[instrument(skip(pool, current_user), fields(username = %current_user.username))]
pub async fn logout_handler(
    State(pool): State<Arc<DbPool>>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    repo::delete_session(&pool, &current_user.token)
        .await
        .map_err(ApiError::Database)?;

    info!("User {} logged out", current_user.username);

    Ok(Json(serde_json::json!({ "logged_out": true })))
}

/// Handler for describing the authenticated user
///
/// This function handles GET requests to `/auth/me`.
pub async fn me_handler(
    Extension(current_user): Extension<CurrentUser>,
) -> Json<CurrentUserDto> {
    Json(CurrentUserDto {
        user_id: current_user.user_id,
        username: current_user.username,
        role: current_user.role,
    })
}

/// Handler for creating a user account
///
/// This function handles POST requests to `/users`. Only admins may create
/// accounts.
///
/// ### Returns
///
/// The newly created user as JSON (without the password hash)
#[instrument(skip(pool, payload, current_user), fields(username = %payload.username, role = %payload.role))]
pub async fn create_user_handler(
    State(pool): State<Arc<DbPool>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateUserDto>,
) -> Result<Json<User>, ApiError> {
    if !current_user.is_admin() {
        warn!("Non-admin {} tried to create a user", current_user.username);
        return Err(ApiError::Forbidden);
    }

    if payload.username.trim().is_empty() {
        return Err(ApiError::Validation("Username must not be empty".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password must not be empty".to_string()));
    }
    if payload.role != ROLE_ADMIN && payload.role != ROLE_STAFF {
        return Err(ApiError::Validation(format!("Unknown role: {}", payload.role)));
    }

    match repo::create_user(&pool, &payload.username, &payload.password, &payload.role).await {
        Ok(user) => {
            info!("Created user {} with role {}", user.get_username(), user.get_role());
            Ok(Json(user))
        }
        Err(e) => {
            if e.to_string().contains("already taken") {
                Err(ApiError::Conflict(e.to_string()))
            } else {
                Err(ApiError::Database(e))
            }
        }
    }
}
