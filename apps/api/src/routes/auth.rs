//! Registration and token issuance.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::{Form, Json};
use tracing::{info, warn};

use tally_core::validation::{validate_password, validate_username};

use crate::auth::{hash_password, verify_password, AuthError};
use crate::dto::{RegisterRequest, TokenRequest, TokenResponse, UserView};
use crate::error::ApiResult;
use crate::AppState;

/// `POST /register`
///
/// Creates an account. Usernames are unique; a taken one yields 400.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<UserView>> {
    let Json(request) = payload?;

    validate_username(&request.username)?;
    validate_password(&request.password)?;

    let username = request.username.trim();
    let password = request.password;

    // Argon2 is CPU-bound
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))??;

    let user = state.db.users().create(username, &hash).await?;
    info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(Json(UserView::from(user)))
}

/// `POST /token`
///
/// OAuth2 password flow: form fields `username` and `password`.
pub async fn token(
    State(state): State<AppState>,
    payload: Result<Form<TokenRequest>, FormRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Form(request) = payload?;

    let Some(user) = state.db.users().get_by_username(request.username.trim()).await? else {
        warn!(username = %request.username, "Login for unknown user");
        return Err(AuthError::BadCredentials.into());
    };

    let password = request.password;
    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    if !valid {
        warn!(user_id = %user.id, "Wrong password");
        return Err(AuthError::BadCredentials.into());
    }

    let access_token = state.jwt.generate_access_token(&user.id, &user.username)?;
    info!(user_id = %user.id, "Access token issued");

    Ok(Json(TokenResponse::bearer(access_token)))
}
