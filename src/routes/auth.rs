// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-up, sign-in and logout routes.
//!
//! Sign-in doubles as the session-start path: it reserves today's Pending
//! entry so the day's board can show who is still playing.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::identity::Identity;
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::UserRecord;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/logout", get(logout))
}

#[derive(Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new player and reserve today's Pending entry.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<SignUpResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let identity = Identity::normalize(&payload.email)?;

    if state.db.get_user(&identity).await?.is_some() {
        return Err(AppError::BadRequest(
            "This email is already registered; sign in instead".to_string(),
        ));
    }

    let user = UserRecord::new(
        identity.as_str().to_string(),
        payload.name.clone(),
        format_utc_rfc3339(state.clock.now()),
    );
    state.db.upsert_user(&user).await?;

    state
        .scoreboard
        .sign_in(&identity, &payload.name, state.clock.today())
        .await?;

    tracing::info!(identity = %identity, "Player signed up");

    Ok(Json(SignUpResponse {
        success: true,
        message: "Sign up successful! Now sign in.".to_string(),
    }))
}

#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub display_name: String,
}

/// Start a session for a registered player.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignInRequest>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let identity = Identity::normalize(&payload.email)?;

    let user = state
        .db
        .get_user(&identity)
        .await?
        .ok_or_else(|| AppError::NotFound("No player found with this email".to_string()))?;

    // Session-start sentinel: no-op if today already has an entry
    state
        .scoreboard
        .sign_in(&identity, &user.display_name, state.clock.today())
        .await?;

    let jwt = create_jwt(&identity, &user.display_name, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, jwt.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build();

    tracing::info!(identity = %identity, "Player signed in");

    Ok((
        jar.add(cookie),
        Json(SignInResponse {
            token: jwt,
            display_name: user.display_name,
        }),
    ))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// End the session by clearing the cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let removal = Cookie::build(SESSION_COOKIE).path("/").build();
    (
        jar.remove(removal),
        Json(LogoutResponse { success: true }),
    )
}
