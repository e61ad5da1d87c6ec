// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated players.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CompletionEvent, RunStats};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/stats", get(get_stats))
        .route("/api/game/complete", post(complete_game))
}

// ─── Player Profile ──────────────────────────────────────────

/// Current player response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub email: String,
    pub display_name: String,
    pub num_scores: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_score: u64,
}

/// Get the current player's record.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let record = state
        .db
        .get_user(&user.identity)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Player {} not found", user.identity)))?;

    Ok(Json(MeResponse {
        email: record.email,
        display_name: record.display_name,
        num_scores: record.num_scores,
        total_score: record.total_score,
    }))
}

// ─── Run Statistics ──────────────────────────────────────────

/// Statistics-modal data: streaks, history, and today's result.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    pub games_won: u32,
    /// `YYYY-MM-DD` of the most recent win, empty before the first
    pub last_win: String,
    pub current_streak: u32,
    pub max_streak: u32,
    /// Mean guesses over all wins, 2 decimals; absent before the first win
    pub average_guesses: Option<f64>,
    /// Today's guess count; absent until today's game is finished
    pub today_guesses: Option<u32>,
}

/// Get the current player's run statistics.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let stats = state
        .db
        .get_run_stats(&user.identity)
        .await?
        .unwrap_or_default();

    let today = state.clock.today();
    Ok(Json(StatsResponse {
        today_guesses: stats.today_guess_count(today),
        average_guesses: stats.average_guesses(),
        games_won: stats.games_won,
        last_win: stats.last_win,
        current_streak: stats.current_streak,
        max_streak: stats.max_streak,
    }))
}

// ─── Game Completion ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteRequest {
    /// Guesses used to finish today's game; at least 1
    pub guesses: u32,
    /// Share string for the finished game
    #[serde(default)]
    pub emoji_guesses: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompleteResponse {
    /// Whether this event newly reached the leaderboard
    pub recorded: bool,
    pub today_guesses: u32,
    pub current_streak: u32,
    /// Set when the run record was saved but the leaderboard sync failed;
    /// the player's own statistics are unaffected
    pub warning: Option<String>,
}

/// Record a finished game.
///
/// The run record is written first and is the player's source of truth; the
/// leaderboard sync failing afterwards degrades to a warning rather than an
/// error so result display is never blocked.
async fn complete_game(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>> {
    if payload.guesses < 1 {
        return Err(AppError::InvalidGuessCount(payload.guesses));
    }

    let today = state.clock.today();

    let mut stats: RunStats = state
        .db
        .get_run_stats(&user.identity)
        .await?
        .unwrap_or_default();

    if stats.record_win(today, payload.guesses, &payload.emoji_guesses) {
        state.db.set_run_stats(&user.identity, &stats).await?;
    } else {
        tracing::debug!(
            identity = %user.identity,
            "Repeat completion for today; run record unchanged"
        );
    }

    // The run record, not the request, supplies the day's guess count: a
    // replay with a different count must not change what was recorded.
    let guess_count = stats
        .today_guess_count(today)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Run record missing today's win")))?;

    let event = CompletionEvent {
        identity: user.identity.clone(),
        day: today,
        guess_count,
        display_name: user.display_name.clone(),
    };

    let (recorded, warning) = match state.scoreboard.record_completion(event).await {
        Ok(outcome) => (
            outcome == crate::services::CompletionOutcome::Recorded,
            None,
        ),
        Err(AppError::StoreUnavailable(msg)) => {
            tracing::warn!(
                identity = %user.identity,
                error = %msg,
                "Leaderboard sync failed; run record already saved"
            );
            (
                false,
                Some("Your result was saved, but the leaderboard could not be updated".to_string()),
            )
        }
        Err(other) => return Err(other),
    };

    Ok(Json(CompleteResponse {
        recorded,
        today_guesses: guess_count,
        current_streak: stats.current_streak,
        warning,
    }))
}
