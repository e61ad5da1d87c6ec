// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard query routes.

use crate::error::Result;
use crate::services::{LeaderboardRow, TodayLeaderboard};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard/today", get(get_today))
        .route("/api/leaderboard/all-time", get(get_all_time))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RowResponse {
    pub name: String,
    pub score: String,
}

impl From<LeaderboardRow> for RowResponse {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            name: row.name,
            score: row.score,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TodayResponse {
    pub day: String,
    pub rows: Vec<RowResponse>,
    /// Players signed in but still playing; empty when pending entries are
    /// ranked in `rows` instead
    pub pending: Vec<String>,
}

impl From<TodayLeaderboard> for TodayResponse {
    fn from(board: TodayLeaderboard) -> Self {
        Self {
            day: board.day,
            rows: board.rows.into_iter().map(RowResponse::from).collect(),
            pending: board.pending,
        }
    }
}

/// Today's board, ascending by guess count.
async fn get_today(State(state): State<Arc<AppState>>) -> Result<Json<TodayResponse>> {
    let board = state.leaderboard.today(state.clock.today()).await?;
    Ok(Json(board.into()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AllTimeResponse {
    pub rows: Vec<RowResponse>,
}

/// All-time board, ascending by adjusted score.
async fn get_all_time(State(state): State<Arc<AppState>>) -> Result<Json<AllTimeResponse>> {
    let rows = state.leaderboard.all_time().await?;
    Ok(Json(AllTimeResponse {
        rows: rows.into_iter().map(RowResponse::from).collect(),
    }))
}
