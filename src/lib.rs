// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Terraguess: score tracking for a daily geography guessing game
//!
//! This crate provides the backend API that records each player's daily
//! result exactly once and ranks players for today and all time.

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{LeaderboardService, ScoreboardService};
use time_utils::SharedClock;

pub use error::AppError;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub scoreboard: ScoreboardService,
    pub leaderboard: LeaderboardService,
    pub clock: SharedClock,
}
