// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod leaderboard;
pub mod scoreboard;

pub use leaderboard::{LeaderboardRow, LeaderboardService, TodayLeaderboard};
pub use scoreboard::{CompletionOutcome, ScoreboardService};
