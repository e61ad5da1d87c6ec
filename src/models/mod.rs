// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod score;
pub mod stats;
pub mod user;

pub use score::{CompletionEvent, DailyEntry, DailyScoreDoc, DayState};
pub use stats::RunStats;
pub use user::UserRecord;
