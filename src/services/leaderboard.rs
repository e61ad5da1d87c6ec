// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard queries: "today" and "all-time".
//!
//! Both modes rank ascending - fewer guesses is better. The all-time metric
//! is `mean(guesses) - log2(play count)`: a raw average would favor a player
//! with one lucky low-guess game, so repeated play is rewarded by the
//! logarithmic discount.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{DailyScoreDoc, UserRecord};
use crate::time_utils::day_key;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

/// One ranked row, ready for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaderboardRow {
    pub name: String,
    /// Guess-count integer for "today", 2-decimal signed number for
    /// "all-time"
    pub score: String,
}

/// "Today" query result.
#[derive(Debug, Clone, Serialize)]
pub struct TodayLeaderboard {
    pub day: String,
    pub rows: Vec<LeaderboardRow>,
    /// Players who signed in but have not finished; only populated when
    /// score-0 entries are excluded from `rows`
    pub pending: Vec<String>,
}

/// Read-side of the engine: ranks the day document or the user collection.
#[derive(Clone)]
pub struct LeaderboardService {
    db: FirestoreDb,
    rank_pending: bool,
}

impl LeaderboardService {
    pub fn new(db: FirestoreDb, rank_pending: bool) -> Self {
        Self { db, rank_pending }
    }

    /// Rank every entry of the given day's document ascending by score.
    ///
    /// A missing day document yields an empty board, not an error.
    pub async fn today(&self, day: NaiveDate) -> Result<TodayLeaderboard> {
        let doc = self.db.get_daily_scores(day).await?.unwrap_or_default();
        Ok(rank_today(day, &doc, self.rank_pending))
    }

    /// Rank every player with at least one counted day by adjusted score.
    pub async fn all_time(&self) -> Result<Vec<LeaderboardRow>> {
        let users = self.db.list_users().await?;
        Ok(rank_all_time(users))
    }
}

/// Project a day document into ranked rows.
///
/// When `rank_pending` is set, score-0 sentinels are ranked like any other
/// entry and sort ahead of every real result; otherwise they are reported
/// separately as in-progress names.
pub fn rank_today(day: NaiveDate, doc: &DailyScoreDoc, rank_pending: bool) -> TodayLeaderboard {
    let mut scored: Vec<(&str, u32)> = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for entry in doc.entries.values() {
        if entry.score == 0 && !rank_pending {
            pending.push(entry.display_name.clone());
        } else {
            scored.push((&entry.display_name, entry.score));
        }
    }

    // Map order is arbitrary, so order by name first; the stable score sort
    // then keeps equal scores alphabetical.
    scored.sort_by(|a, b| a.0.cmp(b.0));
    scored.sort_by_key(|&(_, score)| score);
    pending.sort();

    TodayLeaderboard {
        day: day_key(day),
        rows: scored
            .into_iter()
            .map(|(name, score)| LeaderboardRow {
                name: name.to_string(),
                score: score.to_string(),
            })
            .collect(),
        pending,
    }
}

/// Rank user records by adjusted score, ascending.
///
/// Records with no counted days are excluded rather than ranked at zero.
pub fn rank_all_time(users: Vec<UserRecord>) -> Vec<LeaderboardRow> {
    let mut ranked: Vec<(String, f64)> = users
        .into_iter()
        .filter_map(|user| {
            user.adjusted_score()
                .map(|score| (user.display_name, score))
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    ranked
        .into_iter()
        .map(|(name, score)| LeaderboardRow {
            name,
            score: format!("{:.2}", score),
        })
        .collect()
}
