//! Per-player run statistics: streaks and guess history.
//!
//! This is the player's own record of results, kept separately from the
//! leaderboard aggregates. It is written before any leaderboard sync and
//! remains the source of truth for the player's history when the sync fails.

use crate::time_utils::day_key;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Run record stored in `run_stats`, keyed by normalized identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Total games won
    #[serde(default)]
    pub games_won: u32,
    /// Day of the most recent win (`YYYY-MM-DD`)
    #[serde(default)]
    pub last_win: String,
    /// Consecutive-day win streak ending at `last_win`
    #[serde(default)]
    pub current_streak: u32,
    /// Best streak ever reached
    #[serde(default)]
    pub max_streak: u32,
    /// Guess count of each win, oldest first
    #[serde(default)]
    pub used_guesses: Vec<u32>,
    /// Share string for the latest game; opaque to the engine
    #[serde(default)]
    pub emoji_guesses: String,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            games_won: 0,
            last_win: String::new(),
            current_streak: 0,
            max_streak: 0,
            used_guesses: Vec::new(),
            emoji_guesses: String::new(),
        }
    }
}

impl RunStats {
    /// Record a win for `day`.
    ///
    /// Returns `false` without changing anything if a win is already
    /// recorded for that day; a device reports each finished game once.
    pub fn record_win(&mut self, day: NaiveDate, guesses: u32, emoji_guesses: &str) -> bool {
        let key = day_key(day);
        if self.last_win == key {
            return false;
        }

        let yesterday = day
            .checked_sub_days(Days::new(1))
            .map(day_key)
            .unwrap_or_default();
        if self.last_win == yesterday {
            self.current_streak += 1;
        } else {
            self.current_streak = 1;
        }
        self.max_streak = self.max_streak.max(self.current_streak);

        self.games_won += 1;
        self.last_win = key;
        self.used_guesses.push(guesses);
        self.emoji_guesses = emoji_guesses.to_string();

        true
    }

    /// The day's guess count, if a win is recorded for `today`.
    pub fn today_guess_count(&self, today: NaiveDate) -> Option<u32> {
        if self.last_win == day_key(today) {
            self.used_guesses.last().copied()
        } else {
            None
        }
    }

    /// Mean guesses over all wins, rounded to 2 decimals. None before the
    /// first win.
    pub fn average_guesses(&self) -> Option<f64> {
        if self.used_guesses.is_empty() {
            return None;
        }
        let sum: u32 = self.used_guesses.iter().sum();
        let avg = f64::from(sum) / self.used_guesses.len() as f64;
        Some((avg * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_win_starts_streak() {
        let mut stats = RunStats::default();
        assert!(stats.record_win(day("2024-03-07"), 4, "🟩"));

        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 1);
        assert_eq!(stats.today_guess_count(day("2024-03-07")), Some(4));
        assert_eq!(stats.today_guess_count(day("2024-03-08")), None);
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        let mut stats = RunStats::default();
        stats.record_win(day("2024-03-07"), 4, "");
        stats.record_win(day("2024-03-08"), 2, "");
        stats.record_win(day("2024-03-09"), 6, "");

        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.max_streak, 3);
        assert_eq!(stats.used_guesses, vec![4, 2, 6]);
    }

    #[test]
    fn test_gap_resets_streak_but_keeps_max() {
        let mut stats = RunStats::default();
        stats.record_win(day("2024-03-07"), 4, "");
        stats.record_win(day("2024-03-08"), 2, "");
        stats.record_win(day("2024-03-12"), 3, "");

        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 2);
    }

    #[test]
    fn test_same_day_repeat_win_is_ignored() {
        let mut stats = RunStats::default();
        assert!(stats.record_win(day("2024-03-07"), 4, ""));
        assert!(!stats.record_win(day("2024-03-07"), 2, ""));

        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.used_guesses, vec![4]);
        assert_eq!(stats.today_guess_count(day("2024-03-07")), Some(4));
    }

    #[test]
    fn test_average_guesses_rounds_to_two_decimals() {
        let mut stats = RunStats::default();
        assert_eq!(stats.average_guesses(), None);

        stats.record_win(day("2024-03-07"), 4, "");
        stats.record_win(day("2024-03-08"), 2, "");
        stats.record_win(day("2024-03-09"), 3, "");

        assert_eq!(stats.average_guesses(), Some(3.0));

        stats.record_win(day("2024-03-10"), 4, "");
        // 13 / 4 = 3.25
        assert_eq!(stats.average_guesses(), Some(3.25));
    }
}
