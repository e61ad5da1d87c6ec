// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily score document and the per-(player, day) recording state machine.
//!
//! One document per calendar day, mapping normalized identity to that day's
//! entry. A score of 0 is the sentinel "signed in, not yet finished today";
//! a positive score is final for that day and is never overwritten.

use crate::error::AppError;
use crate::identity::Identity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One player's entry in a day's score document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntry {
    pub display_name: String,
    /// 0 = enrolled but not finished; > 0 = finished with this many guesses
    pub score: u32,
}

impl DailyEntry {
    /// Sentinel entry written at sign-in.
    pub fn pending(display_name: String) -> Self {
        Self {
            display_name,
            score: 0,
        }
    }
}

/// Score document for one calendar day (`scores/{YYYY-MM-DD}`).
///
/// Serialized with the identity map flattened to the document root, so the
/// stored layout is `{identity: {display_name, score}, ...}` and a single
/// entry can be merge-written without touching its neighbors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyScoreDoc {
    #[serde(flatten)]
    pub entries: HashMap<String, DailyEntry>,
}

/// Recording state for a `(identity, day)` pair, derived from the day's
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    /// No entry for this identity
    Unrecorded,
    /// Entry exists with score 0 (sign-in sentinel)
    Pending,
    /// Entry exists with a positive score; final for this day
    Recorded,
}

impl DailyScoreDoc {
    pub fn state_for(&self, identity: &Identity) -> DayState {
        match self.entries.get(identity.as_str()) {
            None => DayState::Unrecorded,
            Some(entry) if entry.score == 0 => DayState::Pending,
            Some(_) => DayState::Recorded,
        }
    }

    /// Set a player's final score for the day.
    ///
    /// Only valid from Unrecorded or Pending; callers check `state_for`
    /// first and treat Recorded as an idempotent no-op.
    pub fn record(&mut self, identity: &Identity, display_name: &str, score: u32) {
        self.entries.insert(
            identity.as_str().to_string(),
            DailyEntry {
                display_name: display_name.to_string(),
                score,
            },
        );
    }
}

/// A "game completed" event, produced once per finished game.
#[derive(Debug, Clone)]
pub struct CompletionEvent {
    pub identity: Identity,
    pub day: NaiveDate,
    pub guess_count: u32,
    pub display_name: String,
}

impl CompletionEvent {
    /// Reject events that could never represent a finished game.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.guess_count < 1 {
            return Err(AppError::InvalidGuessCount(self.guess_count));
        }
        Ok(())
    }
}
