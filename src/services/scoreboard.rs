// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Score update coordination.
//!
//! Handles the core workflow:
//! 1. Validate the completion event
//! 2. Serialize events for the same identity through one lock
//! 3. Apply the atomic accept path (day entry + player aggregates)
//!
//! The per-identity lock only de-duplicates triggers within this process
//! (double clicks, page reloads hitting the same instance); the Firestore
//! transaction in the accept path is what protects against other instances.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::identity::Identity;
use crate::models::CompletionEvent;
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What happened to a completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Newly recorded; aggregates were updated
    Recorded,
    /// The day was already Recorded for this identity; nothing changed
    AlreadyRecorded,
}

/// Accepts completion events and maintains the once-per-day guarantee.
#[derive(Clone)]
pub struct ScoreboardService {
    db: FirestoreDb,
    completion_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl ScoreboardService {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            completion_locks: Arc::new(DashMap::new()),
        }
    }

    /// Session-start path: reserve the Pending state for today so the UI can
    /// tell "never signed in today" from "signed in but not yet finished".
    pub async fn sign_in(
        &self,
        identity: &Identity,
        display_name: &str,
        day: NaiveDate,
    ) -> Result<()> {
        self.db
            .write_signin_sentinel(day, identity, display_name)
            .await?;
        Ok(())
    }

    /// Accept path for a completion event.
    ///
    /// Replays for an already-recorded identity/day are no-ops; no retry is
    /// performed on store failure - that policy belongs to the caller.
    pub async fn record_completion(&self, event: CompletionEvent) -> Result<CompletionOutcome> {
        event.validate()?;

        let lock = self
            .completion_locks
            .entry(event.identity.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let was_new = self.db.record_completion_atomic(&event).await?;

        if was_new {
            Ok(CompletionOutcome::Recorded)
        } else {
            Ok(CompletionOutcome::AlreadyRecorded)
        }
    }
}
