// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (player records with all-time aggregates)
//! - Scores (one document per game day)
//! - Run stats (per-player streak/history records)

use crate::db::collections;
use crate::error::AppError;
use crate::identity::Identity;
use crate::models::{CompletionEvent, DailyScoreDoc, DayState, RunStats, UserRecord};
use crate::time_utils::day_key;
use chrono::NaiveDate;
use futures_util::TryStreamExt;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Field path for one identity's entry in a day document.
///
/// Identities contain `.` and `@`, so the path segment must be quoted with
/// backticks or Firestore would treat the dots as nesting.
fn entry_field_path(identity: &Identity) -> String {
    format!("`{}`", identity.as_str())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::StoreUnavailable("Database not connected (offline mode)".to_string())
        })
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a player record by normalized identity.
    pub async fn get_user(&self, identity: &Identity) -> Result<Option<UserRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(identity.as_str())
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }

    /// Create or update a player record.
    pub async fn upsert_user(&self, user: &UserRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.email)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    /// Scan every player record (for the all-time leaderboard).
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj::<UserRecord>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?
            .try_collect::<Vec<UserRecord>>()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }

    // ─── Daily Score Operations ──────────────────────────────────

    /// Get the score document for a game day.
    pub async fn get_daily_scores(
        &self,
        day: NaiveDate,
    ) -> Result<Option<DailyScoreDoc>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SCORES)
            .obj()
            .one(&day_key(day))
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }

    /// Reserve the Pending state at session start.
    ///
    /// Merge-writes `{display_name, score: 0}` for the identity if no entry
    /// exists yet for that day; the write is masked to this one entry so
    /// other players' entries in the same document are untouched.
    ///
    /// Returns `true` if a sentinel was written, `false` if an entry
    /// (pending or recorded) already existed.
    pub async fn write_signin_sentinel(
        &self,
        day: NaiveDate,
        identity: &Identity,
        display_name: &str,
    ) -> Result<bool, AppError> {
        let key = day_key(day);

        let mut doc = self.get_daily_scores(day).await?.unwrap_or_default();
        if doc.state_for(identity) != DayState::Unrecorded {
            return Ok(false);
        }

        doc.entries.insert(
            identity.as_str().to_string(),
            crate::models::DailyEntry::pending(display_name.to_string()),
        );

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields([entry_field_path(identity)])
            .in_col(collections::SCORES)
            .document_id(&key)
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;

        tracing::debug!(identity = %identity, day = %key, "Sign-in sentinel written");
        Ok(true)
    }

    // ─── Atomic Completion Processing ────────────────────────────

    /// Atomically record a completion: transition the day entry to Recorded
    /// and fold the guess count into the player's aggregates.
    ///
    /// Both reads happen inside a Firestore transaction so a concurrent
    /// completion for the same identity/day forces a conflict instead of a
    /// double count; the two writes commit together or not at all.
    ///
    /// Returns `true` if the completion was newly recorded, `false` if the
    /// day was already Recorded (idempotent duplicate).
    pub async fn record_completion_atomic(
        &self,
        event: &CompletionEvent,
    ) -> Result<bool, AppError> {
        let key = day_key(event.day);

        // Begin a transaction
        let mut transaction = self.get_client()?.begin_transaction().await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to begin transaction: {}", e))
        })?;
        let consistency = firestore::FirestoreConsistencySelector::Transaction(
            transaction.transaction_id().clone(),
        );

        // 1. Read the day's document within the transaction.
        //    This registers it for conflict detection.
        let daily: Option<DailyScoreDoc> = self
            .get_client()?
            .clone_with_consistency_selector(consistency.clone())
            .fluent()
            .select()
            .by_id_in(collections::SCORES)
            .obj()
            .one(&key)
            .await
            .map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to read day doc in transaction: {}", e))
            })?;

        let mut daily = daily.unwrap_or_default();

        // 2. Idempotency check - a recorded day is final, skip all writes
        if daily.state_for(&event.identity) == DayState::Recorded {
            tracing::debug!(
                identity = %event.identity,
                day = %key,
                "Completion already recorded (idempotent skip)"
            );
            let _ = transaction.rollback().await;
            return Ok(false);
        }

        // 3. Read the player record within the same transaction
        let user: Option<UserRecord> = self
            .get_client()?
            .clone_with_consistency_selector(consistency)
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(event.identity.as_str())
            .await
            .map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to read user in transaction: {}", e))
            })?;

        let mut user = user.unwrap_or_else(|| {
            UserRecord::new(
                event.identity.as_str().to_string(),
                event.display_name.clone(),
                String::new(),
            )
        });

        // 4. Update both in memory
        user.apply_completion(event.guess_count, &event.display_name);
        daily.record(&event.identity, &event.display_name, event.guess_count);

        // 5. Add the player-record write to the transaction
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.email)
            .object(&user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to add user to transaction: {}", e))
            })?;

        // 6. Add the day-entry write, masked to this identity's entry
        self.get_client()?
            .fluent()
            .update()
            .fields([entry_field_path(&event.identity)])
            .in_col(collections::SCORES)
            .document_id(&key)
            .object(&daily)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to add day entry to transaction: {}", e))
            })?;

        // 7. Commit atomically
        transaction.commit().await.map_err(|e| {
            AppError::StoreUnavailable(format!("Transaction commit failed: {}", e))
        })?;

        tracing::info!(
            identity = %event.identity,
            day = %key,
            guesses = event.guess_count,
            num_scores = user.num_scores,
            "Completion recorded atomically"
        );

        Ok(true)
    }

    // ─── Run Stats Operations ────────────────────────────────────

    /// Get a player's run statistics.
    pub async fn get_run_stats(&self, identity: &Identity) -> Result<Option<RunStats>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RUN_STATS)
            .obj()
            .one(identity.as_str())
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }

    /// Store a player's run statistics.
    pub async fn set_run_stats(
        &self,
        identity: &Identity,
        stats: &RunStats,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RUN_STATS)
            .document_id(identity.as_str())
            .object(stats)
            .execute()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}
