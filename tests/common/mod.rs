// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use terraguess_api::config::Config;
use terraguess_api::db::FirestoreDb;
use terraguess_api::identity::Identity;
use terraguess_api::routes::create_router;
use terraguess_api::services::{LeaderboardService, ScoreboardService};
use terraguess_api::time_utils::FixedClock;
use terraguess_api::AppState;

/// The day the test clock is pinned to.
#[allow(dead_code)]
pub const TEST_DAY: &str = "2024-03-07";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Clock pinned to noon on TEST_DAY.
#[allow(dead_code)]
pub fn test_clock() -> FixedClock {
    FixedClock("2024-03-07T12:00:00Z".parse().unwrap())
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let scoreboard = ScoreboardService::new(db.clone());
    let leaderboard = LeaderboardService::new(db.clone(), config.rank_pending_today);

    let state = Arc::new(AppState {
        config,
        db,
        scoreboard,
        leaderboard,
        clock: Arc::new(test_clock()),
    });

    (create_router(state.clone()), state)
}

/// Mint a session token the way sign-in does.
#[allow(dead_code)]
pub fn create_test_jwt(email: &str, display_name: &str, signing_key: &[u8]) -> String {
    let identity = Identity::normalize(email).expect("test email must normalize");
    terraguess_api::middleware::auth::create_jwt(&identity, display_name, signing_key)
        .expect("Failed to create JWT")
}

/// Unique identity per test run so emulator state never bleeds between runs.
#[allow(dead_code)]
pub fn unique_email(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}+{}@example.com", tag, nanos)
}
