//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// One document per game day, keyed `YYYY-MM-DD`
    pub const SCORES: &str = "scores";
    /// Per-player run statistics (keyed by normalized identity)
    pub const RUN_STATS: &str = "run_stats";
}
