//! Player record with all-time aggregates.

use serde::{Deserialize, Serialize};

/// Player profile and aggregates stored in Firestore.
///
/// Document ID is the normalized email; the key is duplicated into `email`
/// so collection scans can recover it.
///
/// `num_scores` and `total_score` only ever change together, by the same
/// accepted completion: a zero count always means a zero total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Normalized email (also used as document ID)
    pub email: String,
    /// Last-known display name, overwritten on every accepted update
    pub display_name: String,
    /// Count of days with a counted result
    #[serde(default)]
    pub num_scores: u32,
    /// Sum of guess counts over counted days
    #[serde(default)]
    pub total_score: u64,
    /// When the player signed up (RFC3339)
    #[serde(default)]
    pub created_at: String,
}

impl UserRecord {
    /// Fresh record with zeroed aggregates, created at sign-up.
    pub fn new(email: String, display_name: String, created_at: String) -> Self {
        Self {
            email,
            display_name,
            num_scores: 0,
            total_score: 0,
            created_at,
        }
    }

    /// Fold an accepted completion into the aggregates.
    pub fn apply_completion(&mut self, guess_count: u32, display_name: &str) {
        self.num_scores += 1;
        self.total_score += u64::from(guess_count);
        self.display_name = display_name.to_string();
    }

    /// All-time ranking metric: mean guesses minus `log2(play count)`.
    ///
    /// None when no day has been counted yet; such records are excluded from
    /// the all-time leaderboard.
    pub fn adjusted_score(&self) -> Option<f64> {
        if self.num_scores == 0 {
            return None;
        }
        let n = f64::from(self.num_scores);
        Some(self.total_score as f64 / n - n.log2())
    }
}
