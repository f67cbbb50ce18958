// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Poll {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub poll_id: Uuid,
    /// Absent for anonymous submissions.
    pub user_id: Option<Uuid>,
    /// Nullable so malformed historical rows still load; tallying skips them.
    pub option_index: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A poll plus whether the current caller owns it. The flag drives UI
/// affordances only and is never consulted for authorization.
#[derive(Debug, Serialize)]
pub struct PollWithOwnership {
    #[serde(flatten)]
    pub poll: Poll,
    pub is_owner: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OptionResult {
    pub text: String,
    pub votes: u64,
    pub percentage: u32,
}

/// Derived on every read; never persisted.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PollResults {
    pub poll_id: Uuid,
    pub question: String,
    pub options: Vec<OptionResult>,
    pub total_votes: u64,
}

#[derive(Debug, Deserialize)]
pub struct PollRequest {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub option_index: i32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}
