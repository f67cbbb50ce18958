// src/polls.rs
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::authz;
use crate::error::AppError;
use crate::models::{Poll, PollWithOwnership};
use crate::validation::validate_poll_input;

const POLL_COLUMNS: &str = "id, user_id, question, options, created_at";

/// An empty or whitespace id is a caller mistake; anything that is not a
/// UUID can never match a row, which the storage layer would report as "no
/// rows" anyway.
pub(crate) fn parse_poll_id(raw: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("Poll ID is required".to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Poll not found".to_string()))
}

/// Validates and stores a new poll owned by the caller.
pub async fn create_poll(
    pool: &PgPool,
    caller: &AuthUser,
    question: &str,
    options: &[String],
) -> Result<Poll, AppError> {
    let input = validate_poll_input(question, options)?;

    let poll = sqlx::query_as::<_, Poll>(
        "INSERT INTO polls (id, user_id, question, options, created_at) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, user_id, question, options, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(caller.id)
    .bind(&input.question)
    .bind(Json(&input.options))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(poll)
}

/// The caller's own polls, newest first.
pub async fn get_user_polls(pool: &PgPool, caller: &AuthUser) -> Result<Vec<Poll>, AppError> {
    let polls = sqlx::query_as::<_, Poll>(&format!(
        "SELECT {POLL_COLUMNS} FROM polls WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(caller.id)
    .fetch_all(pool)
    .await?;

    Ok(polls)
}

/// Public read. `is_owner` reflects the (possibly anonymous) caller and is
/// informational only.
pub async fn get_poll(
    pool: &PgPool,
    caller: Option<&AuthUser>,
    poll_id: &str,
) -> Result<PollWithOwnership, AppError> {
    let id = parse_poll_id(poll_id)?;

    let poll = sqlx::query_as::<_, Poll>(&format!(
        "SELECT {POLL_COLUMNS} FROM polls WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))?;

    let is_owner = caller.map_or(false, |user| authz::is_owner(user, poll.user_id));

    Ok(PollWithOwnership { poll, is_owner })
}

/// Re-validates and updates question and options. The statement is scoped
/// by poll id AND caller id: a non-owner's update matches zero rows and
/// still reports success, so a non-error return does not mean a row
/// changed.
pub async fn update_poll(
    pool: &PgPool,
    caller: &AuthUser,
    poll_id: &str,
    question: &str,
    options: &[String],
) -> Result<(), AppError> {
    let id = parse_poll_id(poll_id)?;
    let input = validate_poll_input(question, options)?;

    sqlx::query("UPDATE polls SET question = $1, options = $2 WHERE id = $3 AND user_id = $4")
        .bind(&input.question)
        .bind(Json(&input.options))
        .bind(id)
        .bind(caller.id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Deletes a poll after checking the caller against the owner. Votes go
/// with it via the storage-level cascade.
pub async fn delete_poll(pool: &PgPool, caller: &AuthUser, poll_id: &str) -> Result<(), AppError> {
    let id = parse_poll_id(poll_id)?;

    let owner_id = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM polls WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))?;

    authz::ensure_can_delete(caller, owner_id)?;

    sqlx::query("DELETE FROM polls WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
