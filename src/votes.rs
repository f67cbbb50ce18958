// src/votes.rs
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{OptionResult, PollResults, Vote};
use crate::polls::parse_poll_id;

/// Records one vote. Authenticated callers are limited to one vote per
/// poll by an existence check; anonymous votes are unrestricted.
///
/// The existence check and the insert are separate statements with no
/// transaction or uniqueness constraint between them, so two simultaneous
/// submissions from the same user can both pass the check and insert twice.
pub async fn submit_vote(
    pool: &PgPool,
    caller: Option<&AuthUser>,
    poll_id: &str,
    option_index: i32,
) -> Result<(), AppError> {
    let id = parse_poll_id(poll_id)?;
    if option_index < 0 {
        return Err(AppError::Validation(
            "Option index must be a non-negative integer".to_string(),
        ));
    }

    let options = sqlx::query_scalar::<_, sqlx::types::Json<Vec<String>>>(
        "SELECT options FROM polls WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))?;

    if option_index as usize >= options.len() {
        return Err(AppError::Validation("Invalid option selected".to_string()));
    }

    if let Some(user) = caller {
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM votes WHERE poll_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user.id)
        .fetch_optional(pool)
        .await?;

        if existing.is_some() {
            return Err(AppError::AlreadyVoted);
        }
    }

    sqlx::query(
        "INSERT INTO votes (id, poll_id, user_id, option_index, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(id)
    .bind(caller.map(|user| user.id))
    .bind(option_index)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Loads a poll and all of its votes, then tallies.
pub async fn get_poll_results(pool: &PgPool, poll_id: &str) -> Result<PollResults, AppError> {
    let id = parse_poll_id(poll_id)?;

    let row = sqlx::query_as::<_, ResultsRow>(
        "SELECT id, question, options FROM polls WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))?;

    let options = decode_options(row.options.as_ref())?;

    let votes = sqlx::query_as::<_, Vote>(
        "SELECT id, poll_id, user_id, option_index, created_at FROM votes WHERE poll_id = $1",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(tabulate(row.id, row.question, &options, &votes))
}

/// Whether the authenticated caller already voted on the poll. Anonymous
/// callers always read as not-voted.
pub async fn has_user_voted(
    pool: &PgPool,
    caller: Option<&AuthUser>,
    poll_id: &str,
) -> Result<bool, AppError> {
    let Some(user) = caller else {
        return Ok(false);
    };
    let id = parse_poll_id(poll_id)?;

    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM votes WHERE poll_id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user.id)
    .fetch_optional(pool)
    .await?;

    Ok(existing.is_some())
}

/// Results queries read `options` untyped so a row that predates the shape
/// rules still produces a diagnosable error instead of a decode failure.
#[derive(sqlx::FromRow)]
struct ResultsRow {
    id: Uuid,
    question: String,
    options: Option<Value>,
}

fn decode_options(value: Option<&Value>) -> Result<Vec<String>, AppError> {
    let Some(Value::Array(items)) = value else {
        return Err(AppError::MalformedData(
            "Poll has no valid options".to_string(),
        ));
    };
    if items.is_empty() {
        return Err(AppError::MalformedData(
            "Poll has no valid options".to_string(),
        ));
    }
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                AppError::MalformedData("Poll options must be text".to_string())
            })
        })
        .collect()
}

/// Tallies fetched vote rows against the option list.
///
/// A vote whose index is missing, negative, or past the end of the option
/// list is logged and skipped, yet still counts toward `total_votes`, so
/// option percentages are computed over a total that may include votes no
/// option received.
pub fn tabulate(poll_id: Uuid, question: String, options: &[String], votes: &[Vote]) -> PollResults {
    let mut counts = vec![0u64; options.len()];

    for vote in votes {
        match vote.option_index {
            Some(index) if index >= 0 && (index as usize) < options.len() => {
                counts[index as usize] += 1;
            }
            _ => warn!(
                vote_id = %vote.id,
                poll_id = %poll_id,
                option_index = ?vote.option_index,
                "skipping vote with invalid option index"
            ),
        }
    }

    let total_votes = votes.len() as u64;
    let options = options
        .iter()
        .zip(counts)
        .map(|(text, votes)| OptionResult {
            text: text.clone(),
            votes,
            percentage: calculate_percentage(votes, total_votes),
        })
        .collect();

    PollResults {
        poll_id,
        question,
        options,
        total_votes,
    }
}

/// Share of `votes` in `total`, rounded to the nearest whole percent.
/// Zero votes or an empty poll is always 0, never a division error.
pub fn calculate_percentage(votes: u64, total: u64) -> u32 {
    if total == 0 || votes == 0 {
        return 0;
    }
    ((votes as f64 / total as f64) * 100.0).round() as u32
}
