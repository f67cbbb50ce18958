// src/handlers.rs
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{AuthUser, BearerToken, CurrentUser, Session};
use crate::error::AppError;
use crate::models::{
    LoginRequest, Poll, PollRequest, PollResults, PollWithOwnership, RegisterRequest, VoteRequest,
};
use crate::state::AppState;
use crate::{polls, votes};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Register a new account with the auth service.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthUser>, AppError> {
    let user = state
        .auth
        .sign_up(&body.name, &body.email, &body.password)
        .await?;
    Ok(Json(user))
}

/// Exchange email/password credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    let session = state.auth.sign_in(&body.email, &body.password).await?;
    Ok(Json(session))
}

/// Revoke the caller's session token.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    state.auth.sign_out(&token).await?;
    Ok(Json(json!({ "status": "Signed out" })))
}

/// Identity of the current caller.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<AuthUser> {
    Json(user)
}

/// The caller's session, or null once their token no longer resolves.
pub async fn session(
    State(state): State<AppState>,
    token: Option<BearerToken>,
) -> Json<Value> {
    let Some(BearerToken(token)) = token else {
        return Json(json!({ "session": null }));
    };
    match state.auth.get_user(&token).await {
        Ok(user) => Json(json!({ "session": { "access_token": token, "user": user } })),
        Err(_) => Json(json!({ "session": null })),
    }
}

/// Create a poll owned by the caller.
pub async fn create_poll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<PollRequest>,
) -> Result<Json<Poll>, AppError> {
    let poll = polls::create_poll(&state.pool, &user, &body.question, &body.options).await?;
    Ok(Json(poll))
}

/// List the caller's polls, newest first.
pub async fn list_polls(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Poll>>, AppError> {
    let polls = polls::get_user_polls(&state.pool, &user).await?;
    Ok(Json(polls))
}

/// Fetch a single poll. Works without authentication.
pub async fn get_poll(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<PollWithOwnership>, AppError> {
    let caller = user.as_ref().map(|current| &current.0);
    let poll = polls::get_poll(&state.pool, caller, &id).await?;
    Ok(Json(poll))
}

/// Update a poll's question and options.
pub async fn update_poll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<PollRequest>,
) -> Result<Json<Value>, AppError> {
    polls::update_poll(&state.pool, &user, &id, &body.question, &body.options).await?;
    Ok(Json(json!({ "status": "Poll updated" })))
}

/// Delete a poll (owner or admin).
pub async fn delete_poll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    polls::delete_poll(&state.pool, &user, &id).await?;
    Ok(Json(json!({ "status": "Poll deleted" })))
}

/// Record a vote. Anonymous voting is allowed.
pub async fn submit_vote(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> Result<Json<Value>, AppError> {
    let caller = user.as_ref().map(|current| &current.0);
    votes::submit_vote(&state.pool, caller, &id, body.option_index).await?;
    Ok(Json(json!({ "status": "Vote recorded" })))
}

/// Aggregated results for a poll.
pub async fn get_poll_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PollResults>, AppError> {
    let results = votes::get_poll_results(&state.pool, &id).await?;
    Ok(Json(results))
}

/// Whether the caller already voted on the poll.
pub async fn has_user_voted(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let caller = user.as_ref().map(|current| &current.0);
    let has_voted = votes::has_user_voted(&state.pool, caller, &id).await?;
    Ok(Json(json!({ "has_voted": has_voted })))
}
