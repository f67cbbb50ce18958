// src/routes.rs
use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        .route("/auth/session", get(handlers::session))
        .route(
            "/polls",
            post(handlers::create_poll).get(handlers::list_polls),
        )
        .route(
            "/polls/{id}",
            get(handlers::get_poll)
                .put(handlers::update_poll)
                .delete(handlers::delete_poll),
        )
        .route("/polls/{id}/vote", post(handlers::submit_vote))
        .route("/polls/{id}/results", get(handlers::get_poll_results))
        .route("/polls/{id}/voted", get(handlers::has_user_voted))
}
