// src/main.rs
use std::net::SocketAddr;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pollboard::auth::AuthClient;
use pollboard::config::Config;
use pollboard::db;
use pollboard::routes;
use pollboard::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to the database");

    let state = AppState {
        pool,
        auth: AuthClient::new(&config.auth_url, &config.auth_api_key),
    };

    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(
            origin
                .parse::<HeaderValue>()
                .expect("CORS_ORIGIN must be a valid origin"),
        ),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = routes::create_routes(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server running on {addr}");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .expect("Server failed");
}
