use server::clients::chess_com::ChessComClient;
use server::config;
use server::routes;

use axum::{routing::{get, post}, Extension, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();
    tracing::info!(
        "Chess.com API at {} ({} archive months, {} games per page)",
        config.chess_com_api_base,
        config.archive_months,
        config.games_per_page
    );

    let client = ChessComClient::new(&config).expect("Failed to build HTTP client");

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Game history
        .route("/api/players/{username}/games", get(routes::games::get_player_games))
        // Replay
        .route("/api/games/replay", post(routes::replay::replay_game))
        .route("/api/games/navigate", post(routes::replay::navigate_game))
        // Shared state
        .layer(Extension(client))
        .layer(Extension(config.clone()))
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
