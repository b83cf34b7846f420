use axum::{extract::Path, extract::Query, Extension, Json};
use serde::Deserialize;

use crate::clients::chess_com::ChessComClient;
use crate::config::Config;
use crate::error::AppError;
use crate::history::{self, GamePage};

#[derive(Deserialize)]
pub struct GamesQuery {
    pub page: Option<usize>,
}

/// GET /api/players/{username}/games?page=N
pub async fn get_player_games(
    Extension(client): Extension<ChessComClient>,
    Extension(config): Extension<Config>,
    Path(username): Path<String>,
    Query(q): Query<GamesQuery>,
) -> Result<Json<GamePage>, AppError> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }

    let games = history::fetch_recent_games(&client, &username, config.archive_months).await?;
    let page = history::paginate(&games, q.page.unwrap_or(1), config.games_per_page);

    Ok(Json(page))
}
