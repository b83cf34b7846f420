//! A player's recent game history: newest archives first, newest games first.

use chrono::DateTime;
use serde::Serialize;

use crate::clients::chess_com::{ChessComClient, ChessComGame, ChessComPlayer};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub username: String,
    pub rating: Option<i32>,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub unique_id: String,
    pub url: Option<String>,
    pub white: PlayerSummary,
    pub black: PlayerSummary,
    pub end_time: i64,
    pub date: Option<String>,
    pub time_class: Option<String>,
    pub pgn: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePage {
    pub games: Vec<GameSummary>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Pull the newest `months` archives for `username`.
pub async fn fetch_recent_games(
    client: &ChessComClient,
    username: &str,
    months: usize,
) -> Result<Vec<GameSummary>, AppError> {
    let archive_months = client.fetch_archives(username).await?;
    if archive_months.is_empty() {
        return Err(AppError::NotFound("No games found for this user.".into()));
    }
    tracing::info!("{}: {} monthly archives", username, archive_months.len());

    let mut games = Vec::new();
    for (year, month) in archive_months.iter().take(months) {
        match client.fetch_month(username, *year, *month).await {
            Ok(month_games) => {
                tracing::info!("  {}/{:02}: {} games", year, month, month_games.len());
                games.extend(month_games);
            }
            Err(e) => {
                tracing::warn!("  {}/{:02}: Error - {}", year, month, e);
            }
        }
    }

    Ok(build_summaries(username, games))
}

/// Newest first, each tagged `{user}-{end_time}-{index}`. Variant games are
/// skipped since they cannot be replayed from the standard position.
pub fn build_summaries(username: &str, mut games: Vec<ChessComGame>) -> Vec<GameSummary> {
    games.retain(|g| g.rules.as_deref().unwrap_or("chess") == "chess");
    games.sort_by(|a, b| b.end_time.cmp(&a.end_time));

    games
        .into_iter()
        .enumerate()
        .map(|(index, game)| GameSummary {
            unique_id: format!("{}-{}-{}", username, game.end_time, index),
            url: game.url,
            white: player_summary(game.white),
            black: player_summary(game.black),
            end_time: game.end_time,
            date: DateTime::from_timestamp(game.end_time, 0).map(|d| d.format("%Y-%m-%d").to_string()),
            time_class: game.time_class,
            pgn: game.pgn.unwrap_or_default(),
        })
        .collect()
}

fn player_summary(player: ChessComPlayer) -> PlayerSummary {
    PlayerSummary {
        username: player.username,
        rating: player.rating,
        result: player.result,
    }
}

/// 1-based page of `games`; out-of-range pages are clamped.
pub fn paginate(games: &[GameSummary], page: usize, per_page: usize) -> GamePage {
    let per_page = per_page.max(1);
    let total_pages = games.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;

    GamePage {
        games: games.iter().skip(start).take(per_page).cloned().collect(),
        page,
        total_pages,
        total: games.len(),
    }
}
