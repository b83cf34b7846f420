use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ChessComError {
    #[error("User \"{0}\" not found")]
    UserNotFound(String),

    #[error("Chess.com HTTP {0}")]
    Http(StatusCode),

    #[error("Chess.com request error: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChessComPlayer {
    pub username: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub result: Option<String>,
}

/// One entry of a monthly archive, as returned by the public API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChessComGame {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pgn: Option<String>,
    #[serde(default)]
    pub end_time: i64,
    #[serde(default)]
    pub time_class: Option<String>,
    #[serde(default)]
    pub rules: Option<String>,
    pub white: ChessComPlayer,
    pub black: ChessComPlayer,
}

#[derive(Deserialize)]
struct ArchivesResponse {
    #[serde(default)]
    archives: Vec<String>,
}

#[derive(Deserialize)]
struct MonthResponse {
    #[serde(default)]
    games: Vec<ChessComGame>,
}

#[derive(Clone)]
pub struct ChessComClient {
    client: Client,
    base_url: String,
}

impl ChessComClient {
    pub fn new(config: &Config) -> Result<Self, ChessComError> {
        let client = Client::builder()
            .user_agent("PgnViewer/1.0")
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.chess_com_api_base.clone(),
        })
    }

    /// Monthly archives that contain games, as (year, month) newest-first.
    pub async fn fetch_archives(&self, username: &str) -> Result<Vec<(i32, u32)>, ChessComError> {
        let url = format!("{}/player/{}/games/archives", self.base_url, username);

        let resp = self.client.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ChessComError::UserNotFound(username.to_string()));
        }
        if !resp.status().is_success() {
            return Err(ChessComError::Http(resp.status()));
        }

        let data: ArchivesResponse = resp.json().await?;
        Ok(parse_archive_months(&data.archives))
    }

    /// Games of one monthly archive. A missing month is an empty list.
    pub async fn fetch_month(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<ChessComGame>, ChessComError> {
        let url = format!(
            "{}/player/{}/games/{}/{:02}",
            self.base_url, username, year, month
        );

        // Rate limit
        tokio::time::sleep(Duration::from_millis(100)).await;

        let resp = self.client.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }
        if !resp.status().is_success() {
            return Err(ChessComError::Http(resp.status()));
        }

        let data: MonthResponse = resp.json().await?;
        Ok(data.games)
    }
}

/// URLs look like "https://api.chess.com/pub/player/username/games/2024/03".
pub fn parse_archive_months(archives: &[String]) -> Vec<(i32, u32)> {
    let mut months: Vec<(i32, u32)> = archives
        .iter()
        .filter_map(|s| {
            let parts: Vec<&str> = s.trim_end_matches('/').rsplit('/').collect();
            let month: u32 = parts.first()?.parse().ok()?;
            let year: i32 = parts.get(1)?.parse().ok()?;
            Some((year, month))
        })
        .collect();

    months.sort_by(|a, b| b.cmp(a));
    months
}
