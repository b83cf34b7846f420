use std::collections::BTreeMap;

use axum::Json;
use chess_core::{
    parse_game_or_fallback, reduce, square_highlights, state_at, GameHeaders, Highlight,
    NavAction, ParseStatus, ParsedGame, PlyCursor,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize)]
pub struct ReplayRequest {
    pub pgn: String,
    pub cursor: Option<usize>,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub pgn: String,
    pub cursor: usize,
    pub action: NavAction,
}

#[derive(Serialize)]
pub struct MoveView {
    pub san: String,
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
}

#[derive(Serialize)]
pub struct SquarePair {
    pub from: String,
    pub to: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayResponse {
    pub headers: GameHeaders,
    pub moves: Vec<MoveView>,
    pub parse: ParseStatus,
    pub used_fallback: bool,
    pub cursor: usize,
    pub total: usize,
    pub fen: String,
    pub last_move: Option<SquarePair>,
    pub in_check: bool,
    pub end_label: String,
    pub highlights: BTreeMap<String, Highlight>,
    pub can_prev: bool,
    pub can_next: bool,
}

/// POST /api/games/replay
/// Board state of a transcript at `cursor` (default: initial position).
pub async fn replay_game(Json(req): Json<ReplayRequest>) -> Result<Json<ReplayResponse>, AppError> {
    let game = parse_game_or_fallback(&req.pgn);
    let cursor = req.cursor.unwrap_or(0);
    Ok(Json(build_response(&game, cursor)?))
}

/// POST /api/games/navigate
/// Apply one navigation action to `cursor` and return the resulting state.
pub async fn navigate_game(Json(req): Json<NavigateRequest>) -> Result<Json<ReplayResponse>, AppError> {
    let game = parse_game_or_fallback(&req.pgn);
    let total = game.moves.len();
    if req.cursor > total {
        return Err(AppError::BadRequest(format!(
            "Cursor {} out of range (sequence has {} plies)",
            req.cursor, total
        )));
    }

    let next = reduce(PlyCursor(req.cursor), req.action, total);
    Ok(Json(build_response(&game, next.0)?))
}

fn build_response(game: &ParsedGame, cursor: usize) -> Result<ReplayResponse, AppError> {
    let state = state_at(&game.moves, cursor, &game.headers)?;
    let highlights = square_highlights(&state, &game.headers);
    let ply_cursor = PlyCursor(state.cursor);

    let moves = game
        .moves
        .moves()
        .iter()
        .map(|m| MoveView {
            san: m.san.clone(),
            from: m.from.to_string(),
            to: m.to.to_string(),
            promotion: m.promotion.map(|r| r.char()),
        })
        .collect();

    Ok(ReplayResponse {
        headers: game.headers.clone(),
        moves,
        parse: game.moves.status().clone(),
        used_fallback: game.used_fallback,
        cursor: state.cursor,
        total: state.total,
        fen: state.fen(),
        last_move: state.last_move.map(|(from, to)| SquarePair {
            from: from.to_string(),
            to: to.to_string(),
        }),
        in_check: state.in_check,
        end_label: state.end_label.as_ref().map(|l| l.to_string()).unwrap_or_default(),
        highlights,
        can_prev: ply_cursor.can_prev(),
        can_next: ply_cursor.can_next(state.total),
    })
}
