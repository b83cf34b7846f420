use serde::{Deserialize, Serialize};
use shakmaty::{Role, Square};

/// Header tags consulted by the viewer. Free text, never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHeaders {
    pub white: Option<String>,
    pub black: Option<String>,
    pub white_elo: Option<i32>,
    pub black_elo: Option<i32>,
    pub result: Option<String>, // "1-0", "0-1", "1/2-1/2", "*"
    pub termination: Option<String>,
    pub date: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub event: Option<String>,
    pub link: Option<String>,
}

impl GameHeaders {
    pub fn termination(&self) -> &str {
        self.termination.as_deref().unwrap_or("")
    }

    pub fn result(&self) -> &str {
        self.result.as_deref().unwrap_or("")
    }
}

/// One ply, resolved against the position it was played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMove {
    pub from: Square,
    pub to: Square, // king destination for castling
    pub promotion: Option<Role>,
    pub san: String,
}

impl ResolvedMove {
    /// Long algebraic form, e.g. `e7e8q`.
    pub fn uci(&self) -> String {
        match self.promotion {
            Some(role) => format!("{}{}{}", self.from, self.to, role.char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

/// How far the interpreter got through the movetext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ParseStatus {
    /// No movetext tokens at all.
    Empty,
    /// Every token resolved.
    Complete,
    /// Stopped at `token`, which would have been ply `ply`.
    Truncated { ply: usize, token: String },
}

/// Ordered, finite list of resolved moves plus the parse outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSequence {
    moves: Vec<ResolvedMove>,
    status: ParseStatus,
}

impl MoveSequence {
    pub fn new(moves: Vec<ResolvedMove>, status: ParseStatus) -> Self {
        Self { moves, status }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), ParseStatus::Empty)
    }

    pub fn moves(&self) -> &[ResolvedMove] {
        &self.moves
    }

    pub fn get(&self, ply: usize) -> Option<&ResolvedMove> {
        self.moves.get(ply)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn status(&self) -> &ParseStatus {
        &self.status
    }

    /// True when the movetext was parsed to the end.
    pub fn is_complete(&self) -> bool {
        matches!(self.status, ParseStatus::Complete | ParseStatus::Empty)
    }

    pub fn sans(&self) -> Vec<&str> {
        self.moves.iter().map(|m| m.san.as_str()).collect()
    }
}

/// Result of running the whole pipeline over one raw transcript.
#[derive(Debug, Clone)]
pub struct ParsedGame {
    pub normalized: String,
    pub headers: GameHeaders,
    pub moves: MoveSequence,
    /// Set when `moves` is the fallback opening rather than the game itself.
    pub used_fallback: bool,
}
