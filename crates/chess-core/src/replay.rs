//! Board state at a ply, derived by replaying the move sequence from the
//! initial position. Nothing is cached between calls.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use shakmaty::{
    fen::Fen, uci::UciMove, Board, Chess, Color, EnPassantMode, File, Position, Rank, Role, Square,
};

use crate::error::ReplayError;
use crate::game_data::{GameHeaders, MoveSequence};

const RECOGNIZED_RESULTS: [&str; 3] = ["1-0", "0-1", "1/2-1/2"];

/// How the game ended, shown only at the final ply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum EndLabel {
    Checkmate,
    Resigned(Color),
    Resignation,
    Stalemate,
    Draw,
    Result(String),
}

impl fmt::Display for EndLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndLabel::Checkmate => f.write_str("Checkmate"),
            EndLabel::Resigned(Color::White) => f.write_str("White resigned"),
            EndLabel::Resigned(Color::Black) => f.write_str("Black resigned"),
            EndLabel::Resignation => f.write_str("Resignation"),
            EndLabel::Stalemate => f.write_str("Stalemate"),
            EndLabel::Draw => f.write_str("Draw"),
            EndLabel::Result(result) => f.write_str(result),
        }
    }
}

impl From<EndLabel> for String {
    fn from(label: EndLabel) -> Self {
        label.to_string()
    }
}

/// Derived view of the game after the first `cursor` moves.
#[derive(Debug, Clone)]
pub struct BoardState {
    pub position: Chess,
    pub cursor: usize,
    pub total: usize,
    pub last_move: Option<(Square, Square)>,
    pub in_check: bool,
    pub end_label: Option<EndLabel>,
}

impl BoardState {
    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    pub fn side_to_move(&self) -> Color {
        self.position.turn()
    }

    pub fn is_final(&self) -> bool {
        self.cursor == self.total
    }
}

/// Replay `seq[..cursor]` and derive check status, last move and end label.
pub fn state_at(
    seq: &MoveSequence,
    cursor: usize,
    headers: &GameHeaders,
) -> Result<BoardState, ReplayError> {
    if cursor > seq.len() {
        return Err(ReplayError::OutOfRange {
            cursor,
            len: seq.len(),
        });
    }

    let mut pos = Chess::default();
    let mut seen: HashMap<String, u32> = HashMap::new();
    let mut repeated = false;
    *seen.entry(repetition_key(&pos)).or_default() += 1;

    for (ply, mv) in seq.moves()[..cursor].iter().enumerate() {
        let uci = UciMove::Normal {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        };
        let m = uci.to_move(&pos).map_err(|_| {
            tracing::error!(ply, uci = %mv.uci(), "resolved move rejected during replay");
            ReplayError::EngineInvariant {
                ply,
                uci: mv.uci(),
            }
        })?;
        pos.play_unchecked(m);

        let count = seen.entry(repetition_key(&pos)).or_default();
        *count += 1;
        repeated |= *count >= 3;
    }

    let last_move = cursor
        .checked_sub(1)
        .and_then(|ply| seq.get(ply))
        .map(|mv| (mv.from, mv.to));

    let end_label = if cursor == seq.len() {
        end_label(&pos, repeated, headers)
    } else {
        None
    };

    Ok(BoardState {
        in_check: pos.is_check(),
        position: pos,
        cursor,
        total: seq.len(),
        last_move,
        end_label,
    })
}

/// Position identity for repetition: placement, side, castling, en passant.
fn repetition_key(pos: &Chess) -> String {
    let fen = Fen::from_position(pos, EnPassantMode::Legal).to_string();
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

fn end_label(pos: &Chess, repeated: bool, headers: &GameHeaders) -> Option<EndLabel> {
    let termination = headers.termination();

    if pos.is_checkmate() {
        return Some(EndLabel::Checkmate);
    }
    if mentions_resignation(termination) {
        return Some(match resigning_side(termination) {
            Some(color) => EndLabel::Resigned(color),
            None => EndLabel::Resignation,
        });
    }
    if pos.is_stalemate() {
        return Some(EndLabel::Stalemate);
    }
    if pos.is_insufficient_material() || repeated || pos.halfmoves() >= 100 {
        return Some(EndLabel::Draw);
    }

    let result = headers.result();
    RECOGNIZED_RESULTS
        .contains(&result)
        .then(|| EndLabel::Result(result.to_string()))
}

pub fn mentions_resignation(termination: &str) -> bool {
    termination.to_lowercase().contains("resign")
}

/// Which side resigned according to a Termination header, if it says.
pub fn resigning_side(termination: &str) -> Option<Color> {
    let lower = termination.to_lowercase();
    if !lower.contains("resign") {
        return None;
    }
    if lower.contains("white") {
        Some(Color::White)
    } else if lower.contains("black") {
        Some(Color::Black)
    } else {
        None
    }
}

/// Square of `color`'s king, scanning rank 8 down to rank 1, file a to h.
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    (0..8u32).rev().find_map(|rank| {
        (0..8u32).find_map(|file| {
            let sq = Square::from_coords(File::new(file), Rank::new(rank));
            board
                .piece_at(sq)
                .filter(|p| p.role == Role::King && p.color == color)
                .map(|_| sq)
        })
    })
}
