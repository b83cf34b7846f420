//! Square highlight instructions for a board renderer.

use std::collections::BTreeMap;

use serde::Serialize;
use shakmaty::Position;

use crate::game_data::GameHeaders;
use crate::replay::{king_square, mentions_resignation, resigning_side, BoardState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Highlight {
    LastMove,
    Check,
    Resignation,
}

/// Square name → highlight. Later rules override earlier ones on the same
/// square: last move, then the checked king, then the resigning king.
pub fn square_highlights(state: &BoardState, headers: &GameHeaders) -> BTreeMap<String, Highlight> {
    let mut styles = BTreeMap::new();
    let board = state.position.board();

    if let Some((from, to)) = state.last_move {
        styles.insert(from.to_string(), Highlight::LastMove);
        styles.insert(to.to_string(), Highlight::LastMove);
    }

    if state.in_check {
        if let Some(sq) = king_square(board, state.side_to_move()) {
            styles.insert(sq.to_string(), Highlight::Check);
        }
    }

    let termination = headers.termination();
    if state.is_final() && mentions_resignation(termination) {
        if let Some(sq) = resigning_side(termination).and_then(|color| king_square(board, color)) {
            styles.insert(sq.to_string(), Highlight::Resignation);
        }
    }

    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::interpret;
    use crate::replay::state_at;

    #[test]
    fn test_last_move_squares() {
        let seq = interpret("1. e4 e5 2. Nf3");
        let state = state_at(&seq, 3, &GameHeaders::default()).unwrap();
        let hl = square_highlights(&state, &GameHeaders::default());
        assert_eq!(hl.len(), 2);
        assert_eq!(hl.get("g1"), Some(&Highlight::LastMove));
        assert_eq!(hl.get("f3"), Some(&Highlight::LastMove));
    }

    #[test]
    fn test_nothing_at_start() {
        let seq = interpret("1. e4");
        let state = state_at(&seq, 0, &GameHeaders::default()).unwrap();
        assert!(square_highlights(&state, &GameHeaders::default()).is_empty());
    }

    #[test]
    fn test_check_ring_on_side_to_move() {
        let seq = interpret("1. e4 f5 2. Qh5+");
        let state = state_at(&seq, 3, &GameHeaders::default()).unwrap();
        let hl = square_highlights(&state, &GameHeaders::default());
        assert_eq!(hl.get("e8"), Some(&Highlight::Check));
        assert_eq!(hl.get("h5"), Some(&Highlight::LastMove));
    }

    #[test]
    fn test_resignation_ring_only_at_end() {
        let headers = GameHeaders {
            termination: Some("Black resigns".to_string()),
            ..Default::default()
        };
        let seq = interpret("1. d4 d5 2. c4");

        let state = state_at(&seq, 3, &headers).unwrap();
        let hl = square_highlights(&state, &headers);
        assert_eq!(hl.get("e8"), Some(&Highlight::Resignation));

        let state = state_at(&seq, 2, &headers).unwrap();
        assert!(!square_highlights(&state, &headers).values().any(|h| *h == Highlight::Resignation));
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&Highlight::LastMove).unwrap(), "\"last-move\"");
    }
}
