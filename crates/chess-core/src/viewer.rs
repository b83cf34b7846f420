//! Single-game viewer session: one transcript, its move sequence and the
//! cursor the presentation layer moves around.

use std::collections::BTreeMap;

use crate::cursor::{reduce, NavAction, PlyCursor};
use crate::error::ReplayError;
use crate::game_data::{GameHeaders, MoveSequence, ParsedGame};
use crate::highlight::{square_highlights, Highlight};
use crate::pgn::parse_game_or_fallback;
use crate::replay::{state_at, BoardState};

type CursorListener = Box<dyn FnMut(usize, usize)>;

pub struct GameViewer {
    source: String,
    game: ParsedGame,
    cursor: PlyCursor,
    listener: Option<CursorListener>,
}

impl GameViewer {
    /// Parse `raw`, falling back to the default opening if nothing parses.
    /// The cursor starts at the initial position.
    pub fn new(raw: &str) -> Self {
        Self {
            source: raw.to_string(),
            game: parse_game_or_fallback(raw),
            cursor: PlyCursor::default(),
            listener: None,
        }
    }

    /// Called with `(cursor, total)` whenever either changes.
    pub fn on_cursor_change(&mut self, f: impl FnMut(usize, usize) + 'static) {
        self.listener = Some(Box::new(f));
        self.notify();
    }

    /// Swap in a new transcript. The sequence is only rebuilt when the text
    /// differs from the current one.
    pub fn load(&mut self, raw: &str) {
        if raw == self.source {
            return;
        }
        self.source = raw.to_string();
        self.game = parse_game_or_fallback(raw);
        self.cursor = PlyCursor::default();
        self.notify();
    }

    pub fn dispatch(&mut self, action: NavAction) -> Result<BoardState, ReplayError> {
        let next = reduce(self.cursor, action, self.total());
        if next != self.cursor {
            self.cursor = next;
            self.notify();
        }
        self.state()
    }

    pub fn state(&self) -> Result<BoardState, ReplayError> {
        state_at(&self.game.moves, self.cursor.0, &self.game.headers)
    }

    pub fn highlights(&self) -> Result<BTreeMap<String, Highlight>, ReplayError> {
        Ok(square_highlights(&self.state()?, &self.game.headers))
    }

    /// End-of-game label, empty unless the cursor is at the last ply.
    pub fn end_label(&self) -> Result<String, ReplayError> {
        Ok(self.state()?.end_label.map(|l| l.to_string()).unwrap_or_default())
    }

    pub fn cursor(&self) -> usize {
        self.cursor.0
    }

    pub fn total(&self) -> usize {
        self.game.moves.len()
    }

    pub fn moves(&self) -> &MoveSequence {
        &self.game.moves
    }

    pub fn headers(&self) -> &GameHeaders {
        &self.game.headers
    }

    pub fn used_fallback(&self) -> bool {
        self.game.used_fallback
    }

    fn notify(&mut self) {
        let (cursor, total) = (self.cursor.0, self.total());
        if let Some(listener) = self.listener.as_mut() {
            listener(cursor, total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_navigation_notifies() {
        let mut viewer = GameViewer::new("1. e4 e5 2. Nf3 Nc6");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        viewer.on_cursor_change(move |c, t| sink.borrow_mut().push((c, t)));

        viewer.dispatch(NavAction::Next).unwrap();
        viewer.dispatch(NavAction::Last).unwrap();
        viewer.dispatch(NavAction::Last).unwrap();
        viewer.dispatch(NavAction::First).unwrap();

        assert_eq!(*seen.borrow(), vec![(0, 4), (1, 4), (4, 4), (0, 4)]);
    }

    #[test]
    fn test_fallback_and_reload() {
        let mut viewer = GameViewer::new("");
        assert!(viewer.used_fallback());
        assert_eq!(viewer.total(), 6);

        viewer.dispatch(NavAction::Last).unwrap();
        viewer.load("1. d4 d5 2. c4");
        assert!(!viewer.used_fallback());
        assert_eq!(viewer.cursor(), 0);
        assert_eq!(viewer.total(), 3);

        viewer.dispatch(NavAction::Next).unwrap();
        viewer.load("1. d4 d5 2. c4");
        assert_eq!(viewer.cursor(), 1);
    }

    #[test]
    fn test_end_label_and_highlights() {
        let raw = "[Termination \"White resigns\"]\n\n1. e4 e5 2. Nf3 Nc6";
        let mut viewer = GameViewer::new(raw);
        assert_eq!(viewer.end_label().unwrap(), "");

        let state = viewer.dispatch(NavAction::Last).unwrap();
        assert!(state.is_final());
        assert_eq!(viewer.end_label().unwrap(), "White resigned");
        assert_eq!(viewer.highlights().unwrap().get("e1"), Some(&Highlight::Resignation));
    }
}
