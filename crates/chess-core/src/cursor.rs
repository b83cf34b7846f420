//! Ply cursor navigation as a pure reducer.

use serde::{Deserialize, Serialize};

/// Number of moves applied to the initial position, in `[0, total]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlyCursor(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavAction {
    Next,
    Prev,
    First,
    Last,
}

impl NavAction {
    /// Default key bindings: arrows step, `r` resets, `l` jumps to latest.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "Right" => Some(NavAction::Next),
            "ArrowLeft" | "Left" => Some(NavAction::Prev),
            k if k.eq_ignore_ascii_case("r") => Some(NavAction::First),
            k if k.eq_ignore_ascii_case("l") => Some(NavAction::Last),
            _ => None,
        }
    }
}

/// Apply `action` to `cursor` for a sequence of `total` plies.
pub fn reduce(cursor: PlyCursor, action: NavAction, total: usize) -> PlyCursor {
    match action {
        NavAction::Next => PlyCursor((cursor.0 + 1).min(total)),
        NavAction::Prev => PlyCursor(cursor.0.saturating_sub(1)),
        NavAction::First => PlyCursor(0),
        NavAction::Last => PlyCursor(total),
    }
}

impl PlyCursor {
    pub fn can_prev(self) -> bool {
        self.0 > 0
    }

    pub fn can_next(self, total: usize) -> bool {
        self.0 < total
    }
}
