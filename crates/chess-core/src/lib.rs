pub mod cursor;
pub mod error;
pub mod game_data;
pub mod highlight;
pub mod normalize;
pub mod pgn;
pub mod replay;
pub mod viewer;

pub use cursor::{reduce, NavAction, PlyCursor};
pub use error::ReplayError;
pub use game_data::{GameHeaders, MoveSequence, ParseStatus, ParsedGame, ResolvedMove};
pub use highlight::{square_highlights, Highlight};
pub use normalize::normalize;
pub use pgn::{fallback_opening, interpret, parse_game, parse_game_or_fallback};
pub use replay::{state_at, BoardState, EndLabel};
pub use viewer::GameViewer;
