//! Cross-check the PGN interpreter against pgn-reader.
//!
//! Reads every game of every `*.pgn` file in a directory with pgn-reader,
//! rebuilds each game's transcript, runs it through the viewer pipeline and
//! reports games where the number of interpreted plies differs from the
//! number of legal moves pgn-reader saw.
//!
//! Usage: cargo run --bin audit-pgn -- <pgn_dir> [--show N]

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Position};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::ops::ControlFlow;

const DEFAULT_SHOW: usize = 20;

struct GameTags {
    tags: Vec<(String, String)>,
}

struct GameState {
    tags: Vec<(String, String)>,
    board: Chess,
    sans: Vec<String>,
    legal_plies: usize,
}

struct Mismatch {
    index: u64,
    expected: usize,
    interpreted: usize,
    stopped_at: Option<String>,
}

/// Visitor that rebuilds each game and compares ply counts.
struct Auditor {
    games: u64,
    mismatches: Vec<Mismatch>,
}

impl Auditor {
    fn new() -> Self {
        Self {
            games: 0,
            mismatches: Vec::new(),
        }
    }

    /// Transcript text in the shape Chess.com serves it.
    fn rebuild(state: &GameState) -> String {
        let mut text = String::new();
        for (key, value) in &state.tags {
            text.push_str(&format!("[{} \"{}\"]\n", key, value));
        }
        text.push('\n');
        for (ply, san) in state.sans.iter().enumerate() {
            if ply % 2 == 0 {
                text.push_str(&format!("{}. ", ply / 2 + 1));
            }
            text.push_str(san);
            text.push(' ');
        }
        text
    }
}

impl Visitor for Auditor {
    type Tags = GameTags;
    type Movetext = GameState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), GameTags> {
        ControlFlow::Continue(GameTags { tags: Vec::new() })
    }

    fn tag(&mut self, tags: &mut GameTags, name: &[u8], value: RawTag<'_>) -> ControlFlow<()> {
        tags.tags.push((
            String::from_utf8_lossy(name).into_owned(),
            value.decode_utf8_lossy().into_owned(),
        ));
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameTags) -> ControlFlow<(), GameState> {
        // Games from a custom start position cannot be replayed.
        if tags.tags.iter().any(|(k, _)| k == "FEN") {
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(GameState {
            tags: tags.tags,
            board: Chess::default(),
            sans: Vec::new(),
            legal_plies: 0,
        })
    }

    fn begin_variation(&mut self, _: &mut GameState) -> ControlFlow<(), Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<()> {
        state.sans.push(san_plus.to_string());

        // Count the legal prefix only; later moves are still written out.
        if state.legal_plies == state.sans.len() - 1 {
            if let Ok(mv) = san_plus.san.to_move(&state.board) {
                state.board.play_unchecked(mv);
                state.legal_plies += 1;
            }
        }

        ControlFlow::Continue(())
    }

    fn end_game(&mut self, state: GameState) {
        self.games += 1;

        let game = chess_core::parse_game(&Self::rebuild(&state));
        if game.moves.len() != state.legal_plies {
            let stopped_at = match game.moves.status() {
                chess_core::ParseStatus::Truncated { token, .. } => Some(token.clone()),
                _ => None,
            };
            self.mismatches.push(Mismatch {
                index: self.games,
                expected: state.legal_plies,
                interpreted: game.moves.len(),
                stopped_at,
            });
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pgn_dir> [--show N]", args[0]);
        std::process::exit(1);
    }

    let pgn_dir = &args[1];
    let show = match args.iter().position(|a| a == "--show") {
        Some(i) => args.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_SHOW),
        None => DEFAULT_SHOW,
    };

    let pattern = format!("{}/*.pgn", pgn_dir);
    let pgn_files: Vec<_> = glob::glob(&pattern)?.filter_map(|p| p.ok()).collect();

    if pgn_files.is_empty() {
        eprintln!("No PGN files found in {}", pgn_dir);
        std::process::exit(1);
    }

    let mut auditor = Auditor::new();

    for pgn_path in &pgn_files {
        println!("Auditing {}...", pgn_path.display());

        let file = File::open(pgn_path)?;
        let mut pgn_reader = Reader::new(BufReader::new(file));
        while pgn_reader.read_game(&mut auditor)?.is_some() {}
    }

    println!();
    println!("Games audited: {}", auditor.games);
    println!("Mismatches:    {}", auditor.mismatches.len());

    for m in auditor.mismatches.iter().take(show) {
        println!(
            "  game #{}: reader {} plies, interpreter {} plies{}",
            m.index,
            m.expected,
            m.interpreted,
            m.stopped_at
                .as_deref()
                .map(|t| format!(" (stopped at {t:?})"))
                .unwrap_or_default()
        );
    }

    Ok(())
}
