//! PGN interpretation: regex-based movetext clean-up plus move resolution
//! against a live position.

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::{san::San, san::SanPlus, uci::UciMove, CastlingMode, Chess, Move, Position};

use crate::game_data::{GameHeaders, MoveSequence, ParseStatus, ParsedGame, ResolvedMove};
use crate::normalize::{self, Step};

/// Shown when a transcript yields no moves at all. Presentation only.
pub const FALLBACK_OPENING: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *";

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

static HEADER_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap());
static BLANK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").unwrap());
static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";[^\n]*").unwrap());
static NAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+").unwrap());
static STRAY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.+").unwrap());
static LONG_ALGEBRAIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[KQRBNP]?([a-h][1-8])[-x:]?([a-h][1-8])=?([QRBNqrbn])?$").unwrap()
});
static BARE_PROMOTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-h][18])([QRBN])$").unwrap());

/// Movetext clean-up, applied in order.
pub const MOVETEXT_PIPELINE: [Step; 7] = [
    Step { name: "strip_comments", apply: strip_comments },
    Step { name: "strip_line_comments", apply: strip_line_comments },
    Step { name: "strip_variations", apply: strip_variations },
    Step { name: "strip_nags", apply: strip_nags },
    Step { name: "strip_stray_tags", apply: strip_stray_tags },
    Step { name: "strip_result_tokens", apply: strip_result_tokens },
    Step { name: "strip_move_numbers", apply: strip_move_numbers },
];

/// Run the full pipeline over a raw transcript.
pub fn parse_game(raw: &str) -> ParsedGame {
    let normalized = normalize::normalize(raw);
    let headers = extract_headers(&normalized);
    let moves = interpret(&normalized);
    ParsedGame {
        normalized,
        headers,
        moves,
        used_fallback: false,
    }
}

/// Like [`parse_game`], but substitutes [`fallback_opening`] when nothing
/// could be interpreted so a viewer always has a board to show.
pub fn parse_game_or_fallback(raw: &str) -> ParsedGame {
    let mut game = parse_game(raw);
    if game.moves.is_empty() {
        tracing::info!(status = ?game.moves.status(), "no moves interpreted, showing fallback opening");
        game.moves = fallback_opening();
        game.used_fallback = true;
    }
    game
}

/// The fixed Ruy Lopez line used when a transcript yields nothing.
pub fn fallback_opening() -> MoveSequence {
    interpret(FALLBACK_OPENING)
}

/// Convert normalized PGN text into resolved moves. Never fails: replay stops
/// at the first token the engine rejects and the moves before it are kept.
pub fn interpret(normalized: &str) -> MoveSequence {
    let tokens = movetext_tokens(normalized);
    if tokens.is_empty() {
        return MoveSequence::empty();
    }

    let mut pos = Chess::default();
    let mut moves = Vec::with_capacity(tokens.len());

    for token in tokens {
        let Some(resolved) = resolve_token(&pos, &token) else {
            tracing::debug!(ply = moves.len(), token = %token, "stopping at unresolvable token");
            let status = ParseStatus::Truncated {
                ply: moves.len(),
                token,
            };
            return MoveSequence::new(moves, status);
        };
        let (m, record) = resolved;
        pos.play_unchecked(m);
        moves.push(record);
    }

    MoveSequence::new(moves, ParseStatus::Complete)
}

/// SAN-like tokens of the movetext, in order.
pub fn movetext_tokens(normalized: &str) -> Vec<String> {
    let movetext = MOVETEXT_PIPELINE
        .iter()
        .fold(split_movetext(normalized).to_string(), |text, step| (step.apply)(&text));

    movetext.split_whitespace().map(str::to_string).collect()
}

/// Movetext half of the transcript. A header block ends at the first blank
/// line; text without leading headers is all movetext, so a blank line
/// inside header-less movetext does not drop the moves before it.
pub fn split_movetext(normalized: &str) -> &str {
    if !normalized.trim_start().starts_with('[') {
        return normalized;
    }
    match BLANK_LINE_RE.find(normalized) {
        Some(m) => &normalized[m.end()..],
        None => normalized,
    }
}

pub fn strip_comments(text: &str) -> String {
    COMMENT_RE.replace_all(text, " ").into_owned()
}

pub fn strip_line_comments(text: &str) -> String {
    LINE_COMMENT_RE.replace_all(text, " ").into_owned()
}

/// Drop parenthesised variations, nested ones included. An unclosed
/// variation runs to the end of the text.
pub fn strip_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(' ');
            }
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(' ');
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

pub fn strip_nags(text: &str) -> String {
    NAG_RE.replace_all(text, " ").into_owned()
}

pub fn strip_stray_tags(text: &str) -> String {
    STRAY_TAG_RE.replace_all(text, " ").into_owned()
}

/// Result markers only count as whole tokens.
pub fn strip_result_tokens(text: &str) -> String {
    text.split_whitespace()
        .filter(|t| !RESULT_TOKENS.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn strip_move_numbers(text: &str) -> String {
    MOVE_NUMBER_RE.replace_all(text, " ").into_owned()
}

/// Resolve one token against `pos`, permissively: check, mate and annotation
/// suffixes are ignored, zero-castling and long algebraic are accepted.
/// Ambiguous or illegal tokens resolve to `None`.
pub fn resolve_token(pos: &Chess, token: &str) -> Option<(Move, ResolvedMove)> {
    let cleaned = clean_token(token);
    if cleaned.is_empty() {
        return None;
    }

    let m = San::from_ascii(cleaned.as_bytes())
        .ok()
        .and_then(|san| san.to_move(pos).ok())
        .or_else(|| resolve_long_algebraic(pos, &cleaned))?;

    let UciMove::Normal { from, to, promotion } = m.to_uci(CastlingMode::Standard) else {
        return None;
    };
    let san = SanPlus::from_move(pos.clone(), m).to_string();

    Some((m, ResolvedMove { from, to, promotion, san }))
}

fn clean_token(token: &str) -> String {
    let cleaned = token
        .trim_end_matches(&['+', '#', '!', '?'][..])
        .trim_end_matches("e.p.")
        .replace("0-0-0", "O-O-O")
        .replace("0-0", "O-O");
    // `e8Q` -> `e8=Q`
    BARE_PROMOTION_RE.replace(&cleaned, "${1}=${2}").into_owned()
}

fn resolve_long_algebraic(pos: &Chess, token: &str) -> Option<Move> {
    let caps = LONG_ALGEBRAIC_RE.captures(token)?;
    let mut uci = format!("{}{}", &caps[1], &caps[2]);
    if let Some(promo) = caps.get(3) {
        uci.push_str(&promo.as_str().to_ascii_lowercase());
    }
    UciMove::from_ascii(uci.as_bytes()).ok()?.to_move(pos).ok()
}

/// Collect the known header tags of a transcript.
pub fn extract_headers(pgn: &str) -> GameHeaders {
    let mut headers = GameHeaders::default();

    for cap in HEADER_TAG_RE.captures_iter(pgn) {
        let key = &cap[1];
        let value = cap[2].to_string();
        match key {
            "White" => headers.white = Some(value),
            "Black" => headers.black = Some(value),
            "WhiteElo" => headers.white_elo = value.parse().ok(),
            "BlackElo" => headers.black_elo = value.parse().ok(),
            "Result" => headers.result = Some(value),
            "Termination" => headers.termination = Some(value),
            "Date" => headers.date = Some(value),
            "TimeControl" => headers.time_control = Some(value),
            "ECO" => headers.eco = Some(value),
            "Event" => headers.event = Some(value),
            "Link" => headers.link = Some(value),
            _ => {}
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Role, Square};

    #[test]
    fn test_interpret_basic() {
        let seq = interpret("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *");
        assert_eq!(seq.len(), 6);
        assert_eq!(seq.status(), &ParseStatus::Complete);
        assert_eq!(seq.sans(), vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);

        let last = seq.get(5).unwrap();
        assert_eq!(last.from, Square::A7);
        assert_eq!(last.to, Square::A6);
    }

    #[test]
    fn test_headers_comments_variations_nags() {
        let pgn = r#"[Event "Live Chess"]
[White "Player1"]
[Black "Player2"]
[Result "1-0"]

1. e4 {[%clk 0:09:58]} 1... e5 $1 2. Nf3 (2. f4 exf4 (2... d5)) 2... Nc6 ; main line
3. Bb5 1-0"#;

        let seq = interpret(pgn);
        assert_eq!(seq.sans(), vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_headerless_blank_line_in_movetext() {
        let seq = interpret("1. d4 d5\n\n2. c4 e6");
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn test_truncates_at_first_bad_token() {
        let seq = interpret("1. e4 e5 2. Nf3 Qxh7 3. Bc4 Nc6");
        assert_eq!(seq.len(), 3);
        assert_eq!(
            seq.status(),
            &ParseStatus::Truncated { ply: 3, token: "Qxh7".to_string() }
        );
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(interpret("").status(), &ParseStatus::Empty);
        assert_eq!(interpret("1-0").status(), &ParseStatus::Empty);

        let seq = interpret("hello world");
        assert!(seq.is_empty());
        assert!(!seq.is_complete());
    }

    #[test]
    fn test_permissive_tokens() {
        let seq = interpret("e2e4 e7-e5 Ng1f3 Nb8c6 Bc4!? Nf6?! 0-0 Bc5");
        assert_eq!(seq.len(), 8);

        let castle = seq.get(6).unwrap();
        assert_eq!(castle.san, "O-O");
        assert_eq!(castle.from, Square::E1);
        assert_eq!(castle.to, Square::G1);
    }

    #[test]
    fn test_ambiguous_san_rejected() {
        // After 5...Nc5 both white knights (c4, f3) reach d2.
        let seq = interpret("1. Nf3 Nf6 2. d3 d6 3. Nbd2 Nbd7 4. e4 e5 5. Nc4 Nc5 6. Ncd2");
        assert_eq!(seq.len(), 11);
        assert_eq!(seq.get(10).unwrap().san, "Ncd2");

        let seq = interpret("1. Nf3 Nf6 2. d3 d6 3. Nbd2 Nbd7 4. e4 e5 5. Nc4 Nc5 6. Nd2");
        assert_eq!(seq.len(), 10);
    }

    #[test]
    fn test_promotion_resolved() {
        let pgn = "1. h4 g5 2. hxg5 h6 3. gxh6 Nf6 4. h7 Ng8 5. hxg8=Q";
        let seq = interpret(pgn);
        assert_eq!(seq.len(), 9);
        let promo = seq.get(8).unwrap();
        assert_eq!(promo.promotion, Some(Role::Queen));
        assert_eq!(promo.uci(), "h7g8q");
    }

    #[test]
    fn test_promotion_without_equals_sign() {
        let seq = interpret("1. h4 g5 2. hxg5 h6 3. gxh6 Nf6 4. h7 Ng8 5. hxg8Q Rxh1 6. Qxf8+");
        assert!(seq.is_complete());
        assert_eq!(seq.len(), 11);
        assert_eq!(seq.get(8).unwrap().san, "hxg8=Q");
        assert_eq!(seq.get(8).unwrap().promotion, Some(Role::Queen));

        let seq = interpret("1. h4 g5 2. hxg5 h6 3. gxh6 Nf6 4. h7 Ng8 5. hxg8N");
        assert_eq!(seq.get(8).unwrap().promotion, Some(Role::Knight));
    }

    #[test]
    fn test_fallback_opening() {
        let game = parse_game_or_fallback("");
        assert!(game.used_fallback);
        assert_eq!(game.moves.len(), 6);

        let game = parse_game_or_fallback("1. d4");
        assert!(!game.used_fallback);
        assert_eq!(game.moves.len(), 1);
    }

    #[test]
    fn test_extract_headers() {
        let pgn = r#"[White "Player1"]
[Black "Player2"]
[WhiteElo "1500"]
[Result "0-1"]
[Termination "Player2 won by resignation"]"#;

        let headers = extract_headers(pgn);
        assert_eq!(headers.white.as_deref(), Some("Player1"));
        assert_eq!(headers.white_elo, Some(1500));
        assert_eq!(headers.black_elo, None);
        assert_eq!(headers.result(), "0-1");
        assert_eq!(headers.termination(), "Player2 won by resignation");
        assert_eq!(headers.black.as_deref(), Some("Player2"));
        assert_eq!(headers.eco, None);
    }
}
