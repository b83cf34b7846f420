//! PGN normalizer: textual clean-up of raw transcripts before interpretation.
//!
//! Each step is a plain text rewrite with no knowledge of chess. Steps run in
//! the order of [`PIPELINE`] and can be exercised on their own.

use std::sync::LazyLock;

use regex::Regex;

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

// A move number with no move after it, e.g. "32." or "32..." at end of text.
static DANGLING_MOVE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\d+\.(?:\.\.)?\s*$").unwrap());

/// A named text rewrite.
pub struct Step {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

pub const PIPELINE: [Step; 3] = [
    Step { name: "unify_line_endings", apply: unify_line_endings },
    Step { name: "separate_headers", apply: separate_headers },
    Step { name: "strip_dangling_move_number", apply: strip_dangling_move_number },
];

/// Clean a raw transcript into canonical text. Never fails; empty or
/// whitespace-only input yields an empty string.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    PIPELINE.iter().fold(raw.to_string(), |text, step| {
        let out = (step.apply)(&text);
        if out != text {
            tracing::trace!(step = step.name, before = text.len(), after = out.len(), "normalize step rewrote text");
        }
        out
    })
}

/// `\r\n` and lone `\r` become `\n`; outer whitespace is trimmed.
pub fn unify_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// For transcripts starting with a header tag: collapse runs of 3+ newlines
/// to a single blank line and make sure one blank line follows the header
/// block.
pub fn separate_headers(text: &str) -> String {
    if !text.starts_with('[') {
        return text.to_string();
    }

    let collapsed = EXCESS_NEWLINES.replace_all(text, "\n\n");
    let mut lines: Vec<&str> = collapsed.split('\n').collect();

    let header_lines = lines
        .iter()
        .take_while(|line| line.trim_start().starts_with('['))
        .count();

    let movetext_follows = lines
        .get(header_lines)
        .is_some_and(|line| !line.trim().is_empty());

    if movetext_follows {
        lines.insert(header_lines, "");
    }

    lines.join("\n")
}

/// Drop trailing move numbers left behind by a transcript cut off mid-move:
/// `31. Raxe1 32.` becomes `31. Raxe1`.
pub fn strip_dangling_move_number(text: &str) -> String {
    let mut out = text.trim_end().to_string();
    while let Some(m) = DANGLING_MOVE_NUMBER.find(&out) {
        out.truncate(m.start());
        out.truncate(out.trim_end().len());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \r\n\t \n"), "");
    }

    #[test]
    fn test_line_endings_unified() {
        assert_eq!(unify_line_endings("  1. e4\r\ne5\r2. Nf3 \n"), "1. e4\ne5\n2. Nf3");
    }

    #[test]
    fn test_blank_line_inserted_after_headers() {
        let raw = "[Event \"Live Chess\"]\n[Result \"1-0\"]\n1. e4 e5 1-0";
        assert_eq!(
            normalize(raw),
            "[Event \"Live Chess\"]\n[Result \"1-0\"]\n\n1. e4 e5 1-0"
        );
    }

    #[test]
    fn test_excess_blank_lines_collapsed() {
        let raw = "[Event \"x\"]\n\n\n\n1. e4";
        assert_eq!(normalize(raw), "[Event \"x\"]\n\n1. e4");
    }

    #[test]
    fn test_headerless_text_untouched_by_header_step() {
        let raw = "1. e4 e5\n\n\n2. Nf3";
        assert_eq!(separate_headers(raw), raw);
    }

    #[test]
    fn test_dangling_move_number_stripped() {
        assert_eq!(normalize("30. Qd2 Rae8 31. Raxe1 32."), "30. Qd2 Rae8 31. Raxe1");
        assert_eq!(normalize("31. Raxe1 32... "), "31. Raxe1");
        assert_eq!(normalize("1. e4 e5 2. Nf3 Nc6"), "1. e4 e5 2. Nf3 Nc6");
    }

    #[test]
    fn test_only_move_numbers_left() {
        assert_eq!(normalize("1. 2."), "");
        assert_eq!(normalize("[Event \"x\"]\n\n1."), "[Event \"x\"]");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *",
            "[White \"a\"]\r\n[Black \"b\"]\r\n1. e4 2.",
            "[White \"a\"]\n\n\n\n1. d4 d5 {comment}\n\n\n\n2. c4 3...",
            "   31. Raxe1 32.   ",
            "[Event \"x\"]\n1.",
            "1. 2. 3.",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
