//! Shared transcripts for the integration tests.

/// Queen's Gambit Declined, 20 plies, with Chess.com clock comments. White
/// resigned after 10...Qxe7; the transcript is cut off at "11.".
pub const QGD_WHITE_RESIGNS: &str = "[Event \"Live Chess\"]\r
[Site \"Chess.com\"]\r
[White \"alice\"]\r
[Black \"bob\"]\r
[Result \"0-1\"]\r
[WhiteElo \"1512\"]\r
[BlackElo \"1498\"]\r
[Termination \"White resigns\"]\r
1. d4 {[%clk 0:04:58.5]} 1... d5 {[%clk 0:04:59]} 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7\r
5. e3 O-O 6. Nf3 Nbd7 7. Rc1 c6 8. Bd3 dxc4 9. Bxc4 Nd5 10. Bxe7 Qxe7 11.";

pub const RUY_LOPEZ: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *";

/// Count the plies of a well-formed movetext by hand: every token that is not
/// a move number or result.
pub fn count_plies(movetext: &str) -> usize {
    movetext
        .split_whitespace()
        .filter(|t| !t.ends_with('.'))
        .filter(|t| !matches!(*t, "1-0" | "0-1" | "1/2-1/2" | "*"))
        .count()
}
