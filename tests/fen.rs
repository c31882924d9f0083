mod common;

use chess_logic::test_util::replay_chess_log;
use chess_logic::{ChessGame, ChessGameStatus, ChessRules, Force, VictoryReason};
use common::*;
use pretty_assertions::assert_eq;


#[test]
fn fen_after_moves() {
    let mut game = chess_classic();
    replay_chess_log(&mut game, "1.e4").unwrap();
    assert_eq!(game.fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    replay_chess_log(&mut game, "c5").unwrap();
    assert_eq!(game.fen(), "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2");
    replay_chess_log(&mut game, "2.Nf3").unwrap();
    assert_eq!(game.fen(), "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
    replay_chess_log(&mut game, "Nc6 3.Ke2").unwrap();
    assert_eq!(game.fen(), "r1bqkbnr/pp1ppppp/2n5/2p5/4P3/5N2/PPPPKPPP/RNBQ1B1R b kq - 3 3");
}

#[test]
fn replayed_game_matches_restored_game() {
    let mut game = chess_classic();
    let log = "1.e4 e5 2.Nf3 Nc6 3.Bb5 a6 4.Ba4 Nf6 5.O-O Be7 6.Re1 b5 7.Bb3 d6 8.c3 O-O";
    for turn in log.split_whitespace() {
        replay_chess_log(&mut game, turn).unwrap();
        let restored = ChessGame::new_from_fen(ChessRules::classic(), game.fen()).unwrap();
        assert_eq!(restored.legal_moves(), game.legal_moves());
        assert_eq!(restored.fen(), game.fen());
    }
}

#[test]
fn game_can_be_over_on_construction() {
    let game = game_from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert_eq!(game.status(), ChessGameStatus::Victory(Force::Black, VictoryReason::Checkmate));
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.history().len(), 1);
}

#[test]
fn invalid_fen_is_reported() {
    let err = ChessGame::new_from_fen(ChessRules::classic(), "8/8/8/8/8/8/8/8 w - - 0 1")
        .unwrap_err();
    assert!(err.contains("kings"), "{err}");
    let err = ChessGame::new_from_fen(ChessRules::classic(), "not a fen").unwrap_err();
    assert!(err.starts_with("invalid FEN"), "{err}");
}
