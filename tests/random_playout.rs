// Whole-game invariants checked over random games.

mod common;

use chess_logic::movegen;
use chess_logic::test_util::{deterministic_rng, random_playout};
use chess_logic::{ChessGame, ChessRules, Coord, Force, TurnError, TurnMove};
use pretty_assertions::assert_eq;


const NUM_GAMES: usize = 30;
const MAX_PLIES: usize = 400;

fn count_kings(game: &ChessGame) -> (usize, usize) {
    let view = game.board_view();
    let pieces = view.rows().into_iter().flatten().flatten().collect::<Vec<_>>();
    (
        pieces.iter().filter(|&&ch| ch == 'K').count(),
        pieces.iter().filter(|&&ch| ch == 'k').count(),
    )
}

#[test]
fn invariants_hold_in_random_games() {
    let mut rng = deterministic_rng();
    let mut finished = 0;
    for _ in 0..NUM_GAMES {
        let mut game = common::chess_classic();
        let plies = random_playout(&mut game, &mut rng, MAX_PLIES, |before, mv, after| {
            assert!(before.legal_moves().contains(mv.from, mv.to));
            assert_eq!(count_kings(after), (1, 1));
            let grid = after.board().grid();
            assert_eq!(after.check_state(), movegen::check_state(grid, after.active_force()));
            assert_eq!(after.active_force(), before.active_force().opponent());
            for origin in after.legal_moves().origins() {
                assert!(!after.legal_destinations(origin).is_empty());
                let piece = grid[origin].unwrap();
                assert_eq!(piece.force, after.active_force());
            }
            if after.is_over() {
                assert!(after.status_message().is_some());
            }
        });
        assert_eq!(game.history().len(), plies + 1);
        if game.is_over() {
            finished += 1;
            let mv = TurnMove { from: Coord::E1, to: Coord::E2, promote_to: None };
            assert_eq!(game.try_move(mv).unwrap_err(), TurnError::GameOver);
        }
    }
    // Random games end by a draw rule or mate well before `MAX_PLIES` most of the time.
    assert!(finished > 0);
}

#[test]
fn fen_round_trip_preserves_legal_moves() {
    let mut rng = deterministic_rng();
    for _ in 0..NUM_GAMES {
        let mut game = common::chess_classic();
        random_playout(&mut game, &mut rng, MAX_PLIES, |_, _, after| {
            let restored = ChessGame::new_from_fen(ChessRules::classic(), after.fen()).unwrap();
            assert_eq!(restored.fen(), after.fen());
            assert_eq!(restored.legal_moves(), after.legal_moves());
            assert_eq!(restored.check_state(), after.check_state());
            assert_eq!(restored.board().castling_rights(), after.board().castling_rights());
        });
    }
}

#[test]
fn moves_alternate_between_forces() {
    let mut rng = deterministic_rng();
    let mut game = common::chess_classic();
    let plies = random_playout(&mut game, &mut rng, 20, |_, _, _| {});
    assert!(plies == 20 || game.is_over());
    let expected_force = if plies % 2 == 0 { Force::White } else { Force::Black };
    assert_eq!(game.active_force(), expected_force);
    assert_eq!(game.full_move_number() as usize, 1 + plies / 2);
    assert_eq!(game.move_list().len(), plies.div_ceil(2));
    assert!(game.move_list().iter().all(|entry| entry.white.is_some()));
}
