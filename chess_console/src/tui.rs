use chess_logic::coord::{Col, Coord, Row};
use chess_logic::grid::BoardView;
use chess_logic::piece::{piece_from_ascii, piece_to_pictogram};
use chess_logic::{ChessGame, CheckState, Force};
use console::Style;
use itertools::Itertools;

use crate::config::Charset;


fn format_square(ch: char) -> String { format!(" {ch} ") }

fn render_piece(fen_char: Option<char>, charset: Charset) -> char {
    match (fen_char, charset) {
        (None, _) => ' ',
        (Some(ch), Charset::Ascii) => ch,
        (Some(ch), Charset::Unicode) => match piece_from_ascii(ch) {
            Some((kind, force)) => piece_to_pictogram(kind, force),
            None => ch,
        },
    }
}

fn render_grid(
    view: &BoardView, charset: Charset, highlighted: &[Coord], checked_king: Option<Coord>,
) -> String {
    let colors = [
        Style::new().color256(233).on_color256(222),
        Style::new().color256(233).on_color256(230),
    ];
    let highlight = Style::new().color256(233).on_color256(151);
    let check = Style::new().color256(233).on_red();
    let col_header = format!(
        "{}{}\n",
        format_square(' '),
        Col::all().map(|col| format_square(col.to_algebraic())).join("")
    );
    let mut ret = col_header.clone();
    for row in Row::all().rev() {
        ret.push_str(&format_square(row.to_algebraic()));
        for col in Col::all() {
            let coord = Coord::new(row, col);
            let style = if checked_king == Some(coord) {
                &check
            } else if highlighted.contains(&coord) {
                &highlight
            } else {
                &colors[usize::from(!coord.is_dark())]
            };
            let square = format_square(render_piece(view[coord], charset));
            ret.push_str(&style.apply_to(square).to_string());
        }
        ret.push_str(&format_square(row.to_algebraic()));
        ret.push('\n');
    }
    ret.push_str(&col_header);
    ret
}

fn render_status(game: &ChessGame) -> String {
    match game.status_message() {
        Some(message) => Style::new().bold().apply_to(message).to_string(),
        None => {
            let to_move = match game.active_force() {
                Force::White => "White to move",
                Force::Black => "Black to move",
            };
            if game.check_state().is_check() {
                format!("{to_move} (check)")
            } else {
                to_move.to_owned()
            }
        }
    }
}

pub fn render_game(game: &ChessGame, charset: Charset) -> String {
    let highlighted = game.last_move().map_or(vec![], |mv| vec![mv.from, mv.to]);
    let checked_king = match game.check_state() {
        CheckState::InCheck(pos) => Some(pos),
        CheckState::NotInCheck => None,
    };
    format!(
        "{}\n{}\n{}\n",
        render_grid(&game.board_view(), charset, &highlighted, checked_king),
        game.move_list_text(),
        render_status(game),
    )
}
