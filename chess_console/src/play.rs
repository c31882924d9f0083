use std::io::{self, BufRead, Write};

use anyhow::anyhow;
use chess_logic::algebraic::parse_long_algebraic;
use chess_logic::coord::Coord;
use chess_logic::{ChessGame, MoveAdvisor, RandomAdvisor, TurnError, TurnInput};
use itertools::Itertools;
use log::info;

use crate::config::{ConsoleConfig, Opponent};
use crate::tui::render_game;


pub struct PlayConfig {
    pub console: ConsoleConfig,
    pub fen: Option<String>,
}

pub fn new_game(config: &ConsoleConfig, fen: Option<&str>) -> anyhow::Result<ChessGame> {
    match fen {
        Some(fen) => ChessGame::new_from_fen(config.rules.clone(), fen).map_err(|err| anyhow!(err)),
        None => Ok(ChessGame::new(config.rules.clone())),
    }
}

// "e2e4" is also valid short notation for a pawn move, so long notation is checked first.
fn submit(game: &mut ChessGame, line: &str) -> Result<String, TurnError> {
    let input = if parse_long_algebraic(line).is_some() {
        TurnInput::LongAlgebraic(line.to_owned())
    } else {
        TurnInput::Algebraic(line.to_owned())
    };
    Ok(game.try_turn(&input)?.algebraic)
}

fn describe_moves(game: &ChessGame, from: Option<Coord>) -> String {
    let moves = game.legal_moves();
    match from {
        Some(from) => moves.destinations(from).iter().map(|to| to.to_algebraic()).join(" "),
        None => moves
            .iter()
            .map(|(from, to)| {
                format!("{}: {}", from.to_algebraic(), to.iter().map(|to| to.to_algebraic()).join(" "))
            })
            .join("\n"),
    }
}

fn advisor_turn(game: &mut ChessGame, advisor: &mut dyn MoveAdvisor) -> anyhow::Result<()> {
    let suggestion = advisor.suggest(game.fen())?;
    let facts = game.apply_suggestion(&suggestion)?;
    println!("Computer plays {}", facts.algebraic);
    Ok(())
}

pub fn run(config: PlayConfig) -> anyhow::Result<()> {
    let charset = config.console.charset;
    let mut game = new_game(&config.console, config.fen.as_deref())?;
    let mut opponent = match config.console.opponent {
        Opponent::Human => None,
        Opponent::Random { force, seed } => Some((force, RandomAdvisor::new(seed))),
    };
    info!("Starting game from {}", game.fen());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if let Some((force, advisor)) = opponent.as_mut() {
            if *force == game.active_force() && !game.is_over() {
                advisor_turn(&mut game, advisor)?;
                continue;
            }
        }
        print!("{}", render_game(&game, charset));
        if game.is_over() {
            return Ok(());
        }
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let line = line.trim();
        match line.split_whitespace().collect_vec().as_slice() {
            [] => {}
            ["quit"] | ["exit"] => return Ok(()),
            ["fen"] => println!("{}", game.fen()),
            ["moves"] => println!("{}", describe_moves(&game, None)),
            ["moves", square] => match Coord::from_algebraic(square) {
                Some(from) => println!("{}", describe_moves(&game, Some(from))),
                None => println!("Unknown square: {square}"),
            },
            _ => match submit(&mut game, line) {
                Ok(algebraic) => println!("Played {algebraic}"),
                Err(err) => println!("Cannot play {line}: {err}"),
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use chess_logic::ChessRules;

    use super::*;

    #[test]
    fn submit_accepts_both_notations() {
        let mut game = ChessGame::new(ChessRules::classic());
        assert_eq!(submit(&mut game, "e4").unwrap(), "e4");
        assert_eq!(submit(&mut game, "g8f6").unwrap(), "Nf6");
        assert_eq!(submit(&mut game, "e2e4").unwrap_err(), TurnError::PieceMissing);
        assert_eq!(submit(&mut game, "hello").unwrap_err(), TurnError::InvalidNotation);
    }
}
