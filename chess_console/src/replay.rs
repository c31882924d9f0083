use std::io::{self, Read};

use anyhow::Context;
use chess_logic::test_util::replay_chess_log;

use crate::config::ConsoleConfig;
use crate::play::new_game;
use crate::tui::render_game;


pub enum ReplayOutput {
    FinalPosition,
    EachMove,
    HistoryJson,
}

pub struct ReplayConfig {
    pub console: ConsoleConfig,
    pub fen: Option<String>,
    pub output: ReplayOutput,
}

pub fn run(config: ReplayConfig) -> anyhow::Result<()> {
    let mut log = String::new();
    io::stdin().read_to_string(&mut log).context("Failed to read move log from stdin.")?;
    let mut game = new_game(&config.console, config.fen.as_deref())?;
    let charset = config.console.charset;
    match config.output {
        ReplayOutput::FinalPosition => {
            replay_chess_log(&mut game, &log)?;
            print!("{}", render_game(&game, charset));
        }
        ReplayOutput::EachMove => {
            for word in log.split_whitespace() {
                let moves_before = game.history().len();
                replay_chess_log(&mut game, word)
                    .with_context(|| format!("Cannot play {word} in {}", game.fen()))?;
                if game.history().len() > moves_before {
                    println!("{}", render_game(&game, charset));
                }
            }
        }
        ReplayOutput::HistoryJson => {
            replay_chess_log(&mut game, &log)?;
            println!("{}", game.export_history()?);
        }
    }
    Ok(())
}
