// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod config;
mod play;
mod replay;
mod tui;

use clap::{Command, arg};
use config::ConsoleConfig;


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Chess")
        .version(clap::crate_version!())
        .about("Chess rules engine console app")
        .subcommand_required(true)
        .arg(
            arg!(-c --"config" <config_file> "Path to the configuration file: yaml-serialized ConsoleConfig.")
                .required(false)
                .global(true),
        )
        .subcommand(
            Command::new("play")
                .about("Play a game in the terminal")
                .arg(arg!(--"fen" <fen> "Starting position").required(false)),
        )
        .subcommand(
            Command::new("replay")
                .about("Reads a move log from stdin and shows the final position.")
                .arg(arg!(--"fen" <fen> "Starting position").required(false))
                .arg(arg!(--"each" "Show the board after every move.")),
        )
        .subcommand(
            Command::new("export")
                .about("Reads a move log from stdin and writes game history as JSON to stdout.")
                .arg(arg!(--"fen" <fen> "Starting position").required(false)),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => config::read_config_file(path)?,
        None => ConsoleConfig::default(),
    };
    match matches.subcommand() {
        Some(("play", sub_matches)) => play::run(play::PlayConfig {
            console: config,
            fen: sub_matches.get_one::<String>("fen").cloned(),
        }),
        Some(("replay", sub_matches)) => replay::run(replay::ReplayConfig {
            console: config,
            fen: sub_matches.get_one::<String>("fen").cloned(),
            output: if sub_matches.get_flag("each") {
                replay::ReplayOutput::EachMove
            } else {
                replay::ReplayOutput::FinalPosition
            },
        }),
        Some(("export", sub_matches)) => replay::run(replay::ReplayConfig {
            console: config,
            fen: sub_matches.get_one::<String>("fen").cloned(),
            output: replay::ReplayOutput::HistoryJson,
        }),
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
