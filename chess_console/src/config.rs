use anyhow::Context;
use chess_logic::ChessRules;
use serde::{Deserialize, Serialize};


#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    Ascii,
    #[default]
    Unicode,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Opponent {
    // Both sides are entered from the keyboard.
    #[default]
    Human,
    // The computer plays random legal moves as `force`.
    Random { force: chess_logic::Force, seed: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub rules: ChessRules,
    pub charset: Charset,
    pub opponent: Opponent,
}

pub fn read_config_file(filename: &str) -> anyhow::Result<ConsoleConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read config file '{filename}'."))?;
    parse_config(&contents).with_context(|| format!("Failed to parse config file '{filename}'."))
}

fn parse_config(contents: &str) -> anyhow::Result<ConsoleConfig> {
    Ok(serde_yaml::from_str(contents)?)
}


#[cfg(test)]
mod tests {
    use chess_logic::{Force, PromotionPolicy};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn full_config() {
        let yaml = "\
rules:
  promotion: RequireExplicit
  fifty_move_rule: false
  threefold_repetition: true
charset: Ascii
opponent: !Random
  force: Black
  seed: 42
";
        let config = parse_config(yaml).unwrap();
        assert_eq!(config, ConsoleConfig {
            rules: ChessRules {
                promotion: PromotionPolicy::RequireExplicit,
                fifty_move_rule: false,
                threefold_repetition: true,
            },
            charset: Charset::Ascii,
            opponent: Opponent::Random { force: Force::Black, seed: 42 },
        });
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = parse_config("charset: Ascii").unwrap();
        assert_eq!(config.rules, ChessRules::classic());
        assert_eq!(config.opponent, Opponent::Human);
    }

    #[test]
    fn bad_config() {
        assert!(parse_config("charset: Klingon").is_err());
    }
}
