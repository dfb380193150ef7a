//! # Game configuration
//!
//! Read from TOML. Every key is optional:
//!
//! ```toml
//! start_fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
//! repetition_limit = 3
//! enforce_turns = true
//! ```

use serde::{Deserialize, Serialize};

use crate::{error::ChessError, notation::fen::STARTPOS};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Position the game starts from.
    pub start_fen: String,
    /// Number of occurrences of a position that draws the game.
    /// Zero turns repetition draws off.
    pub repetition_limit: u8,
    /// Refuse moves by the player who is not on the move.
    pub enforce_turns: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_fen: STARTPOS.to_string(),
            repetition_limit: 3,
            enforce_turns: true,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ChessError> {
        toml::from_str(s).map_err(|e| ChessError::Config(e.to_string()))
    }
}

#[test]
fn defaults_fill_missing_keys() {
    assert_eq!(GameConfig::from_toml_str(""), Ok(GameConfig::default()));

    let cfg = GameConfig::from_toml_str("repetition_limit = 0").expect("valid toml");
    assert_eq!(cfg.repetition_limit, 0);
    assert_eq!(cfg.start_fen, STARTPOS);
    assert!(cfg.enforce_turns);
}

#[test]
fn bad_config_is_an_error() {
    assert!(matches!(
        GameConfig::from_toml_str("enforce_turns = \"yes\""),
        Err(ChessError::Config(_))
    ));
    assert!(matches!(
        GameConfig::from_toml_str("colour = \"white\""),
        Err(ChessError::Config(_))
    ));
}
