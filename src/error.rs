use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong outside the round loop itself.
///
/// Being caught by an enemy is not an error: it is the normal
/// `Playing -> GameOver` transition.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("unknown {kind} `{value}`")]
    UnknownValue { kind: &'static str, value: String },
    #[error("terminal too small ({width}x{height})")]
    TerminalTooSmall { width: u16, height: u16 },
}

pub type Result<T> = std::result::Result<T, GameError>;
