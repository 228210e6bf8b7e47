//! Error types shared by gameplay rules and configuration loading.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Aim point or origin carried NaN / infinite coordinates.
    #[error("shot has non-finite coordinates (origin={origin:?}, aim={aim:?})")]
    NonFiniteShot { origin: [f32; 3], aim: [f32; 3] },
    #[error("failed to read tuning file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

pub type GameResult<T> = Result<T, GameError>;
