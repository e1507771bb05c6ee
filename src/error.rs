use thiserror::Error;

use crate::controls::Action;

/// Errors raised when a maze is requested with an unusable shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimension must be odd, got {0}")]
    EvenDimension(u16),

    /// A 3x3 grid holds a single room, so the start and the end would share
    /// it. The smallest maze is 5x5, with four rooms.
    #[error("maze dimension must be at least {min}, got {dim}")]
    TooSmall { dim: u16, min: u16 },
}

/// Feedback for a rejected key binding. These are expected outcomes of the
/// remapping flow and are shown to the player, not propagated as failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapError {
    #[error("key is not remappable, use a letter, digit, space or arrow key")]
    InvalidKey,

    #[error("key is already bound to {action}")]
    KeyTaken { action: Action },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings file could not be accessed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {reason}")]
    Invalid { reason: String },
}

pub type Result<T> = std::result::Result<T, MazeError>;
