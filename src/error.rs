//! Error types
//!
//! Level loading is the only fatal path. Audio errors are produced by
//! backends and always swallowed (logged) by [`crate::audio::AudioManager`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level table has {found} levels, {required} required")]
    TooFewLevels { found: usize, required: usize },
    #[error("level {index} is invalid: {reason}")]
    InvalidLevel { index: usize, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("playback blocked: {0}")]
    Blocked(String),
}
