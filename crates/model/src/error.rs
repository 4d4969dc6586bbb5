use thiserror::Error;

use crate::level::Level;

/// Errors surfaced by [`crate::QrCodeModel`].
#[derive(Debug, Error)]
pub enum ModelError {
	#[error(transparent)]
	Queue(#[from] qrclip_worker::QueueError),
}

/// A list operation that does not fit the list it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
	#[error("position {position} is out of bounds for list of length {len}")]
	OutOfBounds { position: usize, len: usize },
	#[error("inserting {level} at position {position} breaks level ordering")]
	Misordered { position: usize, level: Level },
	#[error("row {position} holds {found}, operation targets {expected}")]
	LevelMismatch { position: usize, expected: Level, found: Level },
}

/// Configuration parse failure.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid model configuration: {0}")]
	Parse(#[from] toml::de::Error),
}
