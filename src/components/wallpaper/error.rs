//! Error types for the wallpaper engine.
//!
//! None of these are fatal: the compositor logs them and carries on with the
//! next frame.

use thiserror::Error;

/// Failure to acquire or present a drawing buffer.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// Nothing to draw on right now.
	#[error("surface is not available")]
	Unavailable,

	/// The host rejected the buffer.
	#[error("surface lost: {0}")]
	Lost(String),
}

/// Failure of an individual drawing command.
#[derive(Debug, Error)]
pub enum DrawError {
	/// The underlying canvas call returned an error.
	#[error("canvas call failed: {0}")]
	Canvas(String),
}

/// Failure to load an image asset.
#[derive(Debug, Error)]
pub enum AssetError {
	/// No asset has this identifier.
	#[error("asset not found: {0}")]
	NotFound(String),

	/// The asset exists but could not be turned into an image.
	#[error("failed to decode {id}: {reason}")]
	Decode {
		/// Asset identifier.
		id: String,
		/// Host-provided cause.
		reason: String,
	},
}

/// Invalid page-supplied configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Not valid JSON for the config shape.
	#[error("config parse error: {0}")]
	Parse(#[from] serde_json::Error),

	/// No preset has this name.
	#[error("unknown theme: {0}")]
	UnknownTheme(String),

	/// `clear_color` is not a supported CSS color.
	#[error("invalid color: {0}")]
	InvalidColor(String),
}
