//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`OlloError`] covers all failure modes including:
//! - Rig asset loading and validation errors
//! - Per-clip retargeting failures (recovered locally by the pipeline)
//! - Playlist manifest I/O
//! - Chat completion and network errors
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, OlloError>`.
//!
//! ```rust,ignore
//! use ollo::errors::{OlloError, Result};
//!
//! fn load_rig() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the companion core.
#[derive(Error, Debug)]
pub enum OlloError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// A skeleton description violates the arena layout (bad parent index, empty name...).
    #[error("Invalid skeleton '{skeleton}': {reason}")]
    InvalidSkeleton {
        /// Name of the offending skeleton
        skeleton: String,
        /// What was wrong with it
        reason: String,
    },

    /// A keyframe track description could not be turned into track data.
    #[error("Invalid track for joint '{joint}': {reason}")]
    InvalidTrack {
        /// Joint the track animates
        joint: String,
        /// What was wrong with it
        reason: String,
    },

    // ========================================================================
    // Retargeting Errors
    // ========================================================================
    /// The rest-pose transform step rejected a clip.
    #[error("Failed to retarget clip '{clip}': {reason}")]
    RetargetFailed {
        /// Name of the source clip
        clip: String,
        /// Why the transform step rejected it
        reason: String,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The song folder could not be watched.
    #[error("File watch error: {0}")]
    WatchError(#[from] notify_debouncer_mini::notify::Error),

    // ========================================================================
    // Chat & Network Errors
    // ========================================================================
    /// No API key was supplied by the user or the environment.
    #[error("Missing API key. Click Key and paste your OpenAI API key.")]
    MissingApiKey,

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// HTTP response error with status code.
    #[error("HTTP {status}")]
    HttpResponseError {
        /// HTTP status code
        status: u16,
    },
}

/// Alias for `Result<T, OlloError>`.
pub type Result<T> = std::result::Result<T, OlloError>;
