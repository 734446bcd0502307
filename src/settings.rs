//! Companion Settings
//!
//! Configuration for the avatar pipeline, the playlist player and the chat
//! client. Every field has a default matching the shipped companion, so an
//! empty JSON object (or no file at all) is a valid configuration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ollo::settings::{AvatarSettings, OlloSettings};
//!
//! let settings = OlloSettings::default();
//!
//! // Slower crossfade for a calmer idle
//! let settings = OlloSettings {
//!     avatar: AvatarSettings { fade_in: 1.0, ..Default::default() },
//!     ..Default::default()
//! };
//!
//! // Or from disk
//! let settings = OlloSettings::from_json_file("ollo.json")?;
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;

// ---------------------------------------------------------------------------
// AvatarSettings
// ---------------------------------------------------------------------------

/// Retargeting and playback parameters for the animated avatar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    /// Unit scale recorded once on the source rig. It scales the rig's world
    /// matrices and the translation offsets carried into retargeted clips.
    ///
    /// Motion-capture rigs are exported in centimeters while the avatar is in
    /// meters, hence `0.01`.
    pub source_unit_scale: f32,
    /// Seconds to ramp the selected clip in after mount.
    pub fade_in: f32,
    /// Seconds to ramp the clip out on unmount.
    pub fade_out: f32,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            source_unit_scale: 0.01,
            fade_in: 0.3,
            fade_out: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// PlaylistSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// URL prefix under which manifest entries are served.
    pub base_url: String,
    /// `prev` rewinds the current song instead of skipping once playback
    /// passed this many seconds.
    pub restart_threshold: f64,
    /// Quiet period before a burst of song folder changes rewrites the manifest.
    pub watch_debounce_ms: u64,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            base_url: "/song".to_string(),
            restart_threshold: 3.0,
            watch_debounce_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// ChatSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Base URL of an OpenAI-compatible API.
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Environment variable consulted when the user has not stored a key.
    pub api_key_env: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            api_key_env: "OLLO_OPENAI_API_KEY".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// OlloSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OlloSettings {
    pub avatar: AvatarSettings,
    pub playlist: PlaylistSettings,
    pub chat: ChatSettings,
}

impl OlloSettings {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads settings from a JSON file. A missing file yields the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => Self::from_json_slice(&bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let settings = OlloSettings::from_json_slice(b"{}").unwrap();
        assert_eq!(settings, OlloSettings::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let settings =
            OlloSettings::from_json_slice(br#"{ "avatar": { "fade_in": 1.5 } }"#).unwrap();
        assert!((settings.avatar.fade_in - 1.5).abs() < f32::EPSILON);
        assert!((settings.avatar.fade_out - 0.2).abs() < f32::EPSILON);
        assert_eq!(settings.chat.model, "gpt-4o-mini");
    }
}
