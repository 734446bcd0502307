//! Song discovery and the `index.json` manifest.
//!
//! The manifest is a pretty-printed JSON array of file names living next to
//! the songs it lists. Consumers re-read it to pick up songs added after
//! startup.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::Result;

pub const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "ogg", "wav"];
pub const MANIFEST_FILE: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistTrack {
    pub src: String,
    pub title: String,
}

impl PlaylistTrack {
    /// A track served from `base` (e.g. `/song`).
    #[must_use]
    pub fn from_file(base: &str, file: &str) -> Self {
        Self {
            src: format!("{}/{file}", base.trim_end_matches('/')),
            title: title_from_file(file),
        }
    }
}

/// Songs bundled with the companion, used when nothing else is found.
#[must_use]
pub fn fallback_playlist() -> Vec<PlaylistTrack> {
    vec![
        PlaylistTrack::from_file("/song", "Ollo the Botto.mp3"),
        PlaylistTrack::from_file("/song", "Ollo the Robot.mp3"),
    ]
}

/// `true` for names ending in one of [`AUDIO_EXTENSIONS`], any case.
#[must_use]
pub fn is_audio_file(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Display title: final extension dropped, each run of `_`/`-` becomes a space.
#[must_use]
pub fn title_from_file(name: &str) -> String {
    let stem = match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => name,
    };

    let mut title = String::with_capacity(stem.len());
    let mut in_separator = false;
    for c in stem.chars() {
        if c == '_' || c == '-' {
            if !in_separator {
                title.push(' ');
            }
            in_separator = true;
        } else {
            title.push(c);
            in_separator = false;
        }
    }
    title
}

/// Case-insensitive ordering with a byte-order tie break.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Audio file names directly inside `dir`, sorted. A missing directory is empty.
pub fn scan_song_dir(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        log::debug!("Song folder {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if is_audio_file(&name) {
            files.push(name);
        }
    }

    files.sort_by(|a, b| compare_names(a, b));
    Ok(files)
}

/// Rewrites `dir/index.json` from the folder contents.
///
/// Returns the manifest path, or `None` when the folder does not exist.
pub fn write_manifest(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(None);
    }

    let files = scan_song_dir(dir)?;
    let path = dir.join(MANIFEST_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(&files)?)?;

    log::info!("Wrote {} song(s) to {}", files.len(), path.display());
    Ok(Some(path))
}

/// Parses a manifest body into tracks served from `base`.
///
/// Anything other than a JSON array yields no tracks; non-string and
/// non-audio entries are skipped.
#[must_use]
pub fn parse_manifest(bytes: &[u8], base: &str) -> Vec<PlaylistTrack> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("Ignoring unreadable song manifest: {err}");
            return Vec::new();
        }
    };

    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(serde_json::Value::as_str)
        .filter(|f| is_audio_file(f))
        .map(|f| PlaylistTrack::from_file(base, f))
        .collect()
}

/// Tracks found in `dir`, sorted by title.
pub fn discover_playlist(dir: impl AsRef<Path>, base: &str) -> Result<Vec<PlaylistTrack>> {
    let mut tracks: Vec<PlaylistTrack> = scan_song_dir(dir)?
        .iter()
        .map(|f| PlaylistTrack::from_file(base, f))
        .collect();
    tracks.sort_by(|a, b| compare_names(&a.title, &b.title));
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_extension_is_case_insensitive() {
        assert!(is_audio_file("a.mp3"));
        assert!(is_audio_file("B.OGG"));
        assert!(is_audio_file("c.Wav"));
        assert!(!is_audio_file("index.json"));
        assert!(!is_audio_file("mp3"));
        assert!(!is_audio_file("track.mp3.bak"));
    }

    #[test]
    fn titles_collapse_separators() {
        assert_eq!(title_from_file("Ollo the Robot.mp3"), "Ollo the Robot");
        assert_eq!(title_from_file("night__drive-remix.ogg"), "night drive remix");
        assert_eq!(title_from_file("no_extension"), "no extension");
        assert_eq!(title_from_file("v1.2_final.wav"), "v1.2 final");
    }

    #[test]
    fn manifest_parsing_filters_entries() {
        let tracks = parse_manifest(br#"["a.mp3", 4, "notes.txt", "b_c.ogg"]"#, "/song/");
        assert_eq!(
            tracks,
            vec![
                PlaylistTrack { src: "/song/a.mp3".into(), title: "a".into() },
                PlaylistTrack { src: "/song/b_c.ogg".into(), title: "b c".into() },
            ]
        );
        assert!(parse_manifest(br#"{"files": []}"#, "/song").is_empty());
        assert!(parse_manifest(b"not json", "/song").is_empty());
    }
}
