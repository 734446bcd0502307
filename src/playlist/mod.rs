//! Audio playlist: song discovery, the manifest and its folder watcher, and
//! the player state.

pub mod manifest;
pub mod player;
pub mod watcher;

pub use manifest::{
    AUDIO_EXTENSIONS, MANIFEST_FILE, PlaylistTrack, discover_playlist, fallback_playlist,
    is_audio_file, parse_manifest, scan_song_dir, title_from_file, write_manifest,
};
pub use player::{PlaylistPlayer, format_time};
pub use watcher::{SongWatcher, watch_song_dir};
