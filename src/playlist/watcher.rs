//! Keeps `index.json` in sync with the song folder while the app runs.

use std::path::Path;
use std::time::Duration;

use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

use crate::errors::Result;
use crate::playlist::manifest::{is_audio_file, write_manifest};

/// A live watch over one song folder. Dropping it stops the watch.
pub type SongWatcher = Debouncer<RecommendedWatcher>;

/// Writes the manifest now, then again after every burst of song changes.
///
/// Only audio files trigger a rewrite, so the manifest's own writes never
/// feed back into the watcher. Fails when `dir` cannot be watched.
pub fn watch_song_dir(dir: impl AsRef<Path>, debounce: Duration) -> Result<SongWatcher> {
    let dir = dir.as_ref().to_path_buf();
    write_manifest(&dir)?;

    let song_dir = dir.clone();
    let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| match result {
        Ok(events) => {
            if events.iter().any(|event| touches_song(&event.path))
                && let Err(err) = write_manifest(&song_dir)
            {
                log::warn!("Failed to refresh song manifest in {}: {err}", song_dir.display());
            }
        }
        Err(err) => log::warn!("Song folder watch error: {err:?}"),
    })?;
    debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;

    log::info!("Watching {} for song changes", dir.display());
    Ok(debouncer)
}

fn touches_song(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(is_audio_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_audio_paths_count_as_song_changes() {
        assert!(touches_song(Path::new("/song/Night_Drive.MP3")));
        assert!(!touches_song(Path::new("/song/index.json")));
        assert!(!touches_song(Path::new("/song/")));
    }
}
