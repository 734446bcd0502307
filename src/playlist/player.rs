use crate::playlist::manifest::{PlaylistTrack, fallback_playlist};
use crate::settings::PlaylistSettings;

/// Transport state of the audio player.
///
/// Decoding and output belong to the host media element; this type holds what
/// the controls show and decides what happens on each control or media event.
#[derive(Debug, Clone)]
pub struct PlaylistPlayer {
    // Never empty
    tracks: Vec<PlaylistTrack>,
    index: usize,
    playing: bool,
    muted: bool,
    current_time: f64,
    duration: f64,
    needs_interaction: bool,
    restart_threshold: f64,
}

impl PlaylistPlayer {
    /// An empty `tracks` list falls back to the bundled songs.
    #[must_use]
    pub fn new(tracks: Vec<PlaylistTrack>, settings: &PlaylistSettings) -> Self {
        let tracks = if tracks.is_empty() {
            fallback_playlist()
        } else {
            tracks
        };
        Self {
            tracks,
            index: 0,
            playing: false,
            muted: false,
            current_time: 0.0,
            duration: 0.0,
            needs_interaction: false,
            restart_threshold: settings.restart_threshold,
        }
    }

    #[must_use]
    pub fn tracks(&self) -> &[PlaylistTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn current(&self) -> &PlaylistTrack {
        &self.tracks[self.index]
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// The host refused to start audio without a user gesture.
    #[must_use]
    pub fn needs_interaction(&self) -> bool {
        self.needs_interaction
    }

    fn load_track(&mut self, index: usize) {
        self.index = index;
        self.current_time = 0.0;
        self.duration = 0.0;
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    /// Pauses and rewinds.
    pub fn stop(&mut self) {
        self.playing = false;
        self.current_time = 0.0;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Next track, wrapping to the first.
    pub fn next(&mut self) {
        self.load_track((self.index + 1) % self.tracks.len());
    }

    /// Rewinds the current track once it played past the restart threshold,
    /// otherwise moves to the previous track (wrapping to the last).
    pub fn prev(&mut self) {
        if self.current_time > self.restart_threshold {
            self.current_time = 0.0;
            return;
        }
        let len = self.tracks.len();
        self.load_track((self.index + len - 1) % len);
    }

    /// Jumps to a track and plays it. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index >= self.tracks.len() {
            log::debug!("Ignoring selection of track {index} of {}", self.tracks.len());
            return;
        }
        self.load_track(index);
        self.playing = true;
    }

    /// The media element reached the end of the current track.
    pub fn on_ended(&mut self) {
        if self.index + 1 < self.tracks.len() {
            self.load_track(self.index + 1);
            self.playing = true;
        } else {
            self.playing = false;
        }
    }

    /// Moves the playhead; returns the position actually applied.
    pub fn seek(&mut self, time: f64) -> f64 {
        let mut time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        if self.duration > 0.0 {
            time = time.min(self.duration);
        }
        self.current_time = time;
        time
    }

    pub fn time_update(&mut self, time: f64) {
        self.current_time = if time.is_finite() { time } else { 0.0 };
    }

    pub fn loaded_metadata(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration } else { 0.0 };
    }

    /// The host blocked autoplay.
    pub fn playback_blocked(&mut self) {
        self.needs_interaction = true;
    }

    /// The user explicitly enabled audio.
    pub fn enable_audio(&mut self) {
        self.playing = true;
        self.needs_interaction = false;
    }

    /// Swaps in a refreshed playlist, restarting from the first track.
    ///
    /// An empty list is ignored and returns `false`.
    pub fn replace_playlist(&mut self, tracks: Vec<PlaylistTrack>) -> bool {
        if tracks.is_empty() {
            return false;
        }
        self.tracks = tracks;
        self.load_track(0);
        true
    }
}

/// `m:ss`, with `0:00` for non-finite input.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }
}
