use std::sync::Arc;

use crate::animation::{ActionHandle, AnimationClip, AnimationMixer, FadeState, LoopMode};
use crate::settings::AvatarSettings;
use crate::skeleton::Skeleton;

/// Lifecycle of the avatar's looping clip.
///
/// ```text
/// Idle ──mount──▶ Playing ──fade-in done──▶ Looping
///                    │                         │
///                    └────────unmount──────────┴──▶ FadingOut ──fade-out done──▶ Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    /// Fading in
    Playing,
    /// Full weight, looping indefinitely
    Looping,
    FadingOut,
    Stopped,
}

/// Starts one clip on mount and ramps it out on unmount.
///
/// Time advancement belongs to the mixer; the driver only reacts to the
/// action's fade state. There are no pause, resume or seek controls.
#[derive(Debug, Clone)]
pub struct PlaybackDriver {
    state: PlaybackState,
    action: Option<ActionHandle>,
    fade_in: f32,
    fade_out: f32,
}

impl PlaybackDriver {
    #[must_use]
    pub fn new(fade_in: f32, fade_out: f32) -> Self {
        Self {
            state: PlaybackState::Idle,
            action: None,
            fade_in,
            fade_out,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &AvatarSettings) -> Self {
        Self::new(settings.fade_in, settings.fade_out)
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn action(&self) -> Option<ActionHandle> {
        self.action
    }

    /// Starts the first clip from time 0, looping, with a fade-in.
    pub fn mount(
        &mut self,
        mixer: &mut AnimationMixer,
        clips: &[Arc<AnimationClip>],
        skeleton: &Skeleton,
    ) -> Option<ActionHandle> {
        if self.state != PlaybackState::Idle {
            log::warn!("Playback driver mounted twice (state {:?})", self.state);
            return self.action;
        }

        let Some(clip) = clips.first() else {
            log::info!("No clip available for '{}', avatar stays in rest pose", skeleton.name);
            self.state = PlaybackState::Stopped;
            return None;
        };

        let handle = mixer.clip_action(clip, skeleton);
        if let Some(action) = mixer.action_mut(handle) {
            action.loop_mode = LoopMode::Loop;
            action.reset().fade_in(self.fade_in).play();
        }

        log::debug!("Playing '{}' on '{}'", clip.name, skeleton.name);
        self.action = Some(handle);
        self.state = PlaybackState::Playing;
        self.update(mixer);
        Some(handle)
    }

    /// Advances the state machine after the mixer has been updated.
    pub fn update(&mut self, mixer: &mut AnimationMixer) {
        let action = self.action.and_then(|h| mixer.action(h));

        match self.state {
            PlaybackState::Playing => {
                if action.is_some_and(|a| a.is_running() && a.fade_state() == FadeState::None) {
                    self.state = PlaybackState::Looping;
                }
            }
            PlaybackState::FadingOut => {
                if action.is_none_or(|a| !a.is_running()) {
                    mixer.stop_all_actions();
                    self.state = PlaybackState::Stopped;
                    log::debug!("Playback stopped");
                }
            }
            PlaybackState::Idle | PlaybackState::Looping | PlaybackState::Stopped => {}
        }
    }

    /// Fades the clip out; the next updates complete the stop.
    pub fn unmount(&mut self, mixer: &mut AnimationMixer) {
        match self.state {
            PlaybackState::Playing | PlaybackState::Looping => {
                if let Some(action) = self.action.and_then(|h| mixer.action_mut(h)) {
                    action.fade_out(self.fade_out);
                }
                self.state = PlaybackState::FadingOut;
                self.update(mixer);
            }
            PlaybackState::Idle | PlaybackState::FadingOut | PlaybackState::Stopped => {}
        }
    }
}
