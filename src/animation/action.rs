use std::sync::Arc;

use crate::animation::{
    binding::{PropertyBinding, TargetPath},
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};
use crate::skeleton::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// Direction of an in-progress weight fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    None,
    In,
    Out,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,

    running: bool,
    fade_factor: f32,
    fade: Option<Fade>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
            running: false,
            fade_factor: 1.0,
            fade: None,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Rewinds to time 0 and re-enables the action, cancelling any fade.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        self.fade = None;
        self.fade_factor = 1.0;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
        self
    }

    /// Schedules the action on its mixer.
    pub fn play(&mut self) -> &mut Self {
        self.running = true;
        self
    }

    /// Halts the action immediately and rewinds it.
    pub fn stop(&mut self) -> &mut Self {
        self.running = false;
        self.enabled = false;
        self.fade = None;
        self.time = 0.0;
        self
    }

    /// Ramps the weight from 0 to full over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.start_fade(0.0, 1.0, duration);
        self
    }

    /// Ramps the weight from its current value to 0 over `duration` seconds,
    /// then disables the action.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.start_fade(self.fade_factor, 0.0, duration);
        self
    }

    fn start_fade(&mut self, from: f32, to: f32, duration: f32) {
        if duration <= 0.0 {
            self.fade = None;
            self.fade_factor = to;
            self.finish_fade();
            return;
        }
        self.fade_factor = from;
        self.fade = Some(Fade {
            from,
            to,
            elapsed: 0.0,
            duration,
        });
    }

    fn finish_fade(&mut self) {
        if self.fade_factor <= 0.0 {
            self.enabled = false;
            self.running = false;
        }
    }

    #[must_use]
    pub fn fade_state(&self) -> FadeState {
        match self.fade {
            None => FadeState::None,
            Some(fade) if fade.to >= fade.from => FadeState::In,
            Some(_) => FadeState::Out,
        }
    }

    /// True while the action is scheduled and enabled.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running && self.enabled
    }

    /// `weight` scaled by the current fade amplitude.
    #[inline]
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.is_running() {
            self.weight * self.fade_factor
        } else {
            0.0
        }
    }

    /// Core logic: advance fades and time.
    pub fn update(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }

        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            let progress = (fade.elapsed / fade.duration).clamp(0.0, 1.0);
            self.fade_factor = fade.from + (fade.to - fade.from) * progress;
            if progress >= 1.0 {
                self.fade = None;
                self.finish_fade();
            }
        }

        if self.paused {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                // Play once, stop at end or start
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    // Reverse playback
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut t = self.time % double_duration;
                if t < 0.0 {
                    t += double_duration;
                }
                // Second half of the cycle runs backwards
                if t > duration {
                    t = double_duration - t;
                }
                self.time = t;
            }
        }
    }

    /// Samples every bound track at the current time and blends the result
    /// into `locals` by the effective weight.
    pub(crate) fn apply(&mut self, locals: &mut [Transform]) {
        let weight = self.effective_weight().clamp(0.0, 1.0);
        if weight <= 0.0 {
            return;
        }

        for binding in &self.bindings {
            let Some(track) = self.clip.tracks.get(binding.track_index) else {
                continue;
            };
            let Some(cursor) = self.track_cursors.get_mut(binding.track_index) else {
                continue;
            };
            let Some(local) = locals.get_mut(binding.joint.index()) else {
                continue;
            };

            match (&track.data, binding.target) {
                (TrackData::Vector3(t), TargetPath::Translation) => {
                    if let Some(val) = t.sample_with_cursor(self.time, cursor) {
                        local.position = local.position.lerp(val, weight);
                    }
                }
                (TrackData::Vector3(t), TargetPath::Scale) => {
                    if let Some(val) = t.sample_with_cursor(self.time, cursor) {
                        local.scale = local.scale.lerp(val, weight);
                    }
                }
                (TrackData::Quaternion(t), TargetPath::Rotation) => {
                    if let Some(val) = t.sample_with_cursor(self.time, cursor) {
                        local.rotation = local.rotation.slerp(val, weight);
                    }
                }
                _ => {}
            }
        }
    }
}
