use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::skeleton::{Pose, Skeleton};

new_key_type! {
    pub struct ActionHandle;
}

/// Owns the actions driving one skeleton and advances them every frame.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: SlotMap<ActionHandle, AnimationAction>,
    // Blend order; slot order is not insertion order once slots get reused
    order: Vec<ActionHandle>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the action playing `clip`, creating and binding it on first use.
    pub fn clip_action(&mut self, clip: &Arc<AnimationClip>, skeleton: &Skeleton) -> ActionHandle {
        if let Some(&handle) = self
            .order
            .iter()
            .find(|&&h| Arc::ptr_eq(self.actions[h].clip(), clip))
        {
            return handle;
        }

        let mut action = AnimationAction::new(Arc::clone(clip));
        action.bindings = Binder::bind(skeleton, clip);
        let handle = self.actions.insert(action);
        self.order.push(handle);
        handle
    }

    #[inline]
    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    #[inline]
    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    /// Removes an action from the mixer.
    pub fn uncache_action(&mut self, handle: ActionHandle) -> Option<AnimationAction> {
        self.order.retain(|&h| h != handle);
        self.actions.remove(handle)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Advances every action by `dt` and writes the blended result into `pose`.
    ///
    /// The pose starts from rest each frame, so a fading action blends
    /// between the rest pose and its sampled values.
    pub fn update(&mut self, dt: f32, skeleton: &Skeleton, pose: &mut Pose) {
        for &handle in &self.order {
            if let Some(action) = self.actions.get_mut(handle) {
                action.update(dt);
            }
        }

        pose.reset(skeleton);
        let locals = pose.locals_mut();
        for &handle in &self.order {
            if let Some(action) = self.actions.get_mut(handle) {
                action.apply(locals);
            }
        }
    }

    /// Halts every action immediately.
    pub fn stop_all_actions(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Names of the clips whose actions are currently running.
    #[must_use]
    pub fn playing_action_names(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|&h| self.actions.get(h))
            .filter(|a| a.is_running())
            .map(|a| a.clip().name.as_str())
            .collect()
    }
}
