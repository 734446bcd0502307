use glam::Affine3A;

use crate::skeleton::{JointId, Skeleton, Transform};

/// Per-joint local transforms of one skeleton at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    locals: Vec<Transform>,
}

impl Pose {
    /// The skeleton's rest pose.
    #[must_use]
    pub fn rest(skeleton: &Skeleton) -> Self {
        Self {
            locals: skeleton.joints().iter().map(|j| j.rest).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.locals.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, joint: JointId) -> Option<&Transform> {
        self.locals.get(joint.index())
    }

    #[inline]
    pub fn get_mut(&mut self, joint: JointId) -> Option<&mut Transform> {
        self.locals.get_mut(joint.index())
    }

    #[inline]
    #[must_use]
    pub fn locals(&self) -> &[Transform] {
        &self.locals
    }

    #[inline]
    pub(crate) fn locals_mut(&mut self) -> &mut [Transform] {
        &mut self.locals
    }

    /// Resets every joint back to rest.
    pub fn reset(&mut self, skeleton: &Skeleton) {
        self.locals.clear();
        self.locals.extend(skeleton.joints().iter().map(|j| j.rest));
    }

    #[must_use]
    pub fn world_matrices(&self, skeleton: &Skeleton) -> Vec<Affine3A> {
        skeleton.world_matrices(&self.locals)
    }
}
