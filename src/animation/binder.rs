use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::skeleton::Skeleton;

pub struct Binder;

impl Binder {
    /// Resolves clip tracks to joints of `skeleton` by exact joint name.
    ///
    /// Tracks naming joints the skeleton does not have are skipped.
    #[must_use]
    pub fn bind(skeleton: &Skeleton, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_idx, track) in clip.tracks.iter().enumerate() {
            if let Some(joint) = skeleton.find(&track.meta.joint_name) {
                bindings.push(PropertyBinding {
                    track_index: track_idx,
                    joint,
                    target: track.meta.target,
                });
            }
        }

        if bindings.len() < clip.tracks.len() {
            log::debug!(
                "Clip '{}' bound {}/{} tracks on skeleton '{}'",
                clip.name,
                bindings.len(),
                clip.tracks.len(),
                skeleton.name
            );
        }

        bindings
    }
}
