//! Source rig → target rig clip pipeline with ordered fallbacks.

use std::sync::Arc;

use crate::animation::AnimationClip;
use crate::assets::RigAsset;
use crate::retarget::mapper::{NameMap, build_map};
use crate::retarget::retargeter::{ClipRetargeter, RestPoseDelta, TrackTransform};

/// Where the selected clips came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOrigin {
    /// Source clips rewritten onto the target skeleton
    Retargeted,
    /// Clips shipped with the target rig
    TargetNative,
    /// Source clips played untouched on the source skeleton
    SourceDirect,
    /// No animation data anywhere
    None,
}

/// Which skeleton the selected clips drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrivenRig {
    Target,
    Source,
}

#[derive(Debug, Clone)]
pub struct ClipSelection {
    pub origin: ClipOrigin,
    pub rig: DrivenRig,
    pub clips: Vec<Arc<AnimationClip>>,
    pub name_map: NameMap,
}

impl ClipSelection {
    /// The clip the playback driver starts with.
    #[must_use]
    pub fn first(&self) -> Option<&Arc<AnimationClip>> {
        self.clips.first()
    }
}

/// Picks the first non-empty clip set in preference order: retargeted,
/// target native, raw source.
#[must_use]
pub fn select_clips(
    retargeted: Vec<Arc<AnimationClip>>,
    target_native: &[Arc<AnimationClip>],
    source: &[Arc<AnimationClip>],
    name_map: NameMap,
) -> ClipSelection {
    let target_native = playable(target_native);
    let source = playable(source);

    let (origin, rig, clips) = if !retargeted.is_empty() {
        (ClipOrigin::Retargeted, DrivenRig::Target, retargeted)
    } else if !target_native.is_empty() {
        (ClipOrigin::TargetNative, DrivenRig::Target, target_native)
    } else if !source.is_empty() {
        (ClipOrigin::SourceDirect, DrivenRig::Source, source)
    } else {
        (ClipOrigin::None, DrivenRig::Target, Vec::new())
    };

    ClipSelection {
        origin,
        rig,
        clips,
        name_map,
    }
}

/// Clips the mixer can sample without going out of bounds.
fn playable(clips: &[Arc<AnimationClip>]) -> Vec<Arc<AnimationClip>> {
    clips
        .iter()
        .filter(|clip| match clip.validate() {
            Ok(()) => true,
            Err(reason) => {
                log::warn!("Skipping clip '{}': {reason}", clip.name);
                false
            }
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct RetargetPipeline<T: TrackTransform = RestPoseDelta> {
    retargeter: ClipRetargeter<T>,
}

impl RetargetPipeline<RestPoseDelta> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            retargeter: ClipRetargeter::new(),
        }
    }
}

impl<T: TrackTransform> RetargetPipeline<T> {
    #[must_use]
    pub fn with_transform(transform: T) -> Self {
        Self {
            retargeter: ClipRetargeter::with_transform(transform),
        }
    }

    /// Maps joint names, retargets every source clip and selects what to play.
    ///
    /// Never fails: the worst outcome is [`ClipOrigin::None`].
    #[must_use]
    pub fn run(&self, source: &RigAsset, target: &RigAsset) -> ClipSelection {
        let source_names = source.joint_names();
        let target_names = target.joint_names();
        let name_map = build_map(&source_names, &target_names);

        if !source_names.is_empty() && name_map.len() * 2 < source_names.len() {
            log::warn!(
                "Only {}/{} joints of '{}' map onto '{}'; the avatar may be partially static",
                name_map.len(),
                source_names.len(),
                source.name,
                target.name
            );
        }

        let retargeted = self.retargeter.retarget_all(
            &target.skeleton,
            &source.skeleton,
            &source.clips,
            &name_map,
        );

        let selection = select_clips(retargeted, &target.clips, &source.clips, name_map);
        log::info!(
            "Selected {} clip(s) from {:?} for '{}'",
            selection.clips.len(),
            selection.origin,
            target.name
        );
        selection
    }
}
