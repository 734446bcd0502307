//! Clip retargeting.
//!
//! [`ClipRetargeter`] decides which tracks survive and under which joint name;
//! re-expressing the sampled values between the two rest poses is delegated to
//! a [`TrackTransform`]. [`RestPoseDelta`] is the default transform.

use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{AnimationClip, TargetPath, Track, TrackData, TrackMeta};
use crate::errors::{OlloError, Result};
use crate::retarget::mapper::NameMap;
use crate::skeleton::{Joint, Skeleton};

/// The two joints a track moves between.
#[derive(Debug, Clone, Copy)]
pub struct JointPair<'a> {
    pub source: &'a Joint,
    pub target: &'a Joint,
    /// Converts source translations into target units.
    pub source_unit_scale: f32,
}

/// Re-expresses one track authored against `pair.source` so it drives `pair.target`.
pub trait TrackTransform {
    fn transform(&self, pair: &JointPair<'_>, meta: &TrackMeta, data: &TrackData) -> Result<TrackData>;
}

/// Local-space rest-pose delta transfer.
///
/// - rotation: `target_rest * source_rest⁻¹ * q`
/// - translation: `target_rest + (p - source_rest) * unit_scale`
/// - scale: `target_rest * (s / source_rest)`
#[derive(Debug, Clone, Copy, Default)]
pub struct RestPoseDelta;

fn invalid(joint: &Joint, reason: impl Into<String>) -> OlloError {
    OlloError::InvalidTrack {
        joint: joint.name.clone(),
        reason: reason.into(),
    }
}

/// Component-wise ratio where a zero denominator passes the numerator through.
fn safe_ratio(value: Vec3, rest: Vec3) -> Vec3 {
    Vec3::select(rest.cmpeq(Vec3::ZERO), value, value / rest)
}

impl TrackTransform for RestPoseDelta {
    fn transform(&self, pair: &JointPair<'_>, meta: &TrackMeta, data: &TrackData) -> Result<TrackData> {
        let source_rest = pair.source.rest;
        let target_rest = pair.target.rest;
        if !source_rest.is_finite() {
            return Err(invalid(pair.source, "rest transform is not finite"));
        }
        if !target_rest.is_finite() {
            return Err(invalid(pair.target, "rest transform is not finite"));
        }

        match (meta.target, data) {
            (TargetPath::Rotation, TrackData::Quaternion(track)) => {
                if source_rest.rotation.length_squared() < 1e-12 {
                    return Err(invalid(pair.source, "degenerate rest rotation"));
                }
                let delta: Quat = target_rest.rotation * source_rest.rotation.inverse();
                Ok(TrackData::Quaternion(track.map_values(
                    |q| (delta * q).normalize(),
                    |q| delta * q,
                )))
            }
            (TargetPath::Translation, TrackData::Vector3(track)) => {
                let scale = pair.source_unit_scale;
                Ok(TrackData::Vector3(track.map_values(
                    |p| target_rest.position + (p - source_rest.position) * scale,
                    |p| p * scale,
                )))
            }
            (TargetPath::Scale, TrackData::Vector3(track)) => {
                let ratio = |s: Vec3| target_rest.scale * safe_ratio(s, source_rest.scale);
                Ok(TrackData::Vector3(track.map_values(ratio, ratio)))
            }
            (target, _) => Err(invalid(
                pair.source,
                format!("{target:?} track carries mismatched keyframe data"),
            )),
        }
    }
}

/// Rewrites clips authored for a source skeleton onto a target skeleton.
#[derive(Debug, Clone, Default)]
pub struct ClipRetargeter<T: TrackTransform = RestPoseDelta> {
    transform: T,
}

impl ClipRetargeter<RestPoseDelta> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            transform: RestPoseDelta,
        }
    }
}

impl<T: TrackTransform> ClipRetargeter<T> {
    #[must_use]
    pub fn with_transform(transform: T) -> Self {
        Self { transform }
    }

    /// Retargets one clip, reporting why it failed.
    ///
    /// Tracks for joints absent from `map` are dropped; a clip left with no
    /// tracks at all is a failure. Keyframe times and the clip duration are
    /// preserved.
    pub fn try_retarget(
        &self,
        target: &Skeleton,
        source: &Skeleton,
        clip: &AnimationClip,
        map: &NameMap,
    ) -> Result<AnimationClip> {
        let fail = |reason: String| OlloError::RetargetFailed {
            clip: clip.name.clone(),
            reason,
        };

        let mut tracks = Vec::with_capacity(clip.tracks.len());
        for track in &clip.tracks {
            let Some(target_name) = map.get(&track.meta.joint_name) else {
                continue;
            };

            let source_joint = source
                .find(&track.meta.joint_name)
                .and_then(|id| source.joint(id))
                .ok_or_else(|| {
                    fail(format!(
                        "joint '{}' missing from source skeleton '{}'",
                        track.meta.joint_name, source.name
                    ))
                })?;
            let target_joint = target
                .find(target_name)
                .and_then(|id| target.joint(id))
                .ok_or_else(|| {
                    fail(format!(
                        "joint '{target_name}' missing from target skeleton '{}'",
                        target.name
                    ))
                })?;

            track.data.validate().map_err(|reason| {
                fail(format!("track for '{}': {reason}", track.meta.joint_name))
            })?;

            let pair = JointPair {
                source: source_joint,
                target: target_joint,
                source_unit_scale: source.unit_scale(),
            };
            let data = self
                .transform
                .transform(&pair, &track.meta, &track.data)
                .map_err(|err| fail(err.to_string()))?;

            tracks.push(Track {
                meta: TrackMeta {
                    joint_name: target_name.to_string(),
                    target: track.meta.target,
                },
                data,
            });
        }

        if tracks.is_empty() {
            return Err(fail(format!(
                "no track maps onto target skeleton '{}'",
                target.name
            )));
        }

        Ok(AnimationClip::with_duration(
            clip.name.clone(),
            clip.duration,
            tracks,
        ))
    }

    /// Retargets one clip; a failure is logged and reported as `None`.
    #[must_use]
    pub fn retarget(
        &self,
        target: &Skeleton,
        source: &Skeleton,
        clip: &AnimationClip,
        map: &NameMap,
    ) -> Option<AnimationClip> {
        match self.try_retarget(target, source, clip, map) {
            Ok(retargeted) => Some(retargeted),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }

    /// Retargets every clip, keeping only the successes.
    #[must_use]
    pub fn retarget_all(
        &self,
        target: &Skeleton,
        source: &Skeleton,
        clips: &[Arc<AnimationClip>],
        map: &NameMap,
    ) -> Vec<Arc<AnimationClip>> {
        clips
            .iter()
            .filter_map(|clip| self.retarget(target, source, clip, map))
            .map(Arc::new)
            .collect()
    }
}
