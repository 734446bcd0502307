use std::path::Path;
use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::Deserialize;
use uuid::Uuid;

use crate::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track};
use crate::errors::{OlloError, Result};
use crate::skeleton::{JointId, Skeleton, Transform};

/// A loaded rig: one skeleton plus the clips shipped with it.
#[derive(Debug, Clone)]
pub struct RigAsset {
    pub id: Uuid,
    pub name: String,
    pub skeleton: Skeleton,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl RigAsset {
    #[must_use]
    pub fn new(skeleton: Skeleton, clips: Vec<AnimationClip>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: skeleton.name.clone(),
            skeleton,
            clips: clips.into_iter().map(Arc::new).collect(),
        }
    }

    /// Loads a JSON rig description from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => OlloError::AssetNotFound(path.display().to_string()),
            _ => OlloError::IoError(err),
        })?;
        let rig = Self::from_json_slice(&bytes)?;
        log::info!(
            "Loaded rig '{}' from {} ({} joints, {} clips)",
            rig.name,
            path.display(),
            rig.skeleton.len(),
            rig.clips.len()
        );
        Ok(rig)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let descriptor: RigDescriptor = serde_json::from_slice(bytes)?;
        descriptor.build()
    }

    /// Joint names in skeleton enumeration order.
    #[must_use]
    pub fn joint_names(&self) -> Vec<&str> {
        self.skeleton.joint_names().collect()
    }
}

// ============================================================================
// On-disk description
// ============================================================================

#[derive(Debug, Deserialize)]
struct RigDescriptor {
    name: String,
    #[serde(default)]
    joints: Vec<JointDescriptor>,
    #[serde(default)]
    clips: Vec<ClipDescriptor>,
}

#[derive(Debug, Deserialize)]
struct JointDescriptor {
    name: String,
    #[serde(default)]
    parent: Option<usize>,
    #[serde(default)]
    translation: Option<[f32; 3]>,
    /// `[x, y, z, w]`
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
}

#[derive(Debug, Deserialize)]
struct ClipDescriptor {
    name: String,
    #[serde(default)]
    duration: Option<f32>,
    #[serde(default)]
    tracks: Vec<TrackDescriptor>,
}

#[derive(Debug, Deserialize)]
struct TrackDescriptor {
    joint: String,
    path: TargetPath,
    #[serde(default)]
    interpolation: InterpolationMode,
    times: Vec<f32>,
    values: Vec<f32>,
}

impl RigDescriptor {
    fn build(self) -> Result<RigAsset> {
        let mut skeleton = Skeleton::new(&self.name);
        for joint in &self.joints {
            let rest = Transform::new(
                joint.translation.map_or(Vec3::ZERO, Vec3::from_array),
                joint.rotation.map_or(Quat::IDENTITY, Quat::from_array),
                joint.scale.map_or(Vec3::ONE, Vec3::from_array),
            );
            skeleton.add_joint(&joint.name, joint.parent.map(JointId), rest)?;
        }

        let clips = self
            .clips
            .into_iter()
            .map(ClipDescriptor::build)
            .collect::<Result<Vec<_>>>()?;

        Ok(RigAsset::new(skeleton, clips))
    }
}

impl ClipDescriptor {
    fn build(self) -> Result<AnimationClip> {
        let tracks = self
            .tracks
            .into_iter()
            .map(TrackDescriptor::build)
            .collect::<Result<Vec<_>>>()?;

        Ok(match self.duration {
            Some(duration) => AnimationClip::with_duration(self.name, duration, tracks),
            None => AnimationClip::new(self.name, tracks),
        })
    }
}

impl TrackDescriptor {
    fn build(self) -> Result<Track> {
        let invalid = |reason: String| OlloError::InvalidTrack {
            joint: self.joint.clone(),
            reason,
        };

        let track = match self.path {
            TargetPath::Rotation => {
                let data = KeyframeTrack::<Quat>::from_flat(self.times.clone(), &self.values, self.interpolation)
                    .ok_or_else(|| invalid("rotation values are not a multiple of 4".to_string()))?;
                data.validate().map_err(invalid)?;
                Track::rotation(&self.joint, data)
            }
            TargetPath::Translation | TargetPath::Scale => {
                let data = KeyframeTrack::<Vec3>::from_flat(self.times.clone(), &self.values, self.interpolation)
                    .ok_or_else(|| invalid("vector values are not a multiple of 3".to_string()))?;
                data.validate().map_err(invalid)?;
                if self.path == TargetPath::Translation {
                    Track::translation(&self.joint, data)
                } else {
                    Track::scale(&self.joint, data)
                }
            }
        };

        Ok(track)
    }
}
