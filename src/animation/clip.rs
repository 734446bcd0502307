use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMeta {
    pub joint_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn times(&self) -> &[f32] {
        match self {
            TrackData::Vector3(track) => &track.times,
            TrackData::Quaternion(track) => &track.times,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            TrackData::Vector3(track) => track.validate(),
            TrackData::Quaternion(track) => track.validate(),
        }
    }
}

/// A track together with the joint property it animates.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn translation(joint_name: &str, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            meta: TrackMeta {
                joint_name: joint_name.to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(track),
        }
    }

    #[must_use]
    pub fn rotation(joint_name: &str, track: KeyframeTrack<Quat>) -> Self {
        Self {
            meta: TrackMeta {
                joint_name: joint_name.to_string(),
                target: TargetPath::Rotation,
            },
            data: TrackData::Quaternion(track),
        }
    }

    #[must_use]
    pub fn scale(joint_name: &str, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            meta: TrackMeta {
                joint_name: joint_name.to_string(),
                target: TargetPath::Scale,
            },
            data: TrackData::Vector3(track),
        }
    }
}

/// A named, fixed-duration set of per-joint tracks.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Creates a clip whose duration is the latest keyframe of any track.
    #[must_use]
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            tracks,
        }
    }

    /// Creates a clip with an explicit duration (kept even if tracks end earlier).
    #[must_use]
    pub fn with_duration(name: String, duration: f32, tracks: Vec<Track>) -> Self {
        Self {
            name,
            duration,
            tracks,
        }
    }

    /// Checks every track; the error names the first broken joint.
    pub fn validate(&self) -> Result<(), String> {
        for track in &self.tracks {
            track
                .data
                .validate()
                .map_err(|reason| format!("track on '{}': {reason}", track.meta.joint_name))?;
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(format!("invalid duration {}", self.duration));
        }
        Ok(())
    }

    /// Distinct joint names animated by the clip, in first-appearance order.
    #[must_use]
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for track in &self.tracks {
            let name = track.meta.joint_name.as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
