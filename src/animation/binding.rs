use serde::Deserialize;

use crate::skeleton::JointId;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPath {
    #[serde(alias = "position")]
    Translation, // Maps to transform.position
    #[serde(alias = "quaternion")]
    Rotation, // Maps to transform.rotation
    Scale, // Maps to transform.scale
}

/// Binding relationship: maps track `track_index` from a clip to the target
/// property of `joint` in a skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub joint: JointId,
    pub target: TargetPath,
}
