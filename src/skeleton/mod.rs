//! Skeleton arena, joint transforms and poses.

pub mod pose;
#[allow(clippy::module_inception)]
pub mod skeleton;
pub mod transform;

pub use pose::Pose;
pub use skeleton::{Joint, JointId, Skeleton};
pub use transform::Transform;
