//! Rig assets: a skeleton and the clips authored for it.

pub mod rig;

pub use rig::RigAsset;
