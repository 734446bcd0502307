//! Skeletal animation retargeting.
//!
//! The stages run once per (source, target) rig pair:
//!
//! 1. [`normalize`] joint names into comparable keys,
//! 2. [`build_map`] source joints onto target joints,
//! 3. [`ClipRetargeter`] rewrites each source clip (failures drop the clip),
//! 4. [`select_clips`] falls back to native or raw source clips when nothing
//!    could be retargeted.

pub mod mapper;
pub mod normalize;
pub mod pipeline;
pub mod retargeter;

pub use mapper::{NameMap, ROOT_TOKENS, build_map, exact_match, fuzzy_match, keyed, repair_root};
pub use normalize::normalize;
pub use pipeline::{ClipOrigin, ClipSelection, DrivenRig, RetargetPipeline, select_clips};
pub use retargeter::{ClipRetargeter, JointPair, RestPoseDelta, TrackTransform};
