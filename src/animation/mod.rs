pub mod values;
pub mod tracks;
pub mod clip;
pub mod action;
pub mod binding;
pub mod binder;
pub mod mixer;

pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use action::{AnimationAction, FadeState, LoopMode};
pub use mixer::{ActionHandle, AnimationMixer};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
