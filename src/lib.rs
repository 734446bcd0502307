#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod avatar;
pub mod chat;
pub mod errors;
pub mod playlist;
pub mod retarget;
pub mod settings;
pub mod skeleton;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use assets::RigAsset;
pub use avatar::{AvatarView, PlaybackDriver, PlaybackState, ReadyLatch};
pub use chat::{ChatClient, ChatSession, ChatTransport};
pub use errors::{OlloError, Result};
pub use playlist::{PlaylistPlayer, PlaylistTrack};
pub use retarget::{ClipOrigin, ClipRetargeter, ClipSelection, NameMap, RetargetPipeline, build_map, normalize};
pub use settings::OlloSettings;
pub use skeleton::{Joint, JointId, Pose, Skeleton, Transform};
