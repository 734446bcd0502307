//! Avatar lifecycle: clip playback, the ready signal and the mounted view.

pub mod latch;
pub mod playback;
pub mod view;

pub use latch::ReadyLatch;
pub use playback::{PlaybackDriver, PlaybackState};
pub use view::AvatarView;
