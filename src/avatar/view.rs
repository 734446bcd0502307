use glam::Affine3A;

use crate::animation::AnimationMixer;
use crate::assets::RigAsset;
use crate::avatar::latch::ReadyLatch;
use crate::avatar::playback::{PlaybackDriver, PlaybackState};
use crate::retarget::{ClipSelection, DrivenRig, NameMap, RestPoseDelta, RetargetPipeline, TrackTransform};
use crate::settings::AvatarSettings;
use crate::skeleton::{Pose, Skeleton};

/// The animated avatar for one mount of the companion view.
///
/// Retargeting runs once in [`mount`](Self::mount); afterwards the view only
/// advances the mixer frame by frame until [`unmount`](Self::unmount).
#[derive(Debug)]
pub struct AvatarView {
    source: RigAsset,
    target: RigAsset,
    selection: ClipSelection,
    mixer: AnimationMixer,
    driver: PlaybackDriver,
    pose: Pose,
    ready: ReadyLatch,
}

impl AvatarView {
    /// Mounts the avatar with the default rest-pose retargeting.
    pub fn mount(
        source: RigAsset,
        target: RigAsset,
        settings: &AvatarSettings,
        on_ready: impl FnOnce() + 'static,
    ) -> Self {
        Self::mount_with(
            &RetargetPipeline::<RestPoseDelta>::new(),
            source,
            target,
            settings,
            ReadyLatch::new(on_ready),
        )
    }

    /// Mounts the avatar through a specific pipeline.
    pub fn mount_with<T: TrackTransform>(
        pipeline: &RetargetPipeline<T>,
        mut source: RigAsset,
        target: RigAsset,
        settings: &AvatarSettings,
        ready: ReadyLatch,
    ) -> Self {
        source.skeleton.normalize_units(settings.source_unit_scale);

        let selection = pipeline.run(&source, &target);
        let skeleton = match selection.rig {
            DrivenRig::Target => &target.skeleton,
            DrivenRig::Source => &source.skeleton,
        };

        let pose = Pose::rest(skeleton);
        let mut mixer = AnimationMixer::new();
        let mut driver = PlaybackDriver::from_settings(settings);
        driver.mount(&mut mixer, &selection.clips, skeleton);

        Self {
            source,
            target,
            selection,
            mixer,
            driver,
            pose,
            ready,
        }
    }

    /// Per-frame callback: advances animation and signals readiness once.
    pub fn frame(&mut self, dt: f32) {
        let skeleton = match self.selection.rig {
            DrivenRig::Target => &self.target.skeleton,
            DrivenRig::Source => &self.source.skeleton,
        };
        self.mixer.update(dt, skeleton, &mut self.pose);
        self.driver.update(&mut self.mixer);

        if self.ready.on_frame() {
            log::info!(
                "Avatar '{}' ready, playing {:?}",
                skeleton.name,
                self.mixer.playing_action_names()
            );
        }
    }

    /// Starts the fade-out; following frames finish the stop.
    pub fn unmount(&mut self) {
        self.driver.unmount(&mut self.mixer);
    }

    /// The skeleton the selected clips animate.
    #[must_use]
    pub fn driven_skeleton(&self) -> &Skeleton {
        match self.selection.rig {
            DrivenRig::Target => &self.target.skeleton,
            DrivenRig::Source => &self.source.skeleton,
        }
    }

    #[inline]
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// World matrices of the driven skeleton for the current pose.
    #[must_use]
    pub fn world_matrices(&self) -> Vec<Affine3A> {
        self.pose.world_matrices(self.driven_skeleton())
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &ClipSelection {
        &self.selection
    }

    #[inline]
    #[must_use]
    pub fn name_map(&self) -> &NameMap {
        &self.selection.name_map
    }

    #[inline]
    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[inline]
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.driver.state()
    }

    #[must_use]
    pub fn playing_action_names(&self) -> Vec<&str> {
        self.mixer.playing_action_names()
    }

    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.is_fired()
    }
}
