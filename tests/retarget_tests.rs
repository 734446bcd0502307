//! Retargeting Tests
//!
//! Tests for:
//! - Joint name normalization
//! - Name mapping tiers (exact, fuzzy, root repair)
//! - Clip retargeting: channel filtering, duration, rest-pose deltas
//! - Pipeline clip selection and fallbacks

use std::sync::Arc;

use glam::{Quat, Vec3};

use ollo::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TrackData, TrackMeta};
use ollo::animation::clip::Track;
use ollo::assets::RigAsset;
use ollo::errors::{OlloError, Result};
use ollo::retarget::{
    ClipOrigin, ClipRetargeter, DrivenRig, JointPair, NameMap, RetargetPipeline, TrackTransform,
    build_map, normalize, select_clips,
};
use ollo::skeleton::{Skeleton, Transform};

const EPSILON: f32 = 1e-4;

fn skeleton(name: &str, joints: &[(&str, Option<usize>, Vec3)]) -> Skeleton {
    let mut skeleton = Skeleton::new(name);
    for &(joint, parent, position) in joints {
        skeleton
            .add_joint(joint, parent.map(ollo::skeleton::JointId), Transform::from_position(position))
            .unwrap();
    }
    skeleton
}

fn rotation_track(joint: &str, times: Vec<f32>) -> Track {
    let values = times
        .iter()
        .map(|&t| Quat::from_rotation_y(t))
        .collect();
    Track::rotation(joint, KeyframeTrack::new(times, values, InterpolationMode::Linear))
}

/// Source rig in centimeters with a three-channel dance.
fn source_rig() -> RigAsset {
    let skeleton = skeleton(
        "mocap",
        &[
            ("mixamorig:Hips", None, Vec3::new(0.0, 100.0, 0.0)),
            ("mixamorig:Spine", Some(0), Vec3::new(0.0, 10.0, 0.0)),
            ("mixamorig:Tail", Some(0), Vec3::new(0.0, -5.0, -5.0)),
        ],
    );
    let dance = AnimationClip::with_duration(
        "dance".to_string(),
        2.5,
        vec![
            rotation_track("mixamorig:Hips", vec![0.0, 1.0, 2.0]),
            rotation_track("mixamorig:Spine", vec![0.0, 0.5, 2.0]),
            rotation_track("mixamorig:Tail", vec![0.0, 2.0]),
            Track::translation(
                "mixamorig:Hips",
                KeyframeTrack::new(
                    vec![0.0, 1.0],
                    vec![Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, 110.0, 20.0)],
                    InterpolationMode::Linear,
                ),
            ),
        ],
    );
    RigAsset::new(skeleton, vec![dance])
}

fn target_rig(clips: Vec<AnimationClip>) -> RigAsset {
    let skeleton = skeleton(
        "avatar",
        &[
            ("Hips", None, Vec3::new(0.0, 1.0, 0.0)),
            ("Spine01", Some(0), Vec3::new(0.0, 0.1, 0.0)),
        ],
    );
    RigAsset::new(skeleton, clips)
}

fn native_wave() -> AnimationClip {
    AnimationClip::new("wave".to_string(), vec![rotation_track("Spine01", vec![0.0, 1.0])])
}

/// Rejects every track, like a transform step that cannot handle the rig.
struct RejectAll;

impl TrackTransform for RejectAll {
    fn transform(&self, pair: &JointPair<'_>, _meta: &TrackMeta, _data: &TrackData) -> Result<TrackData> {
        Err(OlloError::InvalidTrack {
            joint: pair.source.name.clone(),
            reason: "unsupported".to_string(),
        })
    }
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn normalize_strips_rig_prefixes_and_punctuation() {
    assert_eq!(normalize("mixamorig:Hips"), "hips");
    assert_eq!(normalize("Armature|mixamorig:Hips"), "hips");
    assert_eq!(normalize("beta:Spine_01"), "spine01");
    assert_eq!(normalize("mixamorigLeftHand"), "lefthand");
    assert_eq!(normalize("Left Upper.Arm"), "leftupperarm");
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("_:-"), "");
}

#[test]
fn normalize_is_idempotent() {
    let names = [
        "mixamorig:Hips",
        "Armature_mixamorig_Spine2",
        "mixamorig_mixamorigHead",
        "DEF-thigh.L",
        "beta:Root",
        "42",
        "",
    ];
    for name in names {
        let once = normalize(name);
        assert_eq!(normalize(&once), once, "normalize not idempotent for {name:?}");
        assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}

// ============================================================================
// Name Mapping
// ============================================================================

#[test]
fn maps_prefixed_source_onto_numbered_target() {
    let map = build_map(&["mixamorig:Hips", "mixamorig:Spine"], &["Hips", "Spine01"]);
    let expected: NameMap = [("mixamorig:Hips", "Hips"), ("mixamorig:Spine", "Spine01")]
        .into_iter()
        .collect();
    assert_eq!(map, expected);
}

#[test]
fn exact_match_beats_fuzzy_candidates() {
    let map = build_map(&["Spine"], &["Spine01", "Spine"]);
    assert_eq!(map.get("Spine"), Some("Spine"));
}

#[test]
fn fuzzy_match_uses_suffixes() {
    let map = build_map(&["LeftHand", "Head"], &["Character_LeftHand", "HeadTop"]);
    assert_eq!(map.get("LeftHand"), Some("Character_LeftHand"));
    assert_eq!(map.get("Head"), Some("HeadTop"));
}

#[test]
fn empty_keys_never_fuzzy_match() {
    let map = build_map(&["__", "Neck"], &["Neck", "Jaw"]);
    assert_eq!(map.get("__"), None);
    assert_eq!(map.get("Neck"), Some("Neck"));
}

#[test]
fn root_repair_forces_pelvis_mapping() {
    let map = build_map(&["mixamorig:Hips", "Spine"], &["Root_Bone", "Spine"]);
    // "hips" never matches "rootbone"; the repair pass links the two roots
    assert_eq!(map.get("mixamorig:Hips"), Some("Root_Bone"));
    assert_eq!(map.get("Spine"), Some("Spine"));
}

#[test]
fn root_repair_overwrites_an_earlier_fuzzy_mapping() {
    // "rootmotion" ends with "motion", so the fuzzy tier maps it first
    let map = build_map(&["RootMotion", "Hips"], &["Motion", "PelvisBone"]);
    let expected: NameMap = [("RootMotion", "PelvisBone")].into_iter().collect();
    assert_eq!(map, expected);
    assert_eq!(map.get("Hips"), None);
}

#[test]
fn numbered_source_spines_do_not_collapse_onto_one_target() {
    let map = build_map(
        &["mixamorig:Spine", "mixamorig:Spine1", "mixamorig:Spine2"],
        &["Spine", "Spine01", "Spine02"],
    );
    assert_eq!(map.get("mixamorig:Spine"), Some("Spine"));
    assert_eq!(map.get("mixamorig:Spine1"), None);
    assert_eq!(map.get("mixamorig:Spine2"), None);
    assert!(map.iter().all(|(s, t)| t != "Spine" || s == "mixamorig:Spine"));
}

#[test]
fn root_repair_is_noop_without_root_like_target() {
    let map = build_map(&["Hips", "Spine"], &["Chest", "Spine"]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("Hips"), None);
    assert_eq!(map.get("Spine"), Some("Spine"));
}

#[test]
fn root_repair_is_noop_when_root_already_mapped() {
    let map = build_map(&["Pelvis", "Hips"], &["pelvis", "HipsCtrl"]);
    assert_eq!(map.get("Pelvis"), Some("pelvis"));
    assert_eq!(map.get("Hips"), Some("HipsCtrl"));
}

#[test]
fn empty_inputs_give_empty_map() {
    let none: [&str; 0] = [];
    assert!(build_map(&none, &["Hips"]).is_empty());
    assert!(build_map(&["Hips"], &none).is_empty());
}

#[test]
fn duplicate_source_keys_keep_first_mapping() {
    let map = build_map(&["Hips", "Hips"], &["Hips"]);
    assert_eq!(map.len(), 1);
}

#[test]
fn map_values_are_target_members_and_keys_are_source_members() {
    let source = ["mixamorig:Hips", "mixamorig:Spine", "mixamorig:Spine1", "mixamorig:LeftArm", "Extra"];
    let target = ["Hips", "Spine01", "Spine02", "LeftArm"];
    let map = build_map(&source, &target);

    for (s, t) in map.iter() {
        assert!(source.contains(&s), "unknown source {s}");
        assert!(target.contains(&t), "unknown target {t}");
    }
}

#[test]
fn mapping_is_deterministic() {
    let source = ["mixamorig:Hips", "mixamorig:Spine", "mixamorig:Spine1", "mixamorig:Neck", "mixamorig:Head"];
    let target = ["Hips", "Spine01", "Spine02", "Neck", "Head", "HeadTop_End"];
    let first = build_map(&source, &target);
    for _ in 0..10 {
        assert_eq!(build_map(&source, &target), first);
    }
}

// ============================================================================
// Clip Retargeting
// ============================================================================

#[test]
fn retarget_drops_unmapped_channels_and_keeps_timing() {
    let source = source_rig();
    let target = target_rig(vec![]);
    let map = build_map(&source.joint_names(), &target.joint_names());

    let clip = ClipRetargeter::new()
        .retarget(&target.skeleton, &source.skeleton, &source.clips[0], &map)
        .unwrap();

    assert_eq!(clip.name, "dance");
    assert!((clip.duration - 2.5).abs() < EPSILON);
    assert_eq!(clip.channel_names(), vec!["Hips", "Spine01"]);
    assert_eq!(clip.tracks.len(), 3);

    let spine = clip.tracks.iter().find(|t| t.meta.joint_name == "Spine01").unwrap();
    assert_eq!(spine.data.times(), &[0.0, 0.5, 2.0]);
}

#[test]
fn retarget_applies_rest_pose_deltas() {
    let mut source = source_rig();
    source.skeleton.normalize_units(0.01);
    let target = target_rig(vec![]);
    let map = build_map(&source.joint_names(), &target.joint_names());

    let clip = ClipRetargeter::new()
        .try_retarget(&target.skeleton, &source.skeleton, &source.clips[0], &map)
        .unwrap();

    // Identity rest rotations on both sides leave rotations untouched
    let hips_rot = clip
        .tracks
        .iter()
        .find_map(|t| match (&t.data, t.meta.joint_name.as_str()) {
            (TrackData::Quaternion(track), "Hips") => Some(track),
            _ => None,
        })
        .unwrap();
    assert!(hips_rot.values[1].angle_between(Quat::from_rotation_y(1.0)) < EPSILON);

    // Offsets from the source rest are converted to meters around the target rest
    let hips_pos = clip
        .tracks
        .iter()
        .find_map(|t| match &t.data {
            TrackData::Vector3(track) => Some(track),
            TrackData::Quaternion(_) => None,
        })
        .unwrap();
    assert!(hips_pos.values[0].abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPSILON));
    assert!(hips_pos.values[1].abs_diff_eq(Vec3::new(0.0, 1.1, 0.2), EPSILON));
}

#[test]
fn retarget_rotates_into_target_rest_frame() {
    let mut source = Skeleton::new("src");
    source
        .add_joint("Hips", None, Transform::from_rotation(Quat::from_rotation_x(0.5)))
        .unwrap();
    let mut target = Skeleton::new("dst");
    target
        .add_joint("Hips", None, Transform::from_rotation(Quat::from_rotation_z(0.25)))
        .unwrap();

    let q = Quat::from_rotation_y(0.7);
    let clip = AnimationClip::new(
        "turn".to_string(),
        vec![Track::rotation("Hips", KeyframeTrack::new(vec![0.0], vec![q], InterpolationMode::Linear))],
    );
    let map = build_map(&["Hips"], &["Hips"]);

    let out = ClipRetargeter::new().retarget(&target, &source, &clip, &map).unwrap();
    let TrackData::Quaternion(track) = &out.tracks[0].data else {
        panic!("rotation track expected");
    };

    let expected = Quat::from_rotation_z(0.25) * Quat::from_rotation_x(0.5).inverse() * q;
    assert!(track.values[0].angle_between(expected) < EPSILON);

    // The source rest pose lands exactly on the target rest pose
    let rest_clip = AnimationClip::new(
        "rest".to_string(),
        vec![Track::rotation(
            "Hips",
            KeyframeTrack::new(vec![0.0], vec![Quat::from_rotation_x(0.5)], InterpolationMode::Linear),
        )],
    );
    let out = ClipRetargeter::new().retarget(&target, &source, &rest_clip, &map).unwrap();
    let TrackData::Quaternion(track) = &out.tracks[0].data else {
        panic!("rotation track expected");
    };
    assert!(track.values[0].angle_between(Quat::from_rotation_z(0.25)) < EPSILON);
}

#[test]
fn failing_transform_yields_none() {
    let source = source_rig();
    let target = target_rig(vec![]);
    let map = build_map(&source.joint_names(), &target.joint_names());

    let retargeter = ClipRetargeter::with_transform(RejectAll);
    assert!(retargeter.retarget(&target.skeleton, &source.skeleton, &source.clips[0], &map).is_none());

    let err = retargeter
        .try_retarget(&target.skeleton, &source.skeleton, &source.clips[0], &map)
        .unwrap_err();
    assert!(matches!(err, OlloError::RetargetFailed { ref clip, .. } if clip == "dance"));
}

#[test]
fn map_naming_missing_joint_fails_clip() {
    let source = source_rig();
    let target = target_rig(vec![]);
    let map: NameMap = [("mixamorig:Hips", "Ghost")].into_iter().collect();

    let result = ClipRetargeter::new().try_retarget(&target.skeleton, &source.skeleton, &source.clips[0], &map);
    assert!(matches!(result, Err(OlloError::RetargetFailed { .. })));
}

#[test]
fn retarget_all_keeps_successes_only() {
    let source = source_rig();
    let target = target_rig(vec![]);
    let map = build_map(&source.joint_names(), &target.joint_names());

    let orphan = Arc::new(AnimationClip::new("orphan".to_string(), vec![rotation_track("Unmapped", vec![0.0, 1.0])]));
    let clips = vec![Arc::clone(&source.clips[0]), orphan];

    let out = ClipRetargeter::new().retarget_all(&target.skeleton, &source.skeleton, &clips, &map);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "dance");
}

// ============================================================================
// Pipeline & Selection
// ============================================================================

#[test]
fn pipeline_prefers_retargeted_clips() {
    let selection = RetargetPipeline::new().run(&source_rig(), &target_rig(vec![native_wave()]));

    assert_eq!(selection.origin, ClipOrigin::Retargeted);
    assert_eq!(selection.rig, DrivenRig::Target);
    assert_eq!(selection.first().unwrap().name, "dance");
    assert_eq!(selection.name_map.len(), 2);
}

#[test]
fn pipeline_falls_back_to_native_then_source() {
    let pipeline = RetargetPipeline::with_transform(RejectAll);

    let native = pipeline.run(&source_rig(), &target_rig(vec![native_wave()]));
    assert_eq!(native.origin, ClipOrigin::TargetNative);
    assert_eq!(native.rig, DrivenRig::Target);
    assert_eq!(native.first().unwrap().name, "wave");

    let source = source_rig();
    let direct = pipeline.run(&source, &target_rig(vec![]));
    assert_eq!(direct.origin, ClipOrigin::SourceDirect);
    assert_eq!(direct.rig, DrivenRig::Source);
    // Played untouched
    assert!(Arc::ptr_eq(direct.first().unwrap(), &source.clips[0]));
}

#[test]
fn empty_target_exercises_fallback_without_panicking() {
    let empty_target = RigAsset::new(Skeleton::new("empty"), vec![]);
    let selection = RetargetPipeline::new().run(&source_rig(), &empty_target);

    assert!(selection.name_map.is_empty());
    assert_eq!(selection.origin, ClipOrigin::SourceDirect);

    let nothing = RetargetPipeline::new().run(&RigAsset::new(Skeleton::new("bare"), vec![]), &empty_target);
    assert_eq!(nothing.origin, ClipOrigin::None);
    assert!(nothing.clips.is_empty());
    assert!(nothing.first().is_none());
}

#[test]
fn select_clips_order() {
    let a = Arc::new(native_wave());
    let b = Arc::new(AnimationClip::new("b".to_string(), vec![]));

    let picked = select_clips(vec![Arc::clone(&a)], &[Arc::clone(&b)], &[], NameMap::default());
    assert_eq!(picked.origin, ClipOrigin::Retargeted);

    let picked = select_clips(vec![], &[], &[Arc::clone(&b)], NameMap::default());
    assert_eq!(picked.origin, ClipOrigin::SourceDirect);
    assert_eq!(picked.clips.len(), 1);

    let picked = select_clips(vec![], &[], &[], NameMap::default());
    assert_eq!(picked.origin, ClipOrigin::None);
}

#[test]
fn select_clips_skips_malformed_fallbacks() {
    let broken = Arc::new(AnimationClip::new(
        "broken".to_string(),
        vec![Track::rotation(
            "Hips",
            KeyframeTrack::new(vec![0.0, 1.0, 2.0], vec![Quat::IDENTITY], InterpolationMode::Linear),
        )],
    ));
    let good = Arc::new(native_wave());

    let picked = select_clips(vec![], &[Arc::clone(&broken)], &[Arc::clone(&good)], NameMap::default());
    assert_eq!(picked.origin, ClipOrigin::SourceDirect);
    assert_eq!(picked.clips.len(), 1);
    assert_eq!(picked.clips[0].name, "wave");

    let picked = select_clips(vec![], &[Arc::clone(&broken), Arc::clone(&good)], &[], NameMap::default());
    assert_eq!(picked.origin, ClipOrigin::TargetNative);
    assert_eq!(picked.clips.len(), 1);

    let picked = select_clips(vec![], &[broken], &[], NameMap::default());
    assert_eq!(picked.origin, ClipOrigin::None);
}
