//! Scene-level alignment and what traces and graphs read from it.

use motion_warp::comparison::{ComparisonSet, KeyObject, PartKey, RobotFrames};
use motion_warp::config::{AlignConfig, SampleConfig};
use motion_warp::sampling::{PROBE_OFFSET, frame_range, frame_range_warped};
use motion_warp::scene::{SceneMotion, align_scenes};
use motion_warp::warping::{IndexRange, TimeWarping, aligned_distances, visibility_mask};
use motion_warp::{Error, TimeWarpObj};

fn line(xs: &[f64]) -> Vec<[f64; 3]> {
    xs.iter().map(|&x| [x, 0.0, 0.0]).collect()
}

fn session() -> (Vec<f64>, Vec<SceneMotion>) {
    let times: Vec<f64> = (0..6).map(|i| i as f64).collect();
    let scenes = vec![
        SceneMotion::new(
            "take1",
            vec![RobotFrames::new("arm").with_position(
                PartKey::Base,
                line(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]),
            )],
        ),
        SceneMotion::new(
            "take2",
            vec![RobotFrames::new("arm").with_position(
                PartKey::Base,
                line(&[0.0, 0.0, 1.0, 2.0, 3.0, 4.0]),
            )],
        ),
        SceneMotion::new(
            "other_robot",
            vec![RobotFrames::new("gripper").with_angles("finger", vec![0.0; 6])],
        ),
    ];
    (times, scenes)
}

#[test]
fn base_scene_warps_the_rest() {
    let (times, scenes) = session();
    let warps = align_scenes("take1", &scenes, &times, &AlignConfig::default()).unwrap();

    assert_eq!(warps.base_id(), Some("take1"));
    assert_eq!(warps.warped_ids().collect::<Vec<_>>(), vec!["take2"]);

    let take2 = warps.warping("take2");
    assert_eq!(take2.time_warp(2.0), 3.0);
    assert_eq!(take2.untime_warp(3.0), 2.0);
    assert_eq!(take2.untime_warp(5.0), 4.0);

    let dtw = take2.as_warp().unwrap();
    assert_eq!(dtw.base_times(), times.as_slice());
    assert_eq!(dtw.time_warp_map().0.len(), dtw.len());
}

#[test]
fn switching_base_recomputes() {
    let (times, scenes) = session();
    let warps = align_scenes("take2", &scenes, &times, &AlignConfig::default()).unwrap();

    assert_eq!(warps.base_id(), Some("take2"));
    assert!(!warps.is_warped("take2"));
    assert!(warps.is_warped("take1"));
    // take2 time 3 shows what take1 does at time 2.
    assert_eq!(warps.warping("take1").time_warp(3.0), 2.0);
}

#[test]
fn unknown_base_is_rejected() {
    let (times, scenes) = session();
    let err = align_scenes("take9", &scenes, &times, &AlignConfig::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownScene(_)));
    assert_eq!(err.to_string(), "unknown scene `take9`");
}

#[test]
fn arrows_follow_the_alignment() {
    let (times, scenes) = session();
    let warps = align_scenes("take1", &scenes, &times, &AlignConfig::default()).unwrap();
    let base = &scenes[0].robots[0].positions[0].1;
    let late = &scenes[1].robots[0].positions[0].1;

    let pairs = warps.warping("take2").index_pairs(times.len());
    assert_eq!(
        pairs,
        vec![(0, 0), (0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 5)]
    );
    let lengths = aligned_distances(base, late, &pairs);
    assert_eq!(lengths, vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);

    let unwarped = warps.warping("other_robot").index_pairs(3);
    assert_eq!(unwarped, vec![(0, 0), (1, 1), (2, 2)]);
}

#[test]
fn trace_window_on_both_states() {
    let (times, scenes) = session();
    let warps = align_scenes("take1", &scenes, &times, &AlignConfig::default()).unwrap();

    let warped = warps.warping("take2").visible_index_range(&times, 1.0, 3.0);
    assert_eq!(warped, Some(IndexRange { start: 2, end: 4 }));
    assert_eq!(
        visibility_mask(times.len(), warped),
        vec![false, false, true, true, true, false]
    );

    let plain = TimeWarping::Identity.visible_index_range(&times, 1.0, 3.0);
    assert_eq!(plain, Some(IndexRange { start: 1, end: 3 }));
    assert_eq!(TimeWarping::Identity.visible_index_range(&times, 7.0, 8.0), None);
}

#[test]
fn graph_samples_warped_scene_on_target_times() {
    let (times, scenes) = session();
    let warps = align_scenes("take1", &scenes, &times, &AlignConfig::default()).unwrap();
    let cfg = SampleConfig::default();

    assert_eq!(
        warps.warping("take2").sample_times(1.0, 3.0, &cfg),
        vec![2.0, 3.0, 4.0]
    );
    assert_eq!(
        warps.warping("other_robot").sample_times(0.0, 1.0, &cfg),
        frame_range(0.0, 1.0, &cfg)
    );
}

#[test]
fn comparison_skips_unmatched_quantities() {
    let base = vec![
        RobotFrames::new("arm")
            .with_position(PartKey::Base, line(&[0.0, 1.0]))
            .with_position(PartKey::part("hand"), line(&[1.0, 2.0]))
            .with_angles("elbow", vec![0.0, 0.1]),
    ];
    let target = vec![
        RobotFrames::new("arm")
            .with_position(PartKey::part("hand"), line(&[1.0, 3.0]))
            .with_angles("shoulder", vec![0.0, 0.1]),
        RobotFrames::new("gripper").with_angles("elbow", vec![0.0, 0.1]),
    ];
    let set = ComparisonSet::between(&base, &target);
    assert_eq!(set.labels(), &["arm/hand"]);
    assert_eq!(set.channels()[0].distance(1, 1), 1.0);
}

#[test]
fn frame_range_caps_and_probes() {
    let capped = SampleConfig {
        sample_rate: 30.0,
        max_samples: 10,
    };
    let times = frame_range(0.0, 5.0, &capped);
    assert_eq!(times.len(), 11);
    assert_eq!(times.first(), Some(&0.0));
    assert_eq!(times.last(), Some(&5.0));

    let cfg = SampleConfig::default();
    assert_eq!(
        frame_range(1.0, 1.01, &cfg),
        vec![1.0 - PROBE_OFFSET, 1.0, 1.0 + PROBE_OFFSET]
    );
    assert_eq!(frame_range(2.0, 2.0, &cfg).len(), 3);
}

#[test]
fn warped_grid_maps_every_sample() {
    let cfg = SampleConfig {
        sample_rate: 1.0,
        max_samples: 100,
    };
    let shifted = frame_range_warped(0.0, 4.0, &cfg, |t| t + 10.0);
    assert_eq!(shifted, vec![10.0, 11.0, 12.0, 13.0, 14.0]);
}

#[test]
fn key_objects_choose_what_drives_the_warp() {
    let times: Vec<f64> = (0..6).map(|i| i as f64).collect();
    let ramp = vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0];
    let robot = |lead: Vec<f64>| {
        RobotFrames::new("r")
            .with_angles("lead", lead)
            .with_angles("steady", ramp.clone())
    };
    let base = SceneMotion::new("base", vec![robot(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])]);
    let late = robot(vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);

    // The steady joint matches sample for sample and pins the diagonal.
    let everything = SceneMotion::new("late", vec![late.clone()]);
    let scenes = [base.clone(), everything];
    let warps = align_scenes("base", &scenes, &times, &AlignConfig::default()).unwrap();
    assert_eq!(
        warps.warping("late").index_pairs(times.len()),
        (0..6).map(|k| (k, k)).collect::<Vec<_>>()
    );

    // Selecting only the lead joint recovers the delay.
    let key: KeyObject = "r\nlead angle".parse().unwrap();
    let selected = SceneMotion::new("late", vec![late]).with_key_objects([key]);
    let scenes = [base, selected];
    let warps = align_scenes("base", &scenes, &times, &AlignConfig::default()).unwrap();
    assert_eq!(
        warps.warping("late").index_pairs(times.len()),
        vec![(0, 0), (0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 5)]
    );
    assert_eq!(
        warps.warping("late").reversed_index_pairs(times.len()),
        vec![(0, 0), (1, 0), (2, 1), (3, 2), (4, 3), (5, 4), (5, 5)]
    );
}
