//! Scene Alignment Example
//!
//! Two recordings of the same arm swing, one started late and played slower,
//! are aligned onto each other and queried the way a trace or graph would.

use log::info;
use motion_warp::comparison::{KeyObject, PartKey, RobotFrames};
use motion_warp::config::{AlignConfig, SampleConfig};
use motion_warp::sampling::frame_range;
use motion_warp::scene::{SceneMotion, align_scenes};
use motion_warp::warping::visibility_mask;

fn swing(t: f64) -> f64 {
    (t * 1.5).sin() * 0.8
}

fn arm(times: &[f64], delay: f64, rate: f64) -> RobotFrames {
    let elbow: Vec<f64> = times
        .iter()
        .map(|&t| swing(((t - delay) * rate).max(0.0)))
        .collect();
    let hand = elbow.iter().map(|&a| [a.cos(), a.sin(), 0.5]).collect();
    RobotFrames::new("arm")
        .with_position(PartKey::part("hand"), hand)
        .with_angles("elbow", elbow)
}

fn main() {
    env_logger::init();
    info!("Scene Alignment Example");

    let cfg = SampleConfig::default();
    if let Err(e) = cfg.validate() {
        log::error!("bad sampling config: {e}");
        return;
    }
    let times = frame_range(0.0, 6.0, &cfg);
    info!("Shared grid: {} samples at {} fps", times.len(), cfg.sample_rate);

    let scenes = vec![
        SceneMotion::new("reference", vec![arm(&times, 0.0, 1.0)]),
        SceneMotion::new("retake", vec![arm(&times, 0.7, 0.85)]).with_key_objects([
            KeyObject::angle("arm", "elbow"),
            KeyObject::position("arm", PartKey::part("hand")),
        ]),
    ];

    let warps = match align_scenes("reference", &scenes, &times, &AlignConfig::default()) {
        Ok(w) => w,
        Err(e) => {
            log::error!("alignment failed: {e}");
            return;
        }
    };

    let retake = warps.warping("retake");
    let Some(dtw) = retake.as_warp() else {
        info!("retake is not warped");
        return;
    };
    info!("Warp path length: {} steps", dtw.len());
    info!("Total cost: {:.4}", dtw.total_cost().unwrap_or(f64::NAN));

    info!("\nReference time -> retake time:");
    for t in [0.0, 1.0, 2.0, 3.0, 4.0, 5.0] {
        let u = retake.time_warp(t);
        info!("  {:.2}s -> {:.2}s (back to {:.2}s)", t, u, retake.untime_warp(u));
    }

    let range = retake.visible_index_range(&times, 2.0, 4.0);
    let mask = visibility_mask(times.len(), range);
    info!(
        "Window [2s, 4s] shows retake samples {:?} ({} visible)",
        range,
        mask.iter().filter(|&&v| v).count()
    );
}
