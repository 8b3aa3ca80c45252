//! Shared sampling grid for comparing motions.

use crate::config::SampleConfig;

/// Offset of the probe samples used when the window is too short for a grid.
pub const PROBE_OFFSET: f64 = 0.001;

/// Number of grid steps for a window of `duration` seconds.
///
/// This is `floor(sample_rate * duration)` capped at `max_samples`.
pub fn step_count(duration: f64, cfg: &SampleConfig) -> usize {
    let wanted = (cfg.sample_rate.abs() * duration.abs()).floor();
    if wanted.is_nan() || wanted < 0.0 {
        return 0;
    }
    wanted.min(cfg.max_samples as f64) as usize
}

/// Evenly spaced sample times covering `[start, end]`.
///
/// The grid has `step_count + 1` samples from `start` to `end` inclusive. If
/// fewer than two steps fit in the window, the three point probe
/// `[start - 0.001, start, start + 0.001]` is returned instead so that
/// velocities can still be estimated around `start`. An inverted window
/// (`end < start`) with room for a grid yields no samples.
///
/// # Example
/// ```
/// use motion_warp::config::SampleConfig;
/// use motion_warp::sampling::frame_range;
///
/// let cfg = SampleConfig { sample_rate: 2.0, max_samples: 100 };
/// let times = frame_range(0.0, 2.0, &cfg);
/// assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
/// ```
pub fn frame_range(start: f64, end: f64, cfg: &SampleConfig) -> Vec<f64> {
    frame_range_warped(start, end, cfg, |t| t)
}

/// Like [`frame_range`], with every grid time passed through `warp`.
///
/// Used to sample a target scene on the base scene's grid.
pub fn frame_range_warped<F>(start: f64, end: f64, cfg: &SampleConfig, warp: F) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let duration = (end - start).abs();
    let steps = step_count(duration, cfg);
    let step = duration / steps as f64;

    if !step.is_finite() || steps < 2 {
        return [start - PROBE_OFFSET, start, start + PROBE_OFFSET]
            .into_iter()
            .map(warp)
            .collect();
    }
    if end < start {
        return Vec::new();
    }

    (0..=steps)
        .map(|k| {
            if k == steps {
                end
            } else {
                start + k as f64 * step
            }
        })
        .map(warp)
        .collect()
}
