//! Time-warp state of a target scene and what consumers read from it.
//!
//! A scene is either not warped ([`TimeWarping::Identity`], samples correspond
//! 1:1 by index and time) or warped onto a base scene by a shared
//! [`DynamicTimeWarp`]. Traces, arrows and graphs must handle both states;
//! neither is an error.

use std::sync::Arc;

use crate::config::SampleConfig;
use crate::dtw::{DynamicTimeWarp, TimeWarpObj};
use crate::feature::{Point3, euclidean};
use crate::sampling::frame_range;

#[derive(Debug, Clone, Default)]
pub enum TimeWarping {
    #[default]
    Identity,
    Warped(Arc<DynamicTimeWarp>),
}

impl From<DynamicTimeWarp> for TimeWarping {
    fn from(dtw: DynamicTimeWarp) -> Self {
        TimeWarping::Warped(Arc::new(dtw))
    }
}

impl TimeWarping {
    pub fn is_warped(&self) -> bool {
        matches!(self, TimeWarping::Warped(_))
    }

    pub fn as_warp(&self) -> Option<&DynamicTimeWarp> {
        match self {
            TimeWarping::Identity => None,
            TimeWarping::Warped(dtw) => Some(dtw.as_ref()),
        }
    }

    /// Base time to target time; unchanged when not warped.
    pub fn time_warp(&self, base_time: f64) -> f64 {
        match self {
            TimeWarping::Identity => base_time,
            TimeWarping::Warped(dtw) => dtw.time_warp(base_time),
        }
    }

    /// Target time to base time; unchanged when not warped.
    pub fn untime_warp(&self, target_time: f64) -> f64 {
        match self {
            TimeWarping::Identity => target_time,
            TimeWarping::Warped(dtw) => dtw.untime_warp(target_time),
        }
    }

    /// `(base_index, target_index)` pairs to compare.
    ///
    /// The alignment path when warped, otherwise `(k, k)` for every `k < len`.
    pub fn index_pairs(&self, len: usize) -> Vec<(usize, usize)> {
        match self {
            TimeWarping::Identity => (0..len).map(|k| (k, k)).collect(),
            TimeWarping::Warped(dtw) => dtw.path().collect(),
        }
    }

    /// `(target_index, base_index)` pairs, for arrows drawn from this scene
    /// toward the base scene.
    pub fn reversed_index_pairs(&self, len: usize) -> Vec<(usize, usize)> {
        self.index_pairs(len)
            .into_iter()
            .map(|(i, j)| (j, i))
            .collect()
    }

    /// Range of this scene's samples visible in the base window `[start, end]`.
    ///
    /// When warped, the window is read against the base times of the warp
    /// map and the matching target indices are returned. Otherwise
    /// `own_times` is scanned directly. `None` if no sample falls inside.
    ///
    /// # Example
    /// ```
    /// use motion_warp::warping::{IndexRange, TimeWarping};
    ///
    /// let times = [0.0, 0.5, 1.0, 1.5, 2.0];
    /// let range = TimeWarping::Identity.visible_index_range(&times, 0.4, 1.5);
    /// assert_eq!(range, Some(IndexRange { start: 1, end: 3 }));
    /// ```
    pub fn visible_index_range(&self, own_times: &[f64], start: f64, end: f64) -> Option<IndexRange> {
        let (times, indices): (&[f64], Option<&[usize]>) = match self {
            TimeWarping::Identity => (own_times, None),
            TimeWarping::Warped(dtw) => {
                let (base_times, _) = dtw.time_warp_map();
                let (_, target_indices) = dtw.index_map();
                (base_times, Some(target_indices))
            }
        };

        let first = times.iter().position(|&t| t >= start)?;
        let last = times.iter().rposition(|&t| t <= end)?;
        if first > last {
            return None;
        }
        let (start, end) = match indices {
            Some(indices) => (indices[first], indices[last]),
            None => (first, last),
        };
        Some(IndexRange { start, end })
    }

    /// Times at which to sample this scene for a graph of the window.
    ///
    /// Warped scenes use the target times of the warp map whose base time is
    /// inside `[start, end]`. Unwarped scenes use the shared grid.
    pub fn sample_times(&self, start: f64, end: f64, cfg: &SampleConfig) -> Vec<f64> {
        match self {
            TimeWarping::Identity => frame_range(start, end, cfg),
            TimeWarping::Warped(dtw) => {
                let (base_times, target_times) = dtw.time_warp_map();
                base_times
                    .iter()
                    .zip(target_times)
                    .filter(|&(&b, _)| b >= start && b <= end)
                    .map(|(_, &t)| t)
                    .collect()
            }
        }
    }
}

/// Inclusive range of sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Per-sample visibility for `len` samples: hidden outside `range`.
///
/// Samples are hidden rather than dropped so that the window can move again.
pub fn visibility_mask(len: usize, range: Option<IndexRange>) -> Vec<bool> {
    (0..len)
        .map(|i| range.is_some_and(|r| r.contains(i)))
        .collect()
}

/// Distance between `from[i]` and `to[j]` for every aligned pair.
///
/// Pairs pointing past either trace are skipped.
pub fn aligned_distances(from: &[Point3], to: &[Point3], pairs: &[(usize, usize)]) -> Vec<f64> {
    pairs
        .iter()
        .filter_map(|&(i, j)| Some(euclidean(from.get(i)?, to.get(j)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned() -> TimeWarping {
        let same = |_: f64, _: f64, _: usize, _: usize| 0.0;
        DynamicTimeWarp::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0, 4.0], &same)
            .unwrap()
            .into()
    }

    #[test]
    fn identity_passes_times_through() {
        let w = TimeWarping::default();
        assert!(!w.is_warped());
        assert!(w.as_warp().is_none());
        assert_eq!(w.time_warp(1.7), 1.7);
        assert_eq!(w.untime_warp(-2.0), -2.0);
        assert_eq!(w.index_pairs(3), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn warped_pairs_follow_path() {
        let w = pinned();
        assert!(w.is_warped());
        assert_eq!(
            w.index_pairs(99),
            vec![(0, 0), (0, 1), (1, 2), (2, 3), (3, 4)]
        );
        assert_eq!(w.time_warp(1.0), 2.0);
        assert_eq!(w.untime_warp(2.0), 1.0);
    }

    #[test]
    fn reversed_pairs_swap_sides() {
        assert_eq!(
            pinned().reversed_index_pairs(99),
            vec![(0, 0), (1, 0), (2, 1), (3, 2), (4, 3)]
        );
        assert_eq!(
            TimeWarping::Identity.reversed_index_pairs(2),
            vec![(0, 0), (1, 1)]
        );
    }

    #[test]
    fn warped_window_uses_target_indices() {
        let w = pinned();
        let own = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            w.visible_index_range(&own, 1.0, 2.0),
            Some(IndexRange { start: 2, end: 3 })
        );
        assert_eq!(
            w.visible_index_range(&own, 0.0, 0.0),
            Some(IndexRange { start: 0, end: 1 })
        );
        assert_eq!(w.visible_index_range(&own, 5.0, 6.0), None);
    }

    #[test]
    fn identity_window_between_samples_is_empty() {
        let times = [0.0, 1.0, 2.0];
        assert_eq!(
            TimeWarping::Identity.visible_index_range(&times, 0.2, 0.8),
            None
        );
        assert_eq!(TimeWarping::Identity.visible_index_range(&[], 0.0, 1.0), None);
    }

    #[test]
    fn mask_hides_outside_range() {
        let mask = visibility_mask(5, Some(IndexRange { start: 1, end: 3 }));
        assert_eq!(mask, vec![false, true, true, true, false]);
        assert_eq!(visibility_mask(2, None), vec![false, false]);
    }

    #[test]
    fn warped_sample_times_follow_map() {
        let w = pinned();
        let cfg = SampleConfig::default();
        assert_eq!(w.sample_times(0.0, 1.0, &cfg), vec![0.0, 1.0, 2.0]);
        assert_eq!(
            TimeWarping::Identity.sample_times(0.0, 1.0, &cfg).len(),
            31
        );
    }

    #[test]
    fn distances_over_pairs() {
        let from = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let to = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 2.0]];
        let d = aligned_distances(&from, &to, &[(0, 0), (0, 1), (1, 2), (5, 0)]);
        assert_eq!(d, vec![0.0, 0.0, 2.0]);
    }
}
