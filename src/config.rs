//! Sampling and alignment parameters.

use crate::{Error, Result};

/// Highest playback frame rate of a motion, in frames per second.
pub const MAX_FRAMERATE: f64 = 60.0;

/// Parameters of the shared sampling grid.
///
/// `sample_rate` is in frames per second. When `sample_rate * window` would
/// exceed `max_samples`, the grid is spread evenly so that it holds at most
/// `max_samples` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    pub sample_rate: f64,
    pub max_samples: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            sample_rate: MAX_FRAMERATE / 2.0,
            max_samples: (MAX_FRAMERATE * 10.0) as usize,
        }
    }
}

impl SampleConfig {
    /// Config whose cap fits `sample_rate` over a window of `duration` seconds.
    ///
    /// # Example
    /// ```
    /// use motion_warp::config::SampleConfig;
    ///
    /// let cfg = SampleConfig::for_window(30.0, 4.0);
    /// assert_eq!(cfg.max_samples, 120);
    /// ```
    pub fn for_window(sample_rate: f64, duration: f64) -> Self {
        let sample_rate = sample_rate.abs();
        Self {
            sample_rate,
            max_samples: (duration.abs() * sample_rate) as usize,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate == 0.0 {
            return Err(Error::InvalidParameter {
                name: "sample_rate",
                value: self.sample_rate.to_string(),
                reason: "must be finite and non-zero".to_string(),
            });
        }
        if self.max_samples == 0 {
            return Err(Error::InvalidSize {
                name: "max_samples",
                value: 0,
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

/// Limits applied when building a cost matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignConfig {
    /// Upper bound on `base_len * target_len`. `None` disables the guard.
    pub max_cells: Option<usize>,
    /// Sakoe-Chiba radius around the length-scaled diagonal. `None` fills the
    /// whole matrix.
    pub band_radius: Option<usize>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            max_cells: Some(4_000_000),
            band_radius: None,
        }
    }
}

impl AlignConfig {
    /// No cell limit and no band.
    pub fn unbounded() -> Self {
        Self {
            max_cells: None,
            band_radius: None,
        }
    }

    pub fn with_band(mut self, radius: usize) -> Self {
        self.band_radius = Some(radius);
        self
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = Some(max_cells);
        self
    }

    /// Check a `base_len x target_len` matrix against `max_cells`.
    pub fn check_size(&self, base_len: usize, target_len: usize) -> Result<()> {
        let Some(max_cells) = self.max_cells else {
            return Ok(());
        };
        match base_len.checked_mul(target_len) {
            Some(cells) if cells <= max_cells => Ok(()),
            _ => Err(Error::AlignmentTooLarge {
                base_len,
                target_len,
                max_cells,
            }),
        }
    }
}
