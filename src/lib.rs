//! Time alignment of sampled robot motions.
//!
//! motion_warp aligns two recordings of robot motion with Dynamic Time Warping
//! so that a *target* scene can be replayed, traced and graphed on the
//! timeline of a *base* scene. Both motions are sampled on a shared grid;
//! every comparable part position and joint angle contributes to the frame
//! distance, and the cheapest monotonic alignment becomes a pair of parallel
//! index and time maps.
//!
//! # Features
//!
//! - **Sampling**: shared time grid with a sample-rate and sample-count cap
//! - **Comparison**: name-matched position and joint-angle channels, narrowed
//!   by key objects
//! - **Alignment**: full-matrix DTW with a fixed tie-break, optional band,
//!   cell-count guard
//! - **Time warping**: interpolating `time_warp` / `untime_warp`, index and
//!   time maps
//! - **Consumers**: explicit `Identity | Warped` state, visible index windows,
//!   aligned index pairs, graph sample times
//!
//! # Quick Start
//!
//! ```rust
//! use motion_warp::dtw::{DynamicTimeWarp, TimeWarpObj};
//! use motion_warp::feature::FeatureSequence;
//! use motion_warp::AlignConfig;
//!
//! let base = FeatureSequence::from_angles(vec![0.0, 1.0, 2.0, 3.0], &[0.0, 0.5, 1.0, 1.5]).unwrap();
//! let target = FeatureSequence::from_angles(
//!     vec![0.0, 1.0, 2.0, 3.0, 4.0],
//!     &[0.0, 0.0, 0.5, 1.0, 1.5],
//! )
//! .unwrap();
//!
//! let dtw = DynamicTimeWarp::from_sequences(&base, &target, &AlignConfig::default()).unwrap();
//! assert_eq!(dtw.total_cost(), Some(0.0));
//! assert_eq!(dtw.time_warp(1.0), 2.0);
//! assert_eq!(dtw.untime_warp(2.0), 1.0);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Sampling and alignment parameters |
//! | [`sampling`] | Shared sampling grid (`frame_range`) |
//! | [`feature`] | Points, angles, feature vectors and sequences |
//! | [`distance`] | `DistanceMetric` and the default feature metric |
//! | [`comparison`] | Matching comparable series between two motions |
//! | [`dtw`] | Cost matrix, backtrace, `DynamicTimeWarp`, `TimeWarpObj` |
//! | [`warping`] | `TimeWarping` state and consumer helpers |
//! | [`scene`] | Aligning all scenes onto a base scene |
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Empty or single-sample sequences and
//! out-of-range queries are not errors; malformed timestamps and oversized
//! alignments are.
//!
//! # Safety
//!
//! This crate uses `#![forbid(unsafe_code)]`.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod comparison;
pub mod config;
pub mod distance;
pub mod dtw;
pub mod feature;
pub mod sampling;
pub mod scene;
pub mod warping;

pub use config::{AlignConfig, SampleConfig};
pub use dtw::{DynamicTimeWarp, TimeWarpObj};
pub use warping::TimeWarping;
