//! Aligning every scene of a session onto one base scene.
//!
//! Designating a base scene computes one warp per other scene, comparing each
//! against the base on a shared sampling grid. The base scene itself, and any
//! scene with nothing comparable to the base, stay unwarped. Choosing another
//! base recomputes everything from scratch.
//!
//! Each scene's key objects pick which of its quantities drive its own warp.

use std::collections::HashMap;

use log::{debug, info};

use crate::comparison::{ComparisonSet, KeyObject, RobotFrames, unique_by};
use crate::config::AlignConfig;
use crate::dtw::DynamicTimeWarp;
use crate::warping::TimeWarping;
use crate::{Error, Result};

static IDENTITY: TimeWarping = TimeWarping::Identity;

/// Sampled motion of one scene.
///
/// Every series of every robot is sampled at the same grid of times.
/// `key_objects` selects what is compared when this scene is warped; empty
/// compares everything shared with the base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMotion {
    pub id: String,
    pub robots: Vec<RobotFrames>,
    pub key_objects: Vec<KeyObject>,
}

impl SceneMotion {
    pub fn new(id: impl Into<String>, robots: Vec<RobotFrames>) -> Self {
        Self {
            id: id.into(),
            robots,
            key_objects: Vec::new(),
        }
    }

    pub fn with_key_objects(mut self, keys: impl IntoIterator<Item = KeyObject>) -> Self {
        self.key_objects.extend(keys);
        self
    }
}

/// Warps of all scenes relative to the current base scene.
#[derive(Debug, Clone, Default)]
pub struct SceneWarps {
    base: Option<String>,
    warps: HashMap<String, TimeWarping>,
}

impl SceneWarps {
    /// No base scene: every scene is unwarped.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn base_id(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Warp of scene `id`, [`TimeWarping::Identity`] for unknown scenes.
    pub fn warping(&self, id: &str) -> &TimeWarping {
        self.warps.get(id).unwrap_or(&IDENTITY)
    }

    pub fn is_warped(&self, id: &str) -> bool {
        self.warping(id).is_warped()
    }

    /// Ids of the scenes that received a non-identity warp.
    pub fn warped_ids(&self) -> impl Iterator<Item = &str> {
        self.warps
            .iter()
            .filter(|(_, w)| w.is_warped())
            .map(|(id, _)| id.as_str())
    }
}

/// Align every scene in `scenes` onto the scene `base_id`.
///
/// `times` is the grid every scene was sampled on. If the base scene has no
/// uniquely named robot there is nothing to compare and no base is set.
///
/// # Errors
/// * [`Error::UnknownScene`] if `base_id` is not among `scenes`
/// * [`Error::ShapeMismatch`] if a compared series does not hold one sample
///   per grid time
/// * any error of [`DynamicTimeWarp::with_config`]; no partial result is kept
pub fn align_scenes(
    base_id: &str,
    scenes: &[SceneMotion],
    times: &[f64],
    config: &AlignConfig,
) -> Result<SceneWarps> {
    let base = scenes
        .iter()
        .find(|s| s.id == base_id)
        .ok_or_else(|| Error::UnknownScene(base_id.to_string()))?;

    if unique_by(&base.robots, |r| r.name.as_str()).is_empty() {
        info!("base scene `{base_id}` has nothing to compare, time warping disabled");
        return Ok(SceneWarps::none());
    }

    let mut warps = HashMap::with_capacity(scenes.len());
    for scene in scenes {
        if scene.id == base_id {
            warps.insert(scene.id.clone(), TimeWarping::Identity);
            continue;
        }

        let set =
            ComparisonSet::between_keys(&base.robots, &scene.robots, &scene.key_objects);
        if set.is_empty() {
            info!("scene `{}` shares nothing with `{base_id}`, left unwarped", scene.id);
            warps.insert(scene.id.clone(), TimeWarping::Identity);
            continue;
        }
        set.check_len(times.len())?;

        debug!(
            "warping scene `{}` onto `{base_id}` over {} channels",
            scene.id,
            set.len()
        );
        let dtw = DynamicTimeWarp::with_config(times, times, &set, config)?;
        warps.insert(scene.id.clone(), dtw.into());
    }

    Ok(SceneWarps {
        base: Some(base_id.to_string()),
        warps,
    })
}
