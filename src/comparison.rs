//! Matching comparable quantities between two sampled motions.
//!
//! Both motions are sampled on the same grid, one series per robot part
//! position and per joint angle. A quantity is compared only when its robot
//! name is unique in both scenes, its part or joint name is unique within
//! both robots, and it is present on both sides. Every matched pair becomes a
//! [`Channel`], and a [`ComparisonSet`] of channels is the default metric used
//! to align the two motions.
//!
//! A scene may narrow the comparison to a list of [`KeyObject`]s. Only the
//! target quantities named by a key then take part; an empty list compares
//! everything.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::distance::DistanceMetric;
use crate::feature::{Feature, FeatureVector, Point3, euclidean};
use crate::{Error, Result};

/// Which part of a robot a position series belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartKey {
    /// The robot's root.
    Base,
    /// A link or joint, by name.
    Part(String),
}

impl PartKey {
    pub fn part(name: impl Into<String>) -> Self {
        PartKey::Part(name.into())
    }
}

/// What a [`KeyObject`] selects: a position series or a joint angle series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Position,
    Angle,
}

/// One quantity selected for time warping.
///
/// The text form is `"robot\npart kind"`, `kind` being `angle` or
/// `position`. An empty part selects the robot's root position whatever the
/// kind; any kind other than `angle` means position.
///
/// # Example
/// ```
/// use motion_warp::comparison::{KeyObject, PartKey, Quantity};
///
/// let key: KeyObject = "arm\nelbow angle".parse().unwrap();
/// assert_eq!(key, KeyObject::angle("arm", "elbow"));
///
/// let root: KeyObject = "arm\n angle".parse().unwrap();
/// assert_eq!(root.part, PartKey::Base);
/// assert_eq!(root.quantity, Quantity::Position);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyObject {
    pub robot: String,
    pub part: PartKey,
    pub quantity: Quantity,
}

impl KeyObject {
    pub fn position(robot: impl Into<String>, part: PartKey) -> Self {
        Self {
            robot: robot.into(),
            part,
            quantity: Quantity::Position,
        }
    }

    pub fn angle(robot: impl Into<String>, joint: impl Into<String>) -> Self {
        Self {
            robot: robot.into(),
            part: PartKey::Part(joint.into()),
            quantity: Quantity::Angle,
        }
    }

    fn selects_position(&self, robot: &str, part: &PartKey) -> bool {
        self.quantity == Quantity::Position && self.robot == robot && self.part == *part
    }

    fn selects_angle(&self, robot: &str, joint: &str) -> bool {
        self.quantity == Quantity::Angle
            && self.robot == robot
            && matches!(&self.part, PartKey::Part(p) if p == joint)
    }
}

impl FromStr for KeyObject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidParameter {
            name: "key_object",
            value: format!("{s:?}"),
            reason: reason.to_string(),
        };
        let (robot, content) = s
            .split_once('\n')
            .ok_or_else(|| invalid("expected `robot\\npart kind`"))?;
        if robot.is_empty() {
            return Err(invalid("robot name is empty"));
        }
        let (part, kind) = content.split_once(' ').unwrap_or((content, ""));

        if part.is_empty() {
            return Ok(Self::position(robot, PartKey::Base));
        }
        Ok(match kind {
            "angle" => Self::angle(robot, part),
            _ => Self::position(robot, PartKey::part(part)),
        })
    }
}

impl fmt::Display for KeyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = match &self.part {
            PartKey::Base => "",
            PartKey::Part(name) => name.as_str(),
        };
        let kind = match self.quantity {
            Quantity::Position => "position",
            Quantity::Angle => "angle",
        };
        write!(f, "{}\n{} {}", self.robot, part, kind)
    }
}

/// Sampled series of one robot in one scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotFrames {
    pub name: String,
    pub positions: Vec<(PartKey, Vec<Point3>)>,
    pub joint_angles: Vec<(String, Vec<f64>)>,
}

impl RobotFrames {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, part: PartKey, series: Vec<Point3>) -> Self {
        self.positions.push((part, series));
        self
    }

    pub fn with_angles(mut self, joint: impl Into<String>, series: Vec<f64>) -> Self {
        self.joint_angles.push((joint.into(), series));
        self
    }
}

/// One matched quantity: the base series and the target series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channel<'a> {
    Position {
        base: &'a [Point3],
        target: &'a [Point3],
    },
    Angle {
        base: &'a [f64],
        target: &'a [f64],
    },
}

impl Channel<'_> {
    /// Distance between base sample `i` and target sample `j`.
    ///
    /// An index past the end of a series costs `+inf`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        match self {
            Channel::Position { base, target } => match (base.get(i), target.get(j)) {
                (Some(b), Some(t)) => euclidean(b, t),
                _ => f64::INFINITY,
            },
            Channel::Angle { base, target } => match (base.get(i), target.get(j)) {
                (Some(b), Some(t)) => (b - t).abs(),
                _ => f64::INFINITY,
            },
        }
    }

    /// `(base_len, target_len)` of the two series.
    pub fn lens(&self) -> (usize, usize) {
        match self {
            Channel::Position { base, target } => (base.len(), target.len()),
            Channel::Angle { base, target } => (base.len(), target.len()),
        }
    }

    fn features(&self, i: usize, j: usize) -> Option<(Feature, Feature)> {
        match self {
            Channel::Position { base, target } => {
                Some((Feature::Point(*base.get(i)?), Feature::Point(*target.get(j)?)))
            }
            Channel::Angle { base, target } => {
                Some((Feature::Angle(*base.get(i)?), Feature::Angle(*target.get(j)?)))
            }
        }
    }
}

/// Everything comparable between a base motion and a target motion.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSet<'a> {
    channels: Vec<Channel<'a>>,
    labels: Vec<String>,
}

impl<'a> ComparisonSet<'a> {
    /// Match the robots of `target` against those of `base`.
    ///
    /// Channels follow the order of `target`: for each robot its positions
    /// first, then its joint angles.
    ///
    /// # Example
    /// ```
    /// use motion_warp::comparison::{ComparisonSet, PartKey, RobotFrames};
    ///
    /// let base = vec![RobotFrames::new("arm")
    ///     .with_position(PartKey::Base, vec![[0.0, 0.0, 0.0]; 3])
    ///     .with_angles("elbow", vec![0.0, 0.5, 1.0])];
    /// let target = vec![RobotFrames::new("arm")
    ///     .with_angles("elbow", vec![0.0, 0.0, 0.5])
    ///     .with_angles("wrist", vec![1.0; 3])];
    ///
    /// let set = ComparisonSet::between(&base, &target);
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(set.labels(), &["arm/elbow"]);
    /// ```
    pub fn between(base: &'a [RobotFrames], target: &'a [RobotFrames]) -> Self {
        Self::between_keys(base, target, &[])
    }

    /// Like [`between`](Self::between), keeping only target quantities
    /// selected by one of `keys`. No keys keeps everything.
    ///
    /// # Example
    /// ```
    /// use motion_warp::comparison::{ComparisonSet, KeyObject, RobotFrames};
    ///
    /// let base = vec![RobotFrames::new("arm")
    ///     .with_angles("elbow", vec![0.0, 1.0])
    ///     .with_angles("wrist", vec![0.0, 1.0])];
    /// let keys = [KeyObject::angle("arm", "wrist")];
    ///
    /// let set = ComparisonSet::between_keys(&base, &base, &keys);
    /// assert_eq!(set.labels(), &["arm/wrist"]);
    /// ```
    pub fn between_keys(
        base: &'a [RobotFrames],
        target: &'a [RobotFrames],
        keys: &[KeyObject],
    ) -> Self {
        let wants_position = |robot: &str, part: &PartKey| {
            keys.is_empty() || keys.iter().any(|k| k.selects_position(robot, part))
        };
        let wants_angle = |robot: &str, joint: &str| {
            keys.is_empty() || keys.iter().any(|k| k.selects_angle(robot, joint))
        };

        let base_robots: HashMap<&str, &RobotFrames> = unique_by(base, |r| r.name.as_str())
            .into_iter()
            .map(|r| (r.name.as_str(), r))
            .collect();

        let mut set = Self::default();
        for robot in unique_by(target, |r| r.name.as_str()) {
            let Some(base_robot) = base_robots.get(robot.name.as_str()) else {
                continue;
            };

            let base_positions: HashMap<&PartKey, &Vec<Point3>> =
                unique_by(&base_robot.positions, |(k, _)| k)
                    .into_iter()
                    .map(|(k, s)| (k, s))
                    .collect();
            for (key, series) in unique_by(&robot.positions, |(k, _)| k) {
                if !wants_position(robot.name.as_str(), key) {
                    continue;
                }
                if let Some(base_series) = base_positions.get(key) {
                    set.channels.push(Channel::Position {
                        base: base_series.as_slice(),
                        target: series.as_slice(),
                    });
                    set.labels.push(match key {
                        PartKey::Base => robot.name.clone(),
                        PartKey::Part(part) => format!("{}/{}", robot.name, part),
                    });
                }
            }

            let base_angles: HashMap<&str, &Vec<f64>> =
                unique_by(&base_robot.joint_angles, |(n, _)| n.as_str())
                    .into_iter()
                    .map(|(n, s)| (n.as_str(), s))
                    .collect();
            for (joint, series) in unique_by(&robot.joint_angles, |(n, _)| n.as_str()) {
                if !wants_angle(robot.name.as_str(), joint.as_str()) {
                    continue;
                }
                if let Some(base_series) = base_angles.get(joint.as_str()) {
                    set.channels.push(Channel::Angle {
                        base: base_series.as_slice(),
                        target: series.as_slice(),
                    });
                    set.labels.push(format!("{}/{}", robot.name, joint));
                }
            }
        }
        set
    }

    pub fn channels(&self) -> &[Channel<'a>] {
        &self.channels
    }

    /// `robot` for a root position, `robot/part` otherwise, parallel to
    /// [`channels`](Self::channels).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Check that every series of every channel holds `len` samples.
    pub fn check_len(&self, len: usize) -> Result<()> {
        for (channel, label) in self.channels.iter().zip(&self.labels) {
            let (base_len, target_len) = channel.lens();
            for (side, got) in [("base", base_len), ("target", target_len)] {
                if got != len {
                    return Err(Error::ShapeMismatch {
                        expected: format!("{len} samples"),
                        got: format!("{got} samples in {side} series `{label}`"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Base frame `i` and target frame `j` as feature vectors.
    pub fn frame(&self, i: usize, j: usize) -> Option<(FeatureVector, FeatureVector)> {
        self.channels
            .iter()
            .map(|c| c.features(i, j))
            .collect::<Option<Vec<_>>>()
            .map(|pairs| pairs.into_iter().unzip())
    }
}

impl DistanceMetric for ComparisonSet<'_> {
    fn distance(&self, _: f64, _: f64, base_index: usize, target_index: usize) -> f64 {
        self.channels
            .iter()
            .map(|c| c.distance(base_index, target_index))
            .sum()
    }
}

/// Items whose key occurs exactly once in `items`, in their original order.
pub(crate) fn unique_by<'a, T, K, F>(items: &'a [T], key: F) -> Vec<&'a T>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    items
        .iter()
        .filter(|&item| counts.get(&key(item)) == Some(&1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Feature;

    fn arm(name: &str, elbow: Vec<f64>) -> RobotFrames {
        RobotFrames::new(name)
            .with_position(PartKey::Base, vec![[0.0, 0.0, 0.0]; elbow.len()])
            .with_position(
                PartKey::part("hand"),
                elbow.iter().map(|&a| [a.cos(), a.sin(), 0.0]).collect(),
            )
            .with_angles("elbow", elbow)
    }

    #[test]
    fn matches_by_name() {
        let base = vec![arm("a", vec![0.0, 1.0]), arm("b", vec![0.0, 0.0])];
        let target = vec![arm("b", vec![1.0, 1.0]), arm("c", vec![0.0, 0.0])];
        let set = ComparisonSet::between(&base, &target);
        assert_eq!(set.labels(), &["b", "b/hand", "b/elbow"]);
    }

    #[test]
    fn duplicate_robot_names_are_skipped() {
        let base = vec![arm("a", vec![0.0]), arm("a", vec![1.0])];
        let target = vec![arm("a", vec![0.0])];
        assert!(ComparisonSet::between(&base, &target).is_empty());
        assert!(ComparisonSet::between(&target, &base).is_empty());
    }

    #[test]
    fn duplicate_joint_names_are_skipped() {
        let base = vec![
            RobotFrames::new("r")
                .with_angles("j", vec![0.0])
                .with_angles("j", vec![1.0])
                .with_angles("k", vec![2.0]),
        ];
        let target = vec![
            RobotFrames::new("r")
                .with_angles("j", vec![0.0])
                .with_angles("k", vec![2.0]),
        ];
        let set = ComparisonSet::between(&base, &target);
        assert_eq!(set.labels(), &["r/k"]);
    }

    #[test]
    fn distance_sums_channels() {
        let base = vec![
            RobotFrames::new("r")
                .with_position(PartKey::Base, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]])
                .with_angles("j", vec![0.0, 0.5]),
        ];
        let target = vec![
            RobotFrames::new("r")
                .with_position(PartKey::Base, vec![[0.0, 3.0, 4.0], [1.0, 0.0, 0.0]])
                .with_angles("j", vec![0.25, 0.5]),
        ];
        let set = ComparisonSet::between(&base, &target);
        assert_eq!(set.distance(0.0, 0.0, 0, 0), 5.25);
        assert_eq!(set.distance(1.0, 1.0, 1, 1), 0.0);
        assert!(set.distance(0.0, 0.0, 0, 7).is_infinite());
    }

    #[test]
    fn frame_builds_feature_vectors() {
        let base = vec![arm("r", vec![0.0, 1.0])];
        let target = vec![arm("r", vec![0.5, 1.5])];
        let set = ComparisonSet::between(&base, &target);

        let (b, t) = set.frame(1, 0).unwrap();
        assert_eq!(b.len(), 3);
        assert_eq!(t.len(), 3);
        assert_eq!(b[2], Feature::Angle(1.0));
        assert_eq!(t[2], Feature::Angle(0.5));
        assert!(set.frame(2, 0).is_none());
    }

    #[test]
    fn key_objects_parse_text_form() {
        let joint: KeyObject = "arm\nelbow angle".parse().unwrap();
        assert_eq!(joint, KeyObject::angle("arm", "elbow"));

        let link: KeyObject = "arm\nhand position".parse().unwrap();
        assert_eq!(link, KeyObject::position("arm", PartKey::part("hand")));

        // Anything but `angle` is a position; an empty part is the root.
        let untyped: KeyObject = "arm\nhand".parse().unwrap();
        assert_eq!(untyped.quantity, Quantity::Position);
        let root: KeyObject = "arm\n angle".parse().unwrap();
        assert_eq!(root, KeyObject::position("arm", PartKey::Base));

        assert!(matches!(
            "arm elbow angle".parse::<KeyObject>(),
            Err(Error::InvalidParameter { .. })
        ));
        assert!("\nelbow angle".parse::<KeyObject>().is_err());
    }

    #[test]
    fn key_object_display_parses_back() {
        for key in [
            KeyObject::angle("arm", "elbow"),
            KeyObject::position("arm", PartKey::part("hand")),
            KeyObject::position("arm", PartKey::Base),
        ] {
            assert_eq!(key.to_string().parse::<KeyObject>().unwrap(), key);
        }
        assert_eq!(KeyObject::angle("a", "j").to_string(), "a\nj angle");
    }

    #[test]
    fn keys_select_target_quantities() {
        let base = vec![arm("r", vec![0.0, 1.0]), arm("s", vec![0.0, 1.0])];
        let target = base.clone();

        let keys = [
            KeyObject::position("r", PartKey::Base),
            KeyObject::angle("s", "elbow"),
            KeyObject::angle("s", "hand"),
        ];
        let set = ComparisonSet::between_keys(&base, &target, &keys);
        assert_eq!(set.labels(), &["r", "s/elbow"]);

        let all = ComparisonSet::between_keys(&base, &target, &[]);
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn check_len_reports_short_series() {
        let base = vec![arm("r", vec![0.0, 1.0, 2.0])];
        let target = vec![arm("r", vec![0.0, 1.0])];
        let set = ComparisonSet::between(&base, &target);

        assert!(set.check_len(3).is_err());
        let err = set.check_len(3).unwrap_err();
        assert!(err.to_string().contains("target series `r`"));
        assert!(ComparisonSet::between(&base, &base).check_len(3).is_ok());
    }

    #[test]
    fn unique_by_keeps_order() {
        let items = ["x", "y", "x", "z"];
        let unique = unique_by(&items, |s| *s);
        assert_eq!(unique, vec![&"y", &"z"]);
    }
}
