//! Keyframe interpolation
//!
//! Samples every keyframe list at every tick of a unified timeline. Channels
//! without a curve keep the component's static value. Rotation is resolved
//! as three euler scalars per tick and only then converted to a quaternion.

use glam::{Quat, Vec3};

use crate::animation::keyframes::{KeyFrameList, KeyTimeList};
use crate::animation::node_anim::{QuatKey, VectorKey};
use crate::settings::TimeBase;
use crate::transform::rotation::{RotationOrder, euler_to_quat};

/// Running minimum and maximum of emitted key times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for TimeBounds {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl TimeBounds {
    #[inline]
    pub fn include(&mut self, time: f64) {
        self.min = self.min.min(time);
        self.max = self.max.max(time);
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// `max - min`, or zero when nothing was recorded.
    #[must_use]
    pub fn duration(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max - self.min }
    }
}

/// Resolves the 3-vector at `tick` on top of `default`.
#[must_use]
pub fn sample_at(lists: &[KeyFrameList], tick: i64, default: Vec3) -> Vec3 {
    let mut out = default;
    for list in lists {
        let axis = list.channel.index();
        out[axis] = list.blend.apply(out[axis], list.sample(tick));
    }
    out
}

/// Samples one component at every tick of the timeline.
#[must_use]
pub fn sample_component(times: &KeyTimeList, lists: &[KeyFrameList], default: Vec3) -> Vec<Vec3> {
    times.iter().map(|tick| sample_at(lists, tick, default)).collect()
}

/// Converts sampled vectors into timed keys.
pub fn vector_keys(
    times: &KeyTimeList,
    values: &[Vec3],
    time_base: &TimeBase,
    bounds: &mut TimeBounds,
) -> Vec<VectorKey> {
    times
        .iter()
        .zip(values)
        .map(|(tick, &value)| {
            let time = time_base.tick_to_time(tick);
            bounds.include(time);
            VectorKey { time, value }
        })
        .collect()
}

/// Converts sampled euler angles into timed quaternion keys.
///
/// Consecutive quaternions are kept in the same hemisphere so downstream
/// slerp takes the short path.
pub fn quat_keys_from_euler(
    times: &KeyTimeList,
    eulers: &[Vec3],
    order: RotationOrder,
    time_base: &TimeBase,
    bounds: &mut TimeBounds,
) -> Vec<QuatKey> {
    let mut previous: Option<Quat> = None;
    times
        .iter()
        .zip(eulers)
        .map(|(tick, &euler)| {
            let time = time_base.tick_to_time(tick);
            bounds.include(time);
            let value = align_hemisphere(previous, euler_to_quat(euler, order));
            previous = Some(value);
            QuatKey { time, value }
        })
        .collect()
}

/// Flips `q` onto the hemisphere of `previous`.
#[inline]
#[must_use]
pub fn align_hemisphere(previous: Option<Quat>, q: Quat) -> Quat {
    match previous {
        Some(p) if p.dot(q) < 0.0 => -q,
        _ => q,
    }
}

/// Interpolates a vector component over the timeline.
pub fn interpolate_vector_keys(
    times: &KeyTimeList,
    lists: &[KeyFrameList],
    default: Vec3,
    time_base: &TimeBase,
    bounds: &mut TimeBounds,
) -> Vec<VectorKey> {
    let values = sample_component(times, lists, default);
    vector_keys(times, &values, time_base, bounds)
}

/// Interpolates a rotation component (euler degrees) over the timeline and
/// converts each resolved sample to a quaternion.
pub fn interpolate_rotation_keys(
    times: &KeyTimeList,
    lists: &[KeyFrameList],
    default: Vec3,
    order: RotationOrder,
    time_base: &TimeBase,
    bounds: &mut TimeBounds,
) -> Vec<QuatKey> {
    let eulers = sample_component(times, lists, default);
    quat_keys_from_euler(times, &eulers, order, time_base, bounds)
}
