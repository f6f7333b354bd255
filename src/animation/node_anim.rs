use bitflags::bitflags;
use glam::{Quat, Vec3};

use crate::document::NodeId;

bitflags! {
    /// Components of a [`NodeAnim`] that carry information beyond the
    /// node's static pose.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AnimatedChannels: u8 {
        const TRANSLATION = 1 << 0;
        const ROTATION    = 1 << 1;
        const SCALING     = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VectorKey {
    pub time: f64,
    pub value: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuatKey {
    pub time: f64,
    pub value: Quat,
}

/// Scale / rotation / translation keys on one shared timeline.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SrtKeys {
    pub scaling: Vec<VectorKey>,
    pub rotation: Vec<QuatKey>,
    pub translation: Vec<VectorKey>,
}

impl SrtKeys {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scaling: Vec::with_capacity(capacity),
            rotation: Vec::with_capacity(capacity),
            translation: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, time: f64, scaling: Vec3, rotation: Quat, translation: Vec3) {
        self.scaling.push(VectorKey { time, value: scaling });
        self.rotation.push(QuatKey { time, value: rotation });
        self.translation.push(VectorKey { time, value: translation });
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.translation.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translation.is_empty()
    }

    /// Shifts every key by `-offset`.
    pub fn shift_times(&mut self, offset: f64) {
        if offset == 0.0 {
            return;
        }
        self.scaling.iter_mut().for_each(|k| k.time -= offset);
        self.rotation.iter_mut().for_each(|k| k.time -= offset);
        self.translation.iter_mut().for_each(|k| k.time -= offset);
    }

    /// Returns `true` if all three arrays have the same length and times.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.scaling.len() == self.translation.len()
            && self.rotation.len() == self.translation.len()
            && self
                .translation
                .iter()
                .zip(&self.scaling)
                .zip(&self.rotation)
                .all(|((t, s), r)| t.time == s.time && t.time == r.time)
    }
}

/// The animation channel of one node within one [`Animation`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeAnim {
    /// Output name of the animated node.
    pub node_name: String,
    pub target: NodeId,
    pub channels: AnimatedChannels,
    pub keys: SrtKeys,
}

impl NodeAnim {
    #[inline]
    #[must_use]
    pub fn scaling_keys(&self) -> &[VectorKey] {
        &self.keys.scaling
    }

    #[inline]
    #[must_use]
    pub fn rotation_keys(&self) -> &[QuatKey] {
        &self.keys.rotation
    }

    #[inline]
    #[must_use]
    pub fn position_keys(&self) -> &[VectorKey] {
        &self.keys.translation
    }
}

/// One converted animation stack.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    pub name: String,
    /// Output key time units per second.
    pub ticks_per_second: f64,
    /// Start of the animation in output time, before rebasing.
    pub start: f64,
    /// End of the animation in output time, before rebasing.
    pub stop: f64,
    pub duration: f64,
    pub channels: Vec<NodeAnim>,
    /// Offset already subtracted from every key time.
    pub(crate) time_offset: f64,
}

impl Animation {
    #[must_use]
    pub fn channel(&self, node_name: &str) -> Option<&NodeAnim> {
        self.channels.iter().find(|c| c.node_name == node_name)
    }

    #[must_use]
    pub fn channel_for(&self, target: NodeId) -> Option<&NodeAnim> {
        self.channels.iter().find(|c| c.target == target)
    }
}
