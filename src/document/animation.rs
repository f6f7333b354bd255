use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::document::NodeId;
use crate::transform::component::TransformComponent;

new_key_type! {
    pub struct CurveKey;
    pub struct CurveNodeKey;
    pub struct LayerKey;
}

/// One scalar channel of a 3-vector property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Parses a source channel name (`d|X`, `d|Y`, `d|Z`).
    #[must_use]
    pub fn from_channel_name(name: &str) -> Option<Self> {
        match name {
            "d|X" => Some(Self::X),
            "d|Y" => Some(Self::Y),
            "d|Z" => Some(Self::Z),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// An ordered list of `(tick, value)` pairs for one scalar channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationCurve {
    pub times: Vec<i64>,
    pub values: Vec<f32>,
}

impl AnimationCurve {
    #[must_use]
    pub fn new(times: Vec<i64>, values: Vec<f32>) -> Self {
        Self { times, values }
    }

    /// Builds a curve from `(tick, value)` pairs.
    pub fn from_keys(keys: impl IntoIterator<Item = (i64, f32)>) -> Self {
        let (times, values) = keys.into_iter().unzip();
        Self { times, values }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.is_empty()
    }
}

/// Groups the channel curves that animate one property of one node.
#[derive(Debug, Clone)]
pub struct AnimationCurveNode {
    /// The animated node.
    pub target: NodeId,
    /// Source property name, e.g. `Lcl Translation`.
    pub property: String,
    /// Channel curves. Names that are not `d|X`/`d|Y`/`d|Z` are kept so the
    /// merger can report them.
    pub channels: SmallVec<[(String, CurveKey); 3]>,
}

impl AnimationCurveNode {
    #[must_use]
    pub fn new(target: NodeId, property: impl Into<String>) -> Self {
        Self {
            target,
            property: property.into(),
            channels: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_channel(mut self, axis: Axis, curve: CurveKey) -> Self {
        let name = match axis {
            Axis::X => "d|X",
            Axis::Y => "d|Y",
            Axis::Z => "d|Z",
        };
        self.channels.push((name.to_string(), curve));
        self
    }

    /// The transform component this curve node animates, if it is one of the
    /// animatable local components.
    #[must_use]
    pub fn component(&self) -> Option<TransformComponent> {
        TransformComponent::from_property_name(&self.property).filter(|c| c.is_animatable())
    }
}

/// How a layer combines with the layers beneath it.
///
/// Curves are offsets from the node's static property value unless their
/// layer overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerBlendMode {
    /// Replaces the accumulated value (weighted).
    Override,
    /// Adds to the accumulated value (weighted).
    #[default]
    Additive,
}

/// Blend parameters carried by every keyframe list of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerBlend {
    pub mode: LayerBlendMode,
    /// Contribution weight in `[0, 1]`.
    pub weight: f32,
}

impl Default for LayerBlend {
    fn default() -> Self {
        Self {
            mode: LayerBlendMode::default(),
            weight: 1.0,
        }
    }
}

impl LayerBlend {
    /// Combines a layer sample with the value accumulated so far.
    #[inline]
    #[must_use]
    pub fn apply(self, accumulated: f32, sample: f32) -> f32 {
        match self.mode {
            LayerBlendMode::Override => accumulated + (sample - accumulated) * self.weight,
            LayerBlendMode::Additive => accumulated + sample * self.weight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationLayer {
    pub name: String,
    pub blend: LayerBlend,
    pub curve_nodes: Vec<CurveNodeKey>,
}

impl AnimationLayer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blend: LayerBlend::default(),
            curve_nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_blend(mut self, mode: LayerBlendMode, weight: f32) -> Self {
        self.blend = LayerBlend {
            mode,
            weight: weight.clamp(0.0, 1.0),
        };
        self
    }

    #[must_use]
    pub fn with_curve_node(mut self, node: CurveNodeKey) -> Self {
        self.curve_nodes.push(node);
        self
    }
}

/// A named take: an ordered set of layers plus its local tick range.
#[derive(Debug, Clone)]
pub struct AnimationStack {
    pub name: String,
    pub local_start: i64,
    pub local_stop: i64,
    pub layers: Vec<LayerKey>,
}

impl AnimationStack {
    #[must_use]
    pub fn new(name: impl Into<String>, local_start: i64, local_stop: i64) -> Self {
        Self {
            name: name.into(),
            local_start,
            local_stop,
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: LayerKey) -> Self {
        self.layers.push(layer);
        self
    }

    /// The explicit tick range, or `None` when the stack does not restrict
    /// its keys (both bounds zero, or an inverted range).
    #[must_use]
    pub fn time_range(&self) -> Option<(i64, i64)> {
        if self.local_start == 0 && self.local_stop == 0 {
            return None;
        }
        if self.local_start > self.local_stop {
            log::warn!(
                "Animation stack '{}' has an inverted range [{}, {}], ignoring it",
                self.name,
                self.local_start,
                self.local_stop
            );
            return None;
        }
        Some((self.local_start, self.local_stop))
    }

    /// Display name with the source class prefix removed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.strip_prefix("AnimStack::").unwrap_or(&self.name)
    }
}
