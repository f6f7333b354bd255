//! Parsed Input Document
//!
//! The already-parsed scene the converter consumes:
//! - [`Model`]: a scene node with its property table and parent link
//! - [`PropertyTable`]: typed properties with template fallback
//! - Animation arena: curves, curve nodes, layers and stacks, addressed by
//!   `slotmap` keys so that no curve data is shared by pointer
//!
//! Parsing the source file format is not part of this crate; a parser (or a
//! test) fills a [`Document`] through its `add_*` methods.

pub mod animation;
pub mod properties;

use std::fmt;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

pub use animation::{
    AnimationCurve, AnimationCurveNode, AnimationLayer, AnimationStack, Axis, CurveKey,
    CurveNodeKey, LayerBlend, LayerBlendMode, LayerKey,
};
pub use properties::{PropertyTable, PropertyValue};

use crate::errors::{ConvertError, Result};
use crate::settings::{FBX_TICKS_PER_SECOND, FrameRate};
use crate::transform::rotation::RotationOrder;

/// Stable object id assigned by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A scene node of the source document.
#[derive(Debug, Clone)]
pub struct Model {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub props: PropertyTable,
}

impl Model {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: NodeId(id),
            name: name.into(),
            parent: None,
            props: PropertyTable::new(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent = Some(NodeId(parent));
        self
    }

    #[must_use]
    pub fn with_props(mut self, props: PropertyTable) -> Self {
        self.props = props;
        self
    }

    /// Rotation order read from the `RotationOrder` property.
    #[must_use]
    pub fn rotation_order(&self) -> RotationOrder {
        self.props
            .get_int("RotationOrder")
            .map_or(RotationOrder::default(), RotationOrder::from_raw)
    }
}

/// Document-wide time settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalSettings {
    pub frame_rate: FrameRate,
    pub ticks_per_second: i64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default(),
            ticks_per_second: FBX_TICKS_PER_SECOND,
        }
    }
}

/// The parsed document: models in parse order plus the animation arena.
#[derive(Debug, Default)]
pub struct Document {
    pub settings: GlobalSettings,
    models: Vec<Model>,
    model_index: FxHashMap<NodeId, usize>,
    curves: SlotMap<CurveKey, AnimationCurve>,
    curve_nodes: SlotMap<CurveNodeKey, AnimationCurveNode>,
    layers: SlotMap<LayerKey, AnimationLayer>,
    stacks: Vec<AnimationStack>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: GlobalSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ========================================================================
    // Models
    // ========================================================================

    pub fn add_model(&mut self, model: Model) -> Result<NodeId> {
        let id = model.id;
        if self.model_index.contains_key(&id) {
            return Err(ConvertError::DuplicateNode(id));
        }
        self.model_index.insert(id, self.models.len());
        self.models.push(model);
        Ok(id)
    }

    #[must_use]
    pub fn model(&self, id: NodeId) -> Option<&Model> {
        self.model_index.get(&id).map(|&i| &self.models[i])
    }

    pub fn try_model(&self, id: NodeId) -> Result<&Model> {
        self.model(id).ok_or(ConvertError::UnknownNode(id))
    }

    /// All models in parse order.
    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Children of `id` in parse order.
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &Model> + '_ {
        self.models.iter().filter(move |m| m.parent == Some(id))
    }

    /// Models with no parent, or whose parent is not part of the document.
    pub fn roots(&self) -> impl Iterator<Item = &Model> + '_ {
        self.models
            .iter()
            .filter(|m| m.parent.is_none_or(|p| !self.model_index.contains_key(&p)))
    }

    /// Strict structural check: every parent exists and parent links are
    /// acyclic.
    pub fn validate(&self) -> Result<()> {
        for model in &self.models {
            if let Some(parent) = model.parent
                && !self.model_index.contains_key(&parent)
            {
                return Err(ConvertError::UnknownParent {
                    node: model.id,
                    parent,
                });
            }
        }
        if let Some(node) = self.find_cycle() {
            return Err(ConvertError::HierarchyCycle(node));
        }
        Ok(())
    }

    /// First model (in parse order) whose ancestor chain loops back on
    /// itself. Unknown parents end a chain.
    #[must_use]
    pub fn find_cycle(&self) -> Option<NodeId> {
        self.models.iter().map(|m| m.id).find(|&start| {
            let mut current = self.model(start).and_then(|m| m.parent);
            let mut steps = 0;
            while let Some(id) = current {
                if id == start || steps > self.models.len() {
                    return true;
                }
                current = self.model(id).and_then(|m| m.parent);
                steps += 1;
            }
            false
        })
    }

    // ========================================================================
    // Animation arena
    // ========================================================================

    pub fn add_curve(&mut self, curve: AnimationCurve) -> CurveKey {
        self.curves.insert(curve)
    }

    pub fn add_curve_node(&mut self, node: AnimationCurveNode) -> CurveNodeKey {
        self.curve_nodes.insert(node)
    }

    pub fn add_layer(&mut self, layer: AnimationLayer) -> LayerKey {
        self.layers.insert(layer)
    }

    /// Appends a stack and returns its index.
    pub fn add_stack(&mut self, stack: AnimationStack) -> usize {
        self.stacks.push(stack);
        self.stacks.len() - 1
    }

    #[must_use]
    pub fn curve(&self, key: CurveKey) -> Option<&AnimationCurve> {
        self.curves.get(key)
    }

    #[must_use]
    pub fn curve_node(&self, key: CurveNodeKey) -> Option<&AnimationCurveNode> {
        self.curve_nodes.get(key)
    }

    #[must_use]
    pub fn layer(&self, key: LayerKey) -> Option<&AnimationLayer> {
        self.layers.get(key)
    }

    #[must_use]
    pub fn stacks(&self) -> &[AnimationStack] {
        &self.stacks
    }

    #[must_use]
    pub fn stack(&self, index: usize) -> Option<&AnimationStack> {
        self.stacks.get(index)
    }
}
