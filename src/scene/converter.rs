//! Scene Conversion
//!
//! [`SceneConverter::convert`] turns a [`Document`] into a flat, ordered
//! node list with composed local and global matrices plus the resampled
//! animations.
//!
//! # Pipeline
//!
//! 1. Depth-first walk from every root, resolving and composing each model's
//!    transform chain exactly once (cached by id).
//! 2. Every animation stack is converted with plain keys.
//! 3. Animated nodes whose chain needs the pivot path are re-derived once
//!    against their cached chain.
//!
//! The walk uses an explicit stack, so deep hierarchies cannot overflow the
//! call stack.

use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::animation::node_anim::Animation;
use crate::animation::resampler::AnimationResampler;
use crate::document::{Document, Model, NodeId};
use crate::errors::{ConvertError, Result};
use crate::scene::naming::NodeNames;
use crate::settings::{ConvertSettings, TimeBase};
use crate::transform::component::TransformChain;
use crate::transform::pivot::{NodeTransform, compose};
use crate::transform::resolver::resolve_model;

/// One node of the converted hierarchy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputNode {
    pub id: NodeId,
    pub name: String,
    /// Index of the parent in [`ConvertedScene::nodes`].
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Local matrix relative to the parent, without the geometric part.
    pub transform: Mat4,
    /// Applied to this node's own geometry only.
    pub geometric_transform: Mat4,
    /// Parent global times `transform`.
    pub global_transform: Mat4,
}

/// Result of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertedScene {
    /// Nodes in depth-first order; parents always precede their children.
    pub nodes: Vec<OutputNode>,
    /// Indices of the root nodes.
    pub roots: Vec<usize>,
    pub animations: Vec<Animation>,
}

impl ConvertedScene {
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<&OutputNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    #[must_use]
    pub fn node_for(&self, id: NodeId) -> Option<&OutputNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }
}

/// Per-run state shared by the hierarchy walk and the animation passes.
pub struct ConversionContext<'a> {
    doc: &'a Document,
    settings: &'a ConvertSettings,
    names: NodeNames,
    transforms: FxHashMap<NodeId, (TransformChain, NodeTransform)>,
    children: FxHashMap<NodeId, Vec<NodeId>>,
    resampler: AnimationResampler,
}

impl<'a> ConversionContext<'a> {
    #[must_use]
    pub fn new(doc: &'a Document, settings: &'a ConvertSettings) -> Self {
        let frame_rate = settings.frame_rate.unwrap_or(doc.settings.frame_rate);
        let time_base = TimeBase::new(doc.settings.ticks_per_second, frame_rate);

        let mut children: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        for model in doc.models() {
            if let Some(parent) = model.parent {
                children.entry(parent).or_default().push(model.id);
            }
        }

        Self {
            doc,
            settings,
            names: NodeNames::new(),
            transforms: FxHashMap::default(),
            children,
            resampler: AnimationResampler::new(time_base, settings),
        }
    }

    /// Resolved chain and composed transform of `model`, computed on first
    /// request.
    pub fn node_transform(&mut self, model: &Model) -> (TransformChain, NodeTransform) {
        *self.transforms.entry(model.id).or_insert_with(|| {
            let chain = resolve_model(model);
            let transform = compose(&chain);
            if transform.complex {
                log::debug!("'{}' uses the pivot transform chain", model.name);
            }
            (chain, transform)
        })
    }

    /// Emits the hierarchy below every root in document order.
    fn walk_hierarchy(&mut self, scene: &mut ConvertedScene) {
        let doc = self.doc;
        // (node, parent output index, parent global matrix)
        let mut stack: Vec<(NodeId, Option<usize>, Mat4)> = Vec::with_capacity(64);

        for root in doc.roots() {
            if let Some(parent) = root.parent {
                log::warn!(
                    "'{}' has unknown parent {parent}, treating it as a root",
                    root.name
                );
            }
            stack.push((root.id, None, Mat4::IDENTITY));

            while let Some((id, parent, parent_global)) = stack.pop() {
                let Some(model) = doc.model(id) else {
                    continue;
                };
                let (_, transform) = self.node_transform(model);
                let global = parent_global * transform.local;

                let index = scene.nodes.len();
                scene.nodes.push(OutputNode {
                    id,
                    name: self.names.name_for(id, &model.name),
                    parent,
                    children: Vec::new(),
                    transform: transform.local,
                    geometric_transform: transform.geometric,
                    global_transform: global,
                });
                match parent {
                    Some(p) => scene.nodes[p].children.push(index),
                    None => scene.roots.push(index),
                }

                if let Some(children) = self.children.get(&id) {
                    // Reversed so that children pop in document order.
                    stack.extend(children.iter().rev().map(|&c| (c, Some(index), global)));
                }
            }
        }
    }

    /// Re-derives every animated node whose chain needs the pivot path.
    fn resample_pivot_nodes(&mut self) {
        let doc = self.doc;
        for id in self.resampler.animated_nodes() {
            let Some(model) = doc.model(id) else {
                continue;
            };
            let (chain, transform) = self.node_transform(model);
            if transform.complex {
                self.resampler.resample_with_pivots(doc, id, &chain);
            }
        }
    }

    fn run(mut self) -> ConvertedScene {
        let mut scene = ConvertedScene::default();
        self.walk_hierarchy(&mut scene);

        self.resampler.convert_animations(self.doc, &mut self.names);
        if self.settings.resample_pivots {
            self.resample_pivot_nodes();
        }

        scene.animations = self.resampler.into_animations();
        scene
    }
}

/// Entry point of a conversion run.
pub struct SceneConverter;

impl SceneConverter {
    /// Converts `doc` into an output hierarchy with resampled animations.
    ///
    /// Fails only when the parent links of `doc` form a cycle.
    pub fn convert(doc: &Document, settings: &ConvertSettings) -> Result<ConvertedScene> {
        if let Some(node) = doc.find_cycle() {
            return Err(ConvertError::HierarchyCycle(node));
        }

        let scene = ConversionContext::new(doc, settings).run();
        log::info!(
            "Converted {} nodes and {} animations",
            scene.nodes.len(),
            scene.animations.len()
        );
        Ok(scene)
    }
}
