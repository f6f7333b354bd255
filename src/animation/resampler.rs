//! Animation stack conversion and pivot resampling
//!
//! [`AnimationResampler`] converts every stack of a document into an
//! [`Animation`], one [`NodeAnim`] per animated node, and remembers which
//! node each channel targets. A later [`AnimationResampler::resample_with_pivots`]
//! call re-derives all channels of one node from the source curves against a
//! supplied pivot chain. Each node is re-derived at most once per run.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::animation::interpolate::TimeBounds;
use crate::animation::keyframes::{CurveNodeRef, get_key_time_list, get_keyframe_list};
use crate::animation::node_anim::{AnimatedChannels, Animation, NodeAnim, SrtKeys};
use crate::animation::redundancy::{informative_channels, informative_keys};
use crate::animation::reorder::{TrsSamples, convert_trs_to_srt};
use crate::document::{AnimationStack, Document, Model, NodeId};
use crate::scene::naming::NodeNames;
use crate::settings::{ConvertSettings, TimeBase};
use crate::transform::component::{TransformChain, TransformComponent};
use crate::transform::pivot;
use crate::transform::resolver::resolve_model;

/// Where the channel of one animated node lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimTarget {
    /// Index into [`AnimationResampler::animations`].
    pub animation: usize,
    /// Index into [`Animation::channels`].
    pub channel: usize,
    /// Index of the source stack in the document.
    pub stack: usize,
    pub node: NodeId,
}

/// Curve nodes of one target, split by animated component.
#[derive(Debug, Clone, Default)]
pub struct TargetCurves {
    pub translation: SmallVec<[CurveNodeRef; 2]>,
    pub rotation: SmallVec<[CurveNodeRef; 2]>,
    pub scaling: SmallVec<[CurveNodeRef; 2]>,
}

impl TargetCurves {
    fn push(&mut self, component: TransformComponent, node: CurveNodeRef) {
        match component {
            TransformComponent::Translation => self.translation.push(node),
            TransformComponent::Rotation => self.rotation.push(node),
            TransformComponent::Scaling => self.scaling.push(node),
            _ => {}
        }
    }
}

/// Groups the curve nodes of a stack by target node, in first-seen order.
#[must_use]
pub fn collect_target_curves(doc: &Document, stack: &AnimationStack) -> Vec<(NodeId, TargetCurves)> {
    let mut groups: Vec<(NodeId, TargetCurves)> = Vec::new();
    let mut index: FxHashMap<NodeId, usize> = FxHashMap::default();

    for &layer_key in &stack.layers {
        let Some(layer) = doc.layer(layer_key) else {
            log::warn!("Stack '{}' refers to a missing layer", stack.name);
            continue;
        };
        for &node_key in &layer.curve_nodes {
            let Some(node) = doc.curve_node(node_key) else {
                log::warn!("Layer '{}' refers to a missing curve node", layer.name);
                continue;
            };
            let Some(component) = node.component() else {
                log::warn!(
                    "Ignoring '{}' curves on {}: only translation, rotation and scaling can be animated",
                    node.property,
                    node.target
                );
                continue;
            };
            let slot = *index.entry(node.target).or_insert_with(|| {
                groups.push((node.target, TargetCurves::default()));
                groups.len() - 1
            });
            groups[slot].1.push(
                component,
                CurveNodeRef {
                    key: node_key,
                    blend: layer.blend,
                },
            );
        }
    }

    groups
}

/// Drives stack conversion and pivot re-derivation for one conversion run.
#[derive(Debug)]
pub struct AnimationResampler {
    time_base: TimeBase,
    remove_redundant: bool,
    redundancy_epsilon: f32,
    rebase_key_times: bool,
    animations: Vec<Animation>,
    targets: Vec<AnimTarget>,
    resampled: FxHashSet<NodeId>,
}

impl AnimationResampler {
    #[must_use]
    pub fn new(time_base: TimeBase, settings: &ConvertSettings) -> Self {
        Self {
            time_base,
            remove_redundant: settings.remove_redundant_tracks,
            redundancy_epsilon: settings.redundancy_epsilon,
            rebase_key_times: settings.rebase_key_times,
            animations: Vec::new(),
            targets: Vec::new(),
            resampled: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn time_base(&self) -> &TimeBase {
        &self.time_base
    }

    #[must_use]
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    #[must_use]
    pub fn into_animations(self) -> Vec<Animation> {
        self.animations
    }

    #[must_use]
    pub fn targets(&self) -> &[AnimTarget] {
        &self.targets
    }

    /// Animated node ids in first-seen order, without duplicates.
    #[must_use]
    pub fn animated_nodes(&self) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        self.targets
            .iter()
            .filter(|t| seen.insert(t.node))
            .map(|t| t.node)
            .collect()
    }

    /// Returns `true` once `node` went through [`Self::resample_with_pivots`].
    #[must_use]
    pub fn is_resampled(&self, node: NodeId) -> bool {
        self.resampled.contains(&node)
    }

    /// Converts every stack of the document in order.
    pub fn convert_animations(&mut self, doc: &Document, names: &mut NodeNames) {
        for stack_index in 0..doc.stacks().len() {
            self.convert_animation_stack(doc, stack_index, names);
        }
    }

    /// Converts one stack. Returns the index of the new animation, or `None`
    /// when the stack animates nothing.
    pub fn convert_animation_stack(
        &mut self,
        doc: &Document,
        stack_index: usize,
        names: &mut NodeNames,
    ) -> Option<usize> {
        let stack = doc.stack(stack_index)?;
        let range = stack.time_range();
        let mut bounds = TimeBounds::default();
        let mut channels = Vec::new();

        for (target, curves) in collect_target_curves(doc, stack) {
            let Some(model) = doc.model(target) else {
                log::warn!("Animation target {target} is not part of the document");
                continue;
            };
            let Some((keys, animated)) = self.derive_keys(doc, model, &curves, range, None, &mut bounds)
            else {
                continue;
            };
            channels.push(NodeAnim {
                node_name: names.name_for(target, &model.name),
                target,
                channels: animated,
                keys,
            });
        }

        if channels.is_empty() {
            log::info!("Animation stack '{}' animates nothing, skipping", stack.display_name());
            return None;
        }

        let (start, stop) = match range {
            Some((start, stop)) => (
                self.time_base.tick_to_time(start),
                self.time_base.tick_to_time(stop),
            ),
            None => (bounds.min, bounds.max),
        };
        let time_offset = if self.rebase_key_times { start } else { 0.0 };
        for channel in &mut channels {
            channel.keys.shift_times(time_offset);
        }

        let animation = self.animations.len();
        self.targets
            .extend(channels.iter().enumerate().map(|(channel, anim)| AnimTarget {
                animation,
                channel,
                stack: stack_index,
                node: anim.target,
            }));

        log::info!(
            "Converted animation '{}': {} channels, {:.3} frames",
            stack.display_name(),
            channels.len(),
            stop - start
        );

        self.animations.push(Animation {
            name: stack.display_name().to_owned(),
            ticks_per_second: self.time_base.frames_per_second,
            start,
            stop,
            duration: stop - start,
            channels,
            time_offset,
        });
        Some(animation)
    }

    /// Re-derives every channel targeting `node` from the source curves,
    /// substituting the animated values into `pivots`.
    ///
    /// Every existing channel of the node is replaced, even when the composed
    /// keys match the static pose; the channel flags are then empty. A node
    /// is re-derived at most once per run; later calls return 0 without
    /// touching the channels. Returns the number of channels that were
    /// replaced.
    pub fn resample_with_pivots(
        &mut self,
        doc: &Document,
        node: NodeId,
        pivots: &TransformChain,
    ) -> usize {
        if !self.resampled.insert(node) {
            log::debug!("{node} was already resampled, skipping");
            return 0;
        }
        let Some(model) = doc.model(node) else {
            log::warn!("Cannot resample unknown node {node}");
            return 0;
        };

        let mut replaced = 0;
        for i in 0..self.targets.len() {
            let target = self.targets[i];
            if target.node != node {
                continue;
            }
            let Some(stack) = doc.stack(target.stack) else {
                continue;
            };
            let Some(curves) = collect_target_curves(doc, stack)
                .into_iter()
                .find_map(|(id, curves)| (id == node).then_some(curves))
            else {
                continue;
            };

            let mut bounds = TimeBounds::default();
            let Some((mut keys, animated)) =
                self.derive_keys(doc, model, &curves, stack.time_range(), Some(pivots), &mut bounds)
            else {
                log::warn!("{node} has no usable curves left in stack '{}'", stack.display_name());
                continue;
            };

            let animation = &mut self.animations[target.animation];
            keys.shift_times(animation.time_offset);
            let channel = &mut animation.channels[target.channel];
            channel.keys = keys;
            channel.channels = animated;
            replaced += 1;
        }

        log::debug!("Resampled {replaced} channels of {node} with pivots");
        replaced
    }

    /// Merges, samples, filters and reorders the curves of one node.
    ///
    /// Returns `None` when the node has no usable curves, or when every
    /// animated component is redundant and no pivot chain is given. With a
    /// pivot chain, the flags describe the composed keys and may be empty.
    fn derive_keys(
        &self,
        doc: &Document,
        model: &Model,
        curves: &TargetCurves,
        range: Option<(i64, i64)>,
        pivots: Option<&TransformChain>,
        bounds: &mut TimeBounds,
    ) -> Option<(SrtKeys, AnimatedChannels)> {
        let chain = pivots.copied().unwrap_or_else(|| resolve_model(model));

        let mut translation = get_keyframe_list(doc, &curves.translation, range, TransformComponent::Translation);
        let mut rotation = get_keyframe_list(doc, &curves.rotation, range, TransformComponent::Rotation);
        let mut scaling = get_keyframe_list(doc, &curves.scaling, range, TransformComponent::Scaling);

        let mut candidates = AnimatedChannels::empty();
        candidates.set(AnimatedChannels::TRANSLATION, !translation.is_empty());
        candidates.set(AnimatedChannels::ROTATION, !rotation.is_empty());
        candidates.set(AnimatedChannels::SCALING, !scaling.is_empty());
        if candidates.is_empty() {
            return None;
        }

        let mut times = get_key_time_list(translation.iter().chain(&rotation).chain(&scaling));
        let mut samples = TrsSamples::sample(&times, &translation, &rotation, &scaling, &chain);

        let informative = if self.remove_redundant {
            informative_channels(&samples, &chain, candidates, self.redundancy_epsilon)
        } else {
            candidates
        };
        if informative.is_empty() && pivots.is_none() {
            log::debug!("All tracks of '{}' are redundant", model.name);
            return None;
        }

        if !informative.is_empty() && informative != candidates {
            // Redundant components must not contribute ticks to the timeline.
            if !informative.contains(AnimatedChannels::TRANSLATION) {
                translation.clear();
            }
            if !informative.contains(AnimatedChannels::ROTATION) {
                rotation.clear();
            }
            if !informative.contains(AnimatedChannels::SCALING) {
                scaling.clear();
            }
            times = get_key_time_list(translation.iter().chain(&rotation).chain(&scaling));
            samples = TrsSamples::sample(&times, &translation, &rotation, &scaling, &chain);
        }

        let keys = convert_trs_to_srt(&times, &samples, &chain, pivots.is_some(), &self.time_base, bounds);
        let animated = match pivots {
            None => informative,
            Some(pivots) if self.remove_redundant => {
                informative_keys(&keys, pivot::compose(pivots).local, self.redundancy_epsilon)
            }
            Some(_) => AnimatedChannels::all(),
        };
        Some((keys, animated))
    }
}
