//! TRS → SRT reordering
//!
//! Turns per-tick translation / euler rotation / scaling samples into the
//! scale, quaternion and translation keys consumed by playback.
//!
//! Without pivot data the samples map straight onto keys. With pivot data
//! the samples are substituted into the Translation, Rotation and Scaling
//! slots of the node's chain, the chain is composed exactly like the static
//! transform, and the result is decomposed back into S, R and T.

use glam::Vec3;

use crate::animation::interpolate::{
    TimeBounds, align_hemisphere, quat_keys_from_euler, sample_component, vector_keys,
};
use crate::animation::keyframes::{KeyFrameList, KeyTimeList};
use crate::animation::node_anim::SrtKeys;
use crate::settings::TimeBase;
use crate::transform::component::{TransformChain, TransformComponent};
use crate::transform::pivot;

/// Component samples on a shared timeline; rotation is in euler degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrsSamples {
    pub translation: Vec<Vec3>,
    pub rotation: Vec<Vec3>,
    pub scaling: Vec<Vec3>,
}

impl TrsSamples {
    /// Samples the three components, falling back to the chain's static
    /// values for channels without curves.
    #[must_use]
    pub fn sample(
        times: &KeyTimeList,
        translation: &[KeyFrameList],
        rotation: &[KeyFrameList],
        scaling: &[KeyFrameList],
        chain: &TransformChain,
    ) -> Self {
        Self {
            translation: sample_component(times, translation, chain.value(TransformComponent::Translation)),
            rotation: sample_component(times, rotation, chain.value(TransformComponent::Rotation)),
            scaling: sample_component(times, scaling, chain.value(TransformComponent::Scaling)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.translation.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translation.is_empty()
    }
}

/// Converts sampled TRS values into SRT keys.
///
/// `chain` supplies the rotation order. When `with_pivots` is set, the
/// chain's pivot slots are applied as well.
pub fn convert_trs_to_srt(
    times: &KeyTimeList,
    samples: &TrsSamples,
    chain: &TransformChain,
    with_pivots: bool,
    time_base: &TimeBase,
    bounds: &mut TimeBounds,
) -> SrtKeys {
    if !with_pivots {
        return SrtKeys {
            scaling: vector_keys(times, &samples.scaling, time_base, bounds),
            rotation: quat_keys_from_euler(times, &samples.rotation, chain.rotation_order, time_base, bounds),
            translation: vector_keys(times, &samples.translation, time_base, bounds),
        };
    }

    let mut keys = SrtKeys::with_capacity(times.len());
    let mut previous = None;
    let mut evaluated = *chain;

    for (i, tick) in times.iter().enumerate() {
        evaluated.set_active(TransformComponent::Translation, samples.translation[i]);
        evaluated.set_active(TransformComponent::Rotation, samples.rotation[i]);
        evaluated.set_active(TransformComponent::Scaling, samples.scaling[i]);

        let local = pivot::compose(&evaluated).local;
        let (scale, rotation, translation) = local.to_scale_rotation_translation();
        let rotation = align_hemisphere(previous, rotation.normalize());
        previous = Some(rotation);

        let time = time_base.tick_to_time(tick);
        bounds.include(time);
        keys.push(time, scale, rotation, translation);
    }

    keys
}
