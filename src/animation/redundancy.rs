//! Redundant track detection
//!
//! A component whose every sample equals the node's static value carries no
//! information: dropping it leaves the evaluated pose unchanged at every
//! time.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::animation::node_anim::{AnimatedChannels, SrtKeys};
use crate::animation::reorder::TrsSamples;
use crate::transform::component::{TransformChain, TransformComponent};

/// Returns `true` if every sample lies within `epsilon` (squared distance)
/// of `static_value`.
#[must_use]
pub fn is_redundant(samples: &[Vec3], static_value: Vec3, epsilon: f32) -> bool {
    samples
        .iter()
        .all(|s| (*s - static_value).length_squared() < epsilon)
}

/// Returns `true` if every rotation lies within `epsilon` of `static_value`,
/// treating `q` and `-q` as the same rotation.
#[must_use]
pub fn is_rotation_redundant(samples: &[Quat], static_value: Quat, epsilon: f32) -> bool {
    let rest = Vec4::from(static_value);
    samples.iter().all(|q| {
        let q = Vec4::from(*q);
        (q - rest).length_squared().min((q + rest).length_squared()) < epsilon
    })
}

/// Returns the components of `candidates` that differ from the static chain
/// somewhere on the timeline.
#[must_use]
pub fn informative_channels(
    samples: &TrsSamples,
    chain: &TransformChain,
    candidates: AnimatedChannels,
    epsilon: f32,
) -> AnimatedChannels {
    let mut out = AnimatedChannels::empty();
    for (flag, component, values) in [
        (AnimatedChannels::TRANSLATION, TransformComponent::Translation, &samples.translation),
        (AnimatedChannels::ROTATION, TransformComponent::Rotation, &samples.rotation),
        (AnimatedChannels::SCALING, TransformComponent::Scaling, &samples.scaling),
    ] {
        if !candidates.contains(flag) {
            continue;
        }
        if is_redundant(values, chain.value(component), epsilon) {
            log::debug!("Dropping redundant {} track", component.name());
        } else {
            out |= flag;
        }
    }
    out
}

/// Returns the components of composed `keys` that differ from the
/// decomposition of the static local matrix `rest`.
///
/// Pivot-composed keys move components the curves never touched, e.g. a
/// rotation about a pivot shows up in the translation keys.
#[must_use]
pub fn informative_keys(keys: &SrtKeys, rest: Mat4, epsilon: f32) -> AnimatedChannels {
    let (scale, rotation, translation) = rest.to_scale_rotation_translation();
    let mut out = AnimatedChannels::empty();

    let values: Vec<Vec3> = keys.translation.iter().map(|k| k.value).collect();
    out.set(AnimatedChannels::TRANSLATION, !is_redundant(&values, translation, epsilon));
    let values: Vec<Quat> = keys.rotation.iter().map(|k| k.value).collect();
    out.set(AnimatedChannels::ROTATION, !is_rotation_redundant(&values, rotation.normalize(), epsilon));
    let values: Vec<Vec3> = keys.scaling.iter().map(|k| k.value).collect();
    out.set(AnimatedChannels::SCALING, !is_redundant(&values, scale, epsilon));
    out
}
