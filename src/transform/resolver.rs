//! Transform component resolution
//!
//! Reads the twelve transform properties of a node into a
//! [`TransformChain`]. A slot is `Active` only when its property is present
//! and differs from the component default; every other slot keeps its
//! default value with `Reference` status, so composition can walk all twelve
//! slots uniformly.

use glam::Vec3;

use crate::document::{Model, PropertyTable};
use crate::transform::component::{ChainEntry, TransformChain, TransformComponent};
use crate::transform::rotation::RotationOrder;

/// Squared distance under which a property equals its default.
pub const ZERO_EPSILON: f32 = 1e-6;

fn differs_from_default(component: TransformComponent, value: Vec3) -> bool {
    (value - component.default_value()).length_squared() > ZERO_EPSILON
}

/// Resolves the component chain of a model.
#[must_use]
pub fn resolve_model(model: &Model) -> TransformChain {
    resolve_chain(&model.props, model.rotation_order())
}

/// Resolves the component chain from a raw property table.
#[must_use]
pub fn resolve_chain(props: &PropertyTable, rotation_order: RotationOrder) -> TransformChain {
    let mut chain = TransformChain::default();
    chain.rotation_order = rotation_order;

    for component in TransformComponent::ALL {
        let Some(value) = props.get_vec3(component.property_name()) else {
            continue;
        };
        if !value.is_finite() {
            log::warn!(
                "Ignoring non-finite {} property: {value:?}",
                component.property_name()
            );
            continue;
        }
        chain[component] = if differs_from_default(component, value) {
            ChainEntry::active(value)
        } else {
            ChainEntry::reference(value)
        };
    }

    chain
}

/// Returns `true` if the node needs more than plain T·R·S to evaluate: any
/// offset, pivot, pre- or post-rotation slot is active, or the rotation order
/// is not the default one.
#[must_use]
pub fn needs_complex_chain(chain: &TransformChain) -> bool {
    !chain.rotation_order.is_default()
        || TransformComponent::PIVOTS
            .into_iter()
            .any(|c| chain.is_active(c))
}

/// Returns `true` if any geometric slot is active.
#[must_use]
pub fn has_geometric_transform(chain: &TransformChain) -> bool {
    TransformComponent::ALL
        .into_iter()
        .filter(|c| c.is_geometric())
        .any(|c| chain.is_active(c))
}
