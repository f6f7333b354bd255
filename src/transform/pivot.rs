//! Pivot composition
//!
//! Composes a [`TransformChain`] into matrices. Column vectors are used
//! throughout (`M * v`), so the rightmost factor of a product is applied to
//! a point first:
//!
//! ```text
//! simple:    T · R · S
//! complex:   T · Roff · Rp · Rpre · R · Rpost⁻¹ · Rp⁻¹ · Soff · Sp · S · Sp⁻¹
//! geometric: Tg · Rg · Sg
//! ```
//!
//! Inactive slots contribute identity. The geometric matrix is returned
//! separately because it is baked into the node's own vertices and is never
//! inherited by children.

use glam::Mat4;

use crate::transform::component::{TransformChain, TransformComponent};
use crate::transform::resolver::needs_complex_chain;
use crate::transform::rotation::{RotationOrder, euler_to_mat4};

/// The composed static transform of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    /// Local matrix inherited by children (no geometric part).
    pub local: Mat4,
    /// Geometric matrix applied to the node's own vertices only.
    pub geometric: Mat4,
    /// Whether the complex pivot path produced `local`.
    pub complex: bool,
}

impl NodeTransform {
    /// The matrix a mesh attached to this node is transformed by, relative
    /// to the parent.
    #[must_use]
    pub fn mesh_local(&self) -> Mat4 {
        self.local * self.geometric
    }
}

/// Elementary matrix of one chain slot; identity when the slot is not active.
#[must_use]
pub fn component_matrix(chain: &TransformChain, component: TransformComponent) -> Mat4 {
    let entry = chain[component];
    if !entry.is_active() {
        return Mat4::IDENTITY;
    }
    let v = entry.value;
    match component {
        TransformComponent::Translation
        | TransformComponent::RotationOffset
        | TransformComponent::RotationPivot
        | TransformComponent::ScalingOffset
        | TransformComponent::ScalingPivot
        | TransformComponent::GeometricTranslation => Mat4::from_translation(v),
        TransformComponent::Rotation => euler_to_mat4(v, chain.rotation_order),
        // Only the animated rotation follows the node's order.
        TransformComponent::PreRotation
        | TransformComponent::PostRotation
        | TransformComponent::GeometricRotation => euler_to_mat4(v, RotationOrder::XYZ),
        TransformComponent::Scaling | TransformComponent::GeometricScaling => Mat4::from_scale(v),
    }
}

/// Composes the full node transform, choosing the simple path when the chain
/// allows it.
#[must_use]
pub fn compose(chain: &TransformChain) -> NodeTransform {
    let complex = needs_complex_chain(chain);
    let local = if complex {
        compose_complex(chain)
    } else {
        compose_simple(chain)
    };
    NodeTransform {
        local,
        geometric: compose_geometric(chain),
        complex,
    }
}

/// `T · R · S`.
#[must_use]
pub fn compose_simple(chain: &TransformChain) -> Mat4 {
    use TransformComponent as C;
    component_matrix(chain, C::Translation)
        * component_matrix(chain, C::Rotation)
        * component_matrix(chain, C::Scaling)
}

/// The eleven-factor pivot chain.
#[must_use]
pub fn compose_complex(chain: &TransformChain) -> Mat4 {
    use TransformComponent as C;
    let m = |c| component_matrix(chain, c);

    let rotation_pivot = m(C::RotationPivot);
    let scaling_pivot = m(C::ScalingPivot);
    // Rotation matrices are orthonormal, translations invert by negation.
    let post_rotation_inv = m(C::PostRotation).transpose();
    let rotation_pivot_inv = invert_translation(rotation_pivot);
    let scaling_pivot_inv = invert_translation(scaling_pivot);

    m(C::Translation)
        * m(C::RotationOffset)
        * rotation_pivot
        * m(C::PreRotation)
        * m(C::Rotation)
        * post_rotation_inv
        * rotation_pivot_inv
        * m(C::ScalingOffset)
        * scaling_pivot
        * m(C::Scaling)
        * scaling_pivot_inv
}

/// `Tg · Rg · Sg`.
#[must_use]
pub fn compose_geometric(chain: &TransformChain) -> Mat4 {
    use TransformComponent as C;
    component_matrix(chain, C::GeometricTranslation)
        * component_matrix(chain, C::GeometricRotation)
        * component_matrix(chain, C::GeometricScaling)
}

fn invert_translation(m: Mat4) -> Mat4 {
    Mat4::from_translation(-m.w_axis.truncate())
}
