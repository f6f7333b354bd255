use std::ops::{Index, IndexMut};

use glam::Vec3;

use crate::errors::{ConvertError, Result};
use crate::transform::rotation::RotationOrder;

/// The parts that make up the local transformation of a source node.
///
/// The discriminant is the slot index in a [`TransformChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransformComponent {
    Translation,
    Scaling,
    Rotation,
    RotationOffset,
    RotationPivot,
    PreRotation,
    PostRotation,
    ScalingOffset,
    ScalingPivot,
    GeometricTranslation,
    GeometricRotation,
    GeometricScaling,
}

impl TransformComponent {
    pub const COUNT: usize = 12;

    pub const ALL: [TransformComponent; Self::COUNT] = [
        Self::Translation,
        Self::Scaling,
        Self::Rotation,
        Self::RotationOffset,
        Self::RotationPivot,
        Self::PreRotation,
        Self::PostRotation,
        Self::ScalingOffset,
        Self::ScalingPivot,
        Self::GeometricTranslation,
        Self::GeometricRotation,
        Self::GeometricScaling,
    ];

    /// Components whose presence forces the full pivot chain.
    pub const PIVOTS: [TransformComponent; 6] = [
        Self::RotationOffset,
        Self::RotationPivot,
        Self::PreRotation,
        Self::PostRotation,
        Self::ScalingOffset,
        Self::ScalingPivot,
    ];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Translation => "Translation",
            Self::Scaling => "Scaling",
            Self::Rotation => "Rotation",
            Self::RotationOffset => "RotationOffset",
            Self::RotationPivot => "RotationPivot",
            Self::PreRotation => "PreRotation",
            Self::PostRotation => "PostRotation",
            Self::ScalingOffset => "ScalingOffset",
            Self::ScalingPivot => "ScalingPivot",
            Self::GeometricTranslation => "GeometricTranslation",
            Self::GeometricRotation => "GeometricRotation",
            Self::GeometricScaling => "GeometricScaling",
        }
    }

    /// Name of the source property that stores this component.
    #[must_use]
    pub fn property_name(self) -> &'static str {
        match self {
            Self::Translation => "Lcl Translation",
            Self::Scaling => "Lcl Scaling",
            Self::Rotation => "Lcl Rotation",
            other => other.name(),
        }
    }

    #[must_use]
    pub fn from_property_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.property_name() == name)
    }

    /// Value of the component when the source does not define it.
    #[must_use]
    pub fn default_value(self) -> Vec3 {
        match self {
            Self::Scaling | Self::GeometricScaling => Vec3::ONE,
            _ => Vec3::ZERO,
        }
    }

    /// Only the local translation, rotation and scaling can carry curves.
    #[must_use]
    pub fn is_animatable(self) -> bool {
        matches!(self, Self::Translation | Self::Rotation | Self::Scaling)
    }

    #[must_use]
    pub fn is_geometric(self) -> bool {
        matches!(
            self,
            Self::GeometricTranslation | Self::GeometricRotation | Self::GeometricScaling
        )
    }
}

/// Whether a chain entry takes part in matrix composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PivotStatus {
    /// The value differs from the default and is composed.
    Active,
    /// The value exists (or was defaulted) but contributes identity.
    #[default]
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainEntry {
    pub value: Vec3,
    pub status: PivotStatus,
}

impl ChainEntry {
    #[must_use]
    pub fn active(value: Vec3) -> Self {
        Self {
            value,
            status: PivotStatus::Active,
        }
    }

    #[must_use]
    pub fn reference(value: Vec3) -> Self {
        Self {
            value,
            status: PivotStatus::Reference,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PivotStatus::Active
    }
}

/// The fixed 12-slot component chain of one node, indexed by
/// [`TransformComponent`], together with the node's rotation order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformChain {
    entries: [ChainEntry; TransformComponent::COUNT],
    pub rotation_order: RotationOrder,
}

impl Default for TransformChain {
    /// Every slot at its default value with `Reference` status.
    fn default() -> Self {
        Self {
            entries: TransformComponent::ALL.map(|c| ChainEntry::reference(c.default_value())),
            rotation_order: RotationOrder::default(),
        }
    }
}

impl TransformChain {
    /// Builds a chain from exactly twelve entries in component order.
    pub fn from_entries(entries: &[ChainEntry], rotation_order: RotationOrder) -> Result<Self> {
        let entries: [ChainEntry; TransformComponent::COUNT] = entries
            .try_into()
            .map_err(|_| ConvertError::MalformedChain { len: entries.len() })?;
        Ok(Self {
            entries,
            rotation_order,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[ChainEntry; TransformComponent::COUNT] {
        &self.entries
    }

    /// Value of a component regardless of its status.
    #[inline]
    #[must_use]
    pub fn value(&self, component: TransformComponent) -> Vec3 {
        self.entries[component.index()].value
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self, component: TransformComponent) -> bool {
        self.entries[component.index()].is_active()
    }

    /// Overwrites a slot and marks it active.
    pub fn set_active(&mut self, component: TransformComponent, value: Vec3) {
        self.entries[component.index()] = ChainEntry::active(value);
    }
}

impl Index<TransformComponent> for TransformChain {
    type Output = ChainEntry;

    fn index(&self, component: TransformComponent) -> &ChainEntry {
        &self.entries[component.index()]
    }
}

impl IndexMut<TransformComponent> for TransformChain {
    fn index_mut(&mut self, component: TransformComponent) -> &mut ChainEntry {
        &mut self.entries[component.index()]
    }
}
