//! Euler rotation orders
//!
//! Converts euler angles (degrees) into rotation matrices and quaternions
//! under the six axis orders of the source format. The order names the
//! sequence in which the axes are applied to a point: `XYZ` rotates about X
//! first, then Y, then Z, so its matrix is `Rz · Ry · Rx` in column-vector
//! form.

use glam::{Mat3, Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationOrder {
    #[default]
    XYZ,
    XZY,
    YZX,
    YXZ,
    ZXY,
    ZYX,
}

impl RotationOrder {
    /// Maps the source `RotationOrder` property code.
    ///
    /// Code 6 (spheric XYZ) is evaluated as XYZ. Any other unknown code falls
    /// back to XYZ with a warning.
    #[must_use]
    pub fn from_raw(code: i64) -> Self {
        match code {
            0 => Self::XYZ,
            1 => Self::XZY,
            2 => Self::YZX,
            3 => Self::YXZ,
            4 => Self::ZXY,
            5 => Self::ZYX,
            6 => {
                log::debug!("Spheric XYZ rotation order evaluated as XYZ");
                Self::XYZ
            }
            other => {
                log::warn!("Unknown rotation order {other}, using XYZ");
                Self::XYZ
            }
        }
    }

    /// Axes in application order.
    #[must_use]
    pub const fn axes(self) -> [usize; 3] {
        match self {
            Self::XYZ => [0, 1, 2],
            Self::XZY => [0, 2, 1],
            Self::YZX => [1, 2, 0],
            Self::YXZ => [1, 0, 2],
            Self::ZXY => [2, 0, 1],
            Self::ZYX => [2, 1, 0],
        }
    }

    #[inline]
    #[must_use]
    pub fn is_default(self) -> bool {
        self == Self::XYZ
    }
}

fn axis_matrix(axis: usize, radians: f32) -> Mat3 {
    match axis {
        0 => Mat3::from_rotation_x(radians),
        1 => Mat3::from_rotation_y(radians),
        _ => Mat3::from_rotation_z(radians),
    }
}

fn axis_quat(axis: usize, radians: f32) -> Quat {
    match axis {
        0 => Quat::from_rotation_x(radians),
        1 => Quat::from_rotation_y(radians),
        _ => Quat::from_rotation_z(radians),
    }
}

/// Rotation matrix for euler angles in degrees.
#[must_use]
pub fn euler_to_mat3(degrees: Vec3, order: RotationOrder) -> Mat3 {
    let radians = degrees * (std::f32::consts::PI / 180.0);
    let mut out = Mat3::IDENTITY;
    for axis in order.axes() {
        // Later axes are applied after earlier ones, so they multiply from the left.
        out = axis_matrix(axis, radians[axis]) * out;
    }
    out
}

/// 4×4 form of [`euler_to_mat3`].
#[inline]
#[must_use]
pub fn euler_to_mat4(degrees: Vec3, order: RotationOrder) -> Mat4 {
    Mat4::from_mat3(euler_to_mat3(degrees, order))
}

/// Quaternion for euler angles in degrees, composed in the same sequence as
/// [`euler_to_mat3`].
#[must_use]
pub fn euler_to_quat(degrees: Vec3, order: RotationOrder) -> Quat {
    let radians = degrees * (std::f32::consts::PI / 180.0);
    let mut out = Quat::IDENTITY;
    for axis in order.axes() {
        out = axis_quat(axis, radians[axis]) * out;
    }
    out.normalize()
}
