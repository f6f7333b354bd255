//! Static transform evaluation
//!
//! Turns a node's raw transform properties into matrices:
//! - `rotation`: euler angles ↔ matrices / quaternions under six axis orders
//! - `component`: the fixed 12-slot component chain
//! - `resolver`: property table → chain, complex-path detection
//! - `pivot`: chain → local and geometric matrices

pub mod component;
pub mod pivot;
pub mod resolver;
pub mod rotation;

pub use component::{ChainEntry, PivotStatus, TransformChain, TransformComponent};
pub use pivot::{NodeTransform, compose, compose_complex, compose_geometric, compose_simple};
pub use resolver::{needs_complex_chain, resolve_chain, resolve_model};
pub use rotation::{RotationOrder, euler_to_mat3, euler_to_mat4, euler_to_quat};
