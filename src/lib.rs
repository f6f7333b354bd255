#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Pivot-aware transform composition and keyframe resampling for FBX-style
//! scene documents.

pub mod animation;
pub mod document;
pub mod errors;
pub mod scene;
pub mod settings;
pub mod transform;

pub use animation::{AnimatedChannels, Animation, AnimationResampler, NodeAnim, QuatKey, VectorKey};
pub use document::{Document, Model, NodeId, PropertyTable};
pub use errors::{ConvertError, Result};
pub use scene::{ConvertedScene, OutputNode, SceneConverter};
pub use settings::{ConvertSettings, FrameRate, TimeBase};
pub use transform::{NodeTransform, RotationOrder, TransformChain, TransformComponent};
