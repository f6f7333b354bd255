//! Animation resampling
//!
//! Turns per-channel source curves into node animation tracks:
//! - `keyframes`: clip curves to the stack range and merge their ticks
//! - `interpolate`: sample every curve at every merged tick
//! - `reorder`: sampled T/R/S → scale, quaternion and translation keys
//! - `redundancy`: detect components that never leave the static pose
//! - `resampler`: drive all of the above per stack and per node
//! - `node_anim`: the output types

pub mod interpolate;
pub mod keyframes;
pub mod node_anim;
pub mod redundancy;
pub mod reorder;
pub mod resampler;

pub use interpolate::TimeBounds;
pub use keyframes::{
    CurveNodeRef, KeyFrameList, KeyFrameListList, KeyTimeList, get_key_time_list, get_keyframe_list,
};
pub use node_anim::{AnimatedChannels, Animation, NodeAnim, QuatKey, SrtKeys, VectorKey};
pub use redundancy::is_redundant;
pub use reorder::{TrsSamples, convert_trs_to_srt};
pub use resampler::{AnimTarget, AnimationResampler};
